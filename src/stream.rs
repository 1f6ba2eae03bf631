//! Streaming API: the tool's output as an async `Stream`.
//!
//! [`convert_stream`] starts the tool on tokio's blocking pool and returns a
//! stream that yields one [`ConversionEvent::Line`] per relayed line, in the
//! order the tool produced them, followed by a single
//! [`ConversionEvent::Finished`] carrying the outcome. If the tool could not
//! be run the stream ends with an `Err` item instead.
//!
//! Lines still reach the configured [`crate::sink::OutputSink`] as well, so a
//! stream consumer and a console relay can coexist.

use crate::config::ConversionConfig;
use crate::convert::{interrupted_by_join, run};
use crate::error::Vid2Mp3Error;
use crate::outcome::ConversionOutcome;
use crate::request::ConversionRequest;
use crate::sink::{ConsoleSink, OutputSink, SharedSink};
use std::ffi::OsString;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::info;

/// One item of a conversion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    /// A line of the tool's combined output.
    Line(String),
    /// The tool exited; always the last `Ok` item.
    Finished(ConversionOutcome),
}

/// A boxed stream of conversion events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ConversionEvent, Vid2Mp3Error>> + Send>>;

/// Run a conversion, streaming the tool's output as it is produced.
///
/// Must be called from within a tokio runtime. The conversion keeps running
/// if the stream is dropped early; its remaining lines are discarded.
///
/// # Example
/// ```rust,no_run
/// use tokio_stream::StreamExt;
/// use vid2mp3::{convert_stream, ConversionConfig, ConversionEvent, ConversionRequest};
///
/// # #[tokio::main]
/// # async fn main() {
/// let req = ConversionRequest::new("ffmpeg", "in.mp4", "out.mp3");
/// let mut events = convert_stream(req, ConversionConfig::default());
/// while let Some(event) = events.next().await {
///     match event {
///         Ok(ConversionEvent::Line(l)) => eprintln!("{l}"),
///         Ok(ConversionEvent::Finished(o)) => println!("ok: {}", o.succeeded()),
///         Err(e) => eprintln!("error: {e}"),
///     }
/// }
/// # }
/// ```
pub fn convert_stream(request: ConversionRequest, config: ConversionConfig) -> EventStream {
    info!("Starting streaming conversion: {}", request.input_path.display());

    let (tx, rx) = mpsc::unbounded_channel();
    let inner: SharedSink = config
        .output_sink
        .clone()
        .unwrap_or_else(|| Arc::new(ConsoleSink));
    let config = ConversionConfig {
        output_sink: Some(Arc::new(ChannelSink {
            tx: tx.clone(),
            inner,
        })),
        ..config
    };

    let task = tokio::task::spawn_blocking(move || run(&request, &config));
    tokio::spawn(async move {
        let last = match task.await {
            Ok(Ok(outcome)) => Ok(ConversionEvent::Finished(outcome)),
            Ok(Err(e)) => Err(e),
            Err(join) => Err(interrupted_by_join(join)),
        };
        // receiver gone: nobody is listening
        let _ = tx.send(last);
    });

    Box::pin(UnboundedReceiverStream::new(rx))
}

/// Forwards lines into the stream channel, then to the caller's sink.
struct ChannelSink {
    tx: mpsc::UnboundedSender<Result<ConversionEvent, Vid2Mp3Error>>,
    inner: SharedSink,
}

impl OutputSink for ChannelSink {
    fn on_start(&self, argv: &[OsString]) {
        self.inner.on_start(argv);
    }

    fn on_line(&self, line: &str) {
        let _ = self.tx.send(Ok(ConversionEvent::Line(line.to_string())));
        self.inner.on_line(line);
    }

    fn on_progress(&self, media_time: Duration) {
        self.inner.on_progress(media_time);
    }

    fn on_exit(&self, outcome: &ConversionOutcome) {
        self.inner.on_exit(outcome);
    }
}
