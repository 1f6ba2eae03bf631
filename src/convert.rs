//! Conversion entry points.
//!
//! [`convert`] is the plain contract: three paths in, `true`/`false` out.
//! [`run`] takes a [`ConversionConfig`] and returns the full
//! [`ConversionOutcome`]; [`run_async`] does the same from async code
//! without blocking a runtime worker. Use [`crate::stream::convert_stream`]
//! to consume the tool's output as an async stream instead of a sink.

use crate::config::ConversionConfig;
use crate::error::Vid2Mp3Error;
use crate::outcome::ConversionOutcome;
use crate::request::ConversionRequest;
use crate::runner;
use std::path::Path;
use tracing::info;

/// Extract the audio of `input_path` into `output_path` with the default
/// profile, relaying the tool's output to stdout.
///
/// Runs `<tool_path> -i <input> -vn -ar 44100 -ac 2 -b:a 192k -f mp3 <output>`
/// and blocks until it exits.
///
/// # Returns
/// `Ok(true)` iff the tool exited with code 0 **and** `output_path` exists
/// afterwards. A tool that ran but failed gives `Ok(false)`.
///
/// # Errors
/// An I/O-class [`Vid2Mp3Error`] if the tool could not be started or its
/// output could not be read; [`Vid2Mp3Error::Interrupted`] if the wait was
/// interrupted.
///
/// # Example
/// ```rust,no_run
/// let ok = vid2mp3::convert("ffmpeg", "VID_0001.mp4", "VID_0001.mp3")?;
/// println!("{}", if ok { "Conversion succeeded!" } else { "Conversion failed!" });
/// # Ok::<(), vid2mp3::Vid2Mp3Error>(())
/// ```
pub fn convert(
    tool_path: impl AsRef<Path>,
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<bool, Vid2Mp3Error> {
    let request = ConversionRequest::new(
        tool_path.as_ref(),
        input_path.as_ref(),
        output_path.as_ref(),
    );
    let outcome = run(&request, &ConversionConfig::default())?;
    Ok(outcome.succeeded())
}

/// Run one conversion on the calling thread and return everything observed.
pub fn run(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, Vid2Mp3Error> {
    let outcome = runner::run_blocking(request, config)?;
    info!(
        "Conversion {}: {:?}",
        if outcome.succeeded() { "succeeded" } else { "failed" },
        outcome.status()
    );
    Ok(outcome)
}

/// Async wrapper around [`run`].
///
/// The blocking read/wait loop runs on tokio's blocking pool. If that task
/// is cancelled or panics before the tool finishes, the result is
/// [`Vid2Mp3Error::Interrupted`].
pub async fn run_async(
    request: ConversionRequest,
    config: ConversionConfig,
) -> Result<ConversionOutcome, Vid2Mp3Error> {
    tokio::task::spawn_blocking(move || run(&request, &config))
        .await
        .map_err(interrupted_by_join)?
}

pub(crate) fn interrupted_by_join(e: tokio::task::JoinError) -> Vid2Mp3Error {
    if e.is_cancelled() {
        Vid2Mp3Error::Interrupted("conversion task was cancelled".into())
    } else {
        Vid2Mp3Error::Interrupted(format!("conversion task panicked: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NoopSink;
    use std::sync::Arc;

    fn quiet() -> ConversionConfig {
        ConversionConfig::builder()
            .output_sink(Arc::new(NoopSink))
            .build()
            .unwrap()
    }

    #[test]
    fn convert_missing_tool_is_error_not_false() {
        let err = convert("/no/such/dir/ffmpeg-9c1e", "in.mp4", "out.mp3").unwrap_err();
        assert!(err.is_io(), "got: {err:?}");
    }

    #[test]
    fn run_async_missing_tool_is_io_error() {
        let req = ConversionRequest::new("/no/such/dir/ffmpeg-9c1e", "in.mp4", "out.mp3");
        let err = tokio_test::block_on(run_async(req, quiet())).unwrap_err();
        assert!(matches!(err, Vid2Mp3Error::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn panicked_task_maps_to_interrupted() {
        let handle: tokio::task::JoinHandle<()> = tokio::spawn(async { panic!("boom") });
        let join_err = handle.await.unwrap_err();
        let e = interrupted_by_join(join_err);
        assert!(e.is_interrupted());
        assert!(e.to_string().contains("panicked"));
    }

    #[tokio::test]
    async fn cancelled_task_maps_to_interrupted() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        handle.abort();
        let e = interrupted_by_join(handle.await.unwrap_err());
        assert!(e.is_interrupted());
        assert!(e.to_string().contains("cancelled"));
    }
}
