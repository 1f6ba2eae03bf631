//! Output-sink trait for relayed tool output.
//!
//! Every line the external tool writes to its combined stdout/stderr stream
//! is handed to an [`OutputSink`] as soon as it is read. The default,
//! [`ConsoleSink`], prints each line to stdout so the tool's progress shows up
//! on the caller's console in real time.
//!
//! Inject a different sink via
//! [`crate::config::ConversionConfigBuilder::output_sink`] to capture lines,
//! forward them to a log, or drive a progress display.
//!
//! # Example
//!
//! ```rust
//! use vid2mp3::{ConversionConfig, OutputSink};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<String>>);
//!
//! impl OutputSink for Collect {
//!     fn on_line(&self, line: &str) {
//!         self.0.lock().unwrap().push(line.to_string());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .output_sink(Arc::new(Collect::default()))
//!     .build()
//!     .unwrap();
//! ```

use crate::outcome::ConversionOutcome;
use std::ffi::OsString;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Receives the tool's output and lifecycle events for one conversion.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Methods are called from the thread running the
/// conversion, which for the async entry points is a tokio blocking-pool
/// thread, hence `Send + Sync`.
pub trait OutputSink: Send + Sync {
    /// Called once, just before the tool is spawned.
    ///
    /// # Arguments
    /// * `argv` — the full command line, tool path first
    fn on_start(&self, argv: &[OsString]) {
        let _ = argv;
    }

    /// Called for every line of combined output, in the order produced.
    ///
    /// `line` carries no trailing `\n` / `\r`.
    fn on_line(&self, line: &str) {
        let _ = line;
    }

    /// Called after [`on_line`](Self::on_line) for each status line that
    /// reports how much media has been written.
    ///
    /// `media_time` is the position parsed from ffmpeg's `time=` field, not
    /// wall-clock time. Lines without a usable `time=` never reach this.
    fn on_progress(&self, media_time: Duration) {
        let _ = media_time;
    }

    /// Called once after the tool exited and the output file was checked.
    fn on_exit(&self, outcome: &ConversionOutcome) {
        let _ = outcome;
    }
}

/// Prints every relayed line to stdout.
///
/// This is the default when no sink is configured.
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn on_line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout (e.g. `| head`) must not abort the conversion.
        let _ = writeln!(handle, "{line}");
        let _ = handle.flush();
    }
}

/// A sink that discards everything.
pub struct NoopSink;

impl OutputSink for NoopSink {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type SharedSink = Arc<dyn OutputSink>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingSink {
        starts: AtomicUsize,
        lines: Mutex<Vec<String>>,
        exits: AtomicUsize,
    }

    impl OutputSink for TrackingSink {
        fn on_start(&self, _argv: &[OsString]) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }

        fn on_exit(&self, _outcome: &ConversionOutcome) {
            self.exits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_sink_does_not_panic() {
        let sink = NoopSink;
        sink.on_start(&["ffmpeg".into()]);
        sink.on_line("frame=1");
        sink.on_progress(Duration::from_secs(1));
        sink.on_exit(&ConversionOutcome::default());
    }

    #[test]
    fn console_sink_prints_without_panicking() {
        ConsoleSink.on_line("size=     512kB time=00:00:30.00");
    }

    #[test]
    fn tracking_sink_receives_events_in_order() {
        let sink = TrackingSink {
            starts: AtomicUsize::new(0),
            lines: Mutex::new(Vec::new()),
            exits: AtomicUsize::new(0),
        };

        sink.on_start(&["ffmpeg".into(), "-i".into(), "in.mp4".into()]);
        sink.on_line("Input #0");
        sink.on_line("Output #0");
        sink.on_exit(&ConversionOutcome::default());

        assert_eq!(sink.starts.load(Ordering::SeqCst), 1);
        assert_eq!(*sink.lines.lock().unwrap(), ["Input #0", "Output #0"]);
        assert_eq!(sink.exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_sink_works() {
        let sink: SharedSink = Arc::new(NoopSink);
        sink.on_line("done");
    }
}
