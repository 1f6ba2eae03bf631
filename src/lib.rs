//! # vid2mp3
//!
//! Extract the audio track of a video into MP3 by driving an external
//! [ffmpeg](https://ffmpeg.org/) executable.
//!
//! ## What happens on a conversion
//!
//! ```text
//! request (tool, input, output)
//!  │
//!  ├─ 1. Build   -i <input> -vn -ar 44100 -ac 2 -b:a 192k -f mp3 <output>
//!  ├─ 2. Spawn   stdout + stderr share one pipe (a single combined stream)
//!  ├─ 3. Relay   every line → OutputSink (stdout by default) as it arrives;
//!  │            `time=` status lines also → OutputSink::on_progress
//!  ├─ 4. Wait    block until the tool exits
//!  └─ 5. Judge   success = exit code 0 AND output file exists
//! ```
//!
//! A tool that runs but fails its job is a normal `false` result. Only a tool
//! that could not be run at all (missing, not executable, unreadable output,
//! interrupted wait) is an `Err`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! let ok = vid2mp3::convert("ffmpeg", "VID_0001.mp4", "VID_0001.mp3")?;
//! assert!(ok);
//! # Ok::<(), vid2mp3::Vid2Mp3Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vid2mp3` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod outcome;
pub mod progress;
pub mod request;
pub mod runner;
pub mod sink;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AudioProfile, AudioProfileBuilder, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, run, run_async};
pub use error::Vid2Mp3Error;
pub use outcome::{ConversionOutcome, ConversionStatus};
pub use progress::parse_progress_time;
pub use request::{default_output_path, ConversionRequest};
pub use runner::{command_args, command_line};
pub use sink::{ConsoleSink, NoopSink, OutputSink, SharedSink};
pub use stream::{convert_stream, ConversionEvent, EventStream};
