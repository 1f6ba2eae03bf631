//! CLI binary for vid2mp3.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, relays ffmpeg's output, and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use ffmpeg_locate::locate_ffmpeg;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vid2mp3::{
    default_output_path, run_async, AudioProfile, ConversionConfig, ConversionOutcome,
    ConversionRequest, NoopSink, OutputSink, SharedSink,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI output sink using indicatif ──────────────────────────────────────────

/// Relays ffmpeg output above a spinner, or straight to a stream when the
/// spinner is off or stderr is not a terminal.
struct CliSink {
    bar: Option<ProgressBar>,
    /// Relay to stderr instead of stdout (keeps stdout clean for `--json`).
    to_stderr: bool,
}

impl CliSink {
    fn new(show_spinner: bool, to_stderr: bool) -> Arc<Self> {
        let bar = show_spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Converting");
            bar.set_message("starting ffmpeg…");
            bar
        });
        Arc::new(Self { bar, to_stderr })
    }

    fn print(&self, line: &str) {
        match &self.bar {
            // A hidden bar drops `println`, so fall through when not a tty.
            Some(bar) if !bar.is_hidden() => bar.println(line),
            _ if self.to_stderr => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}

impl OutputSink for CliSink {
    fn on_start(&self, argv: &[OsString]) {
        let cmd = argv
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        self.print(&dim(&format!("$ {cmd}")));
        if let Some(bar) = &self.bar {
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    fn on_line(&self, line: &str) {
        self.print(line);
    }

    fn on_progress(&self, media_time: Duration) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} of audio written", format_media_time(media_time)));
        }
    }

    fn on_exit(&self, _outcome: &ConversionOutcome) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// `HH:MM:SS` for the spinner message.
fn format_media_time(t: Duration) -> String {
    let secs = t.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract audio next to the video (VID_0001_<timestamp>.mp3)
  vid2mp3 VID_0001.mp4

  # Explicit output path
  vid2mp3 VID_0001.mp4 -o VID_0001.mp3

  # Put generated files in another directory
  vid2mp3 --out-dir ~/Music VID_0001.mp4

  # Use a specific ffmpeg build
  vid2mp3 --ffmpeg ./ffmpeg-7.1.1/bin/ffmpeg VID_0001.mp4

  # Mono, 128 kbit/s, replace an existing file
  vid2mp3 --channels 1 --bitrate 128 -y VID_0001.mp4 -o voice.mp3

  # Machine-readable result
  vid2mp3 --json VID_0001.mp4 > result.json

COMMAND LINE:
  With default settings ffmpeg is invoked exactly as
    ffmpeg -i <input> -vn -ar 44100 -ac 2 -b:a 192k -f mp3 <output>

EXIT STATUS:
  0  ffmpeg exited 0 and the output file exists
  1  ffmpeg ran but failed (non-zero exit or no output file)
  2  ffmpeg could not be run (not found, not executable, I/O error)

ENVIRONMENT VARIABLES:
  FFMPEG_PATH   Path to the ffmpeg binary (used when --ffmpeg is not given)
  RUST_LOG      Log filter, e.g. vid2mp3=debug
"#;

/// Extract the audio track of a video into MP3 using ffmpeg.
#[derive(Parser, Debug)]
#[command(
    name = "vid2mp3",
    version,
    about = "Extract the audio track of a video into MP3 using ffmpeg",
    long_about = "Run ffmpeg to extract the audio track of a media file into MP3, relaying \
ffmpeg's console output live. Success means ffmpeg exited 0 and the output file exists.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Media file to extract audio from.
    input: PathBuf,

    /// Output file. Default: <input stem>_<timestamp>.<format> next to the input.
    #[arg(short, long, env = "VID2MP3_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for the generated output name (ignored with --output).
    #[arg(long, env = "VID2MP3_OUT_DIR", conflicts_with = "output")]
    out_dir: Option<PathBuf>,

    /// Path to the ffmpeg executable. Default: $FFMPEG_PATH, then PATH.
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Output sample rate in Hz.
    #[arg(long, env = "VID2MP3_SAMPLE_RATE", default_value_t = 44_100,
          value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,

    /// Output channel count.
    #[arg(long, env = "VID2MP3_CHANNELS", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(1..=8))]
    channels: u8,

    /// Audio bitrate in kbit/s.
    #[arg(long, env = "VID2MP3_BITRATE", default_value_t = 192,
          value_parser = clap::value_parser!(u32).range(1..))]
    bitrate: u32,

    /// Output container passed to ffmpeg's -f (also the generated extension).
    #[arg(long, env = "VID2MP3_FORMAT", default_value = "mp3")]
    format: String,

    /// Do not pass -vn (keep video streams if the container allows it).
    #[arg(long)]
    keep_video: bool,

    /// Overwrite an existing output file (passes -y to ffmpeg).
    #[arg(short = 'y', long, env = "VID2MP3_OVERWRITE")]
    overwrite: bool,

    /// Print the outcome as JSON on stdout; ffmpeg output goes to stderr.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "VID2MP3_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VID2MP3_VERBOSE")]
    verbose: bool,

    /// Hide ffmpeg output and all messages except errors.
    #[arg(short, long, env = "VID2MP3_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run_cli(&cli).await {
        Ok(outcome) => {
            let ok = outcome.succeeded();
            if !cli.quiet && !cli.json {
                if ok {
                    eprintln!(
                        "{} Conversion succeeded!  {}  {}",
                        green("✔"),
                        bold(&outcome.output_path.display().to_string()),
                        dim(&format!("{:.1}s", outcome.duration_ms as f64 / 1000.0)),
                    );
                } else {
                    eprintln!(
                        "{} Conversion failed!  {}",
                        red("✘"),
                        dim(&format!(
                            "exit code {}, output {}",
                            outcome
                                .exit_code
                                .map_or_else(|| "none (signal)".to_string(), |c| c.to_string()),
                            if outcome.output_exists { "present" } else { "missing" },
                        )),
                    );
                }
            }
            if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", red("✘"));
            eprintln!("An error occurred, conversion failed!");
            ExitCode::from(2)
        }
    }
}

async fn run_cli(cli: &Cli) -> Result<ConversionOutcome> {
    let tool = locate_ffmpeg(cli.ffmpeg.as_deref()).context("Cannot find ffmpeg")?;

    let config = build_config(cli)?;
    let output = cli.output.clone().unwrap_or_else(|| {
        default_output_path(&cli.input, cli.out_dir.as_deref(), &config.profile.format)
    });
    let request = ConversionRequest::new(tool, cli.input.clone(), output);
    request.create_output_dir().with_context(|| {
        format!(
            "Cannot create output directory for '{}'",
            request.output_path.display()
        )
    })?;

    let outcome = run_async(request, config)
        .await
        .context("Could not run ffmpeg")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonReport::from(&outcome))
                .context("Failed to serialise outcome")?
        );
    }
    Ok(outcome)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let profile = AudioProfile::builder()
        .disable_video(!cli.keep_video)
        .sample_rate_hz(cli.sample_rate)
        .channels(cli.channels)
        .bitrate_kbps(cli.bitrate)
        .format(cli.format.clone())
        .build()
        .context("Invalid audio profile")?;

    let sink: SharedSink = if cli.quiet {
        Arc::new(NoopSink)
    } else {
        CliSink::new(!cli.no_progress && !cli.json, cli.json)
    };

    ConversionConfig::builder()
        .profile(profile)
        .overwrite(cli.overwrite)
        .output_sink(sink)
        .build()
        .context("Invalid configuration")
}

/// Outcome plus derived fields, as printed by `--json`.
#[derive(serde::Serialize)]
struct JsonReport<'a> {
    success: bool,
    status: vid2mp3::ConversionStatus,
    #[serde(flatten)]
    outcome: &'a ConversionOutcome,
}

impl<'a> From<&'a ConversionOutcome> for JsonReport<'a> {
    fn from(outcome: &'a ConversionOutcome) -> Self {
        Self {
            success: outcome.succeeded(),
            status: outcome.status(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_time_formats_as_clock() {
        assert_eq!(format_media_time(Duration::from_millis(62_500)), "00:01:02");
        assert_eq!(format_media_time(Duration::from_secs(3 * 3600 + 5)), "03:00:05");
    }

    #[test]
    fn cli_parses_out_dir() {
        let cli = Cli::try_parse_from(["vid2mp3", "--out-dir", "music", "VID_0001.mp4"]).unwrap();
        assert_eq!(cli.out_dir.as_deref(), Some(std::path::Path::new("music")));
        assert!(cli.output.is_none());
    }
}
