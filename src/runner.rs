//! Blocking subprocess execution: spawn the tool, relay its output, wait.
//!
//! ## One pipe, two descriptors
//!
//! The tool's stdout and stderr are both pointed at the write end of a single
//! anonymous pipe, so the parent reads one combined stream in exactly the
//! order the tool produced it. ffmpeg writes nearly everything to stderr;
//! reading two separate pipes would need a second thread and still lose the
//! relative ordering.
//!
//! ## Cleanup
//!
//! The parent's copies of the write end live inside the `Command` and are
//! closed as soon as it is dropped right after spawn; otherwise the read loop
//! would never see end-of-stream. The child itself is owned by a
//! [`ChildGuard`] that kills and reaps it if the read loop bails out early,
//! so no process or descriptor outlives [`run_blocking`] on any path.

use crate::config::ConversionConfig;
use crate::error::Vid2Mp3Error;
use crate::outcome::ConversionOutcome;
use crate::progress::parse_progress_time;
use crate::request::ConversionRequest;
use crate::sink::{ConsoleSink, SharedSink};
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Arguments passed to the tool for `request`, without the tool path.
///
/// With the default config this is
/// `-i <input> -vn -ar 44100 -ac 2 -b:a 192k -f mp3 <output>`.
pub fn command_args(request: &ConversionRequest, config: &ConversionConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(13);
    args.push("-i".into());
    args.push(request.input_path.clone().into_os_string());
    args.extend(config.profile.to_args().into_iter().map(OsString::from));
    if config.overwrite {
        args.push("-y".into());
    }
    args.push(request.output_path.clone().into_os_string());
    args
}

/// Full command line for `request`, tool path first.
pub fn command_line(request: &ConversionRequest, config: &ConversionConfig) -> Vec<OsString> {
    let mut argv = vec![request.tool_path.clone().into_os_string()];
    argv.extend(command_args(request, config));
    argv
}

/// Run the tool for `request` on the calling thread.
///
/// Blocks until the tool's output stream closes and the process exits. Each
/// output line goes to the configured sink (stdout by default) as soon as it
/// is read. Status lines carrying `time=` are also reported through
/// [`OutputSink::on_progress`](crate::sink::OutputSink::on_progress).
///
/// # Errors
/// I/O-class errors when the tool cannot be spawned, its output cannot be
/// read, or waiting fails; [`Vid2Mp3Error::Interrupted`] when the wait is
/// interrupted. A tool that runs but fails is *not* an error: check
/// [`ConversionOutcome::succeeded`].
pub fn run_blocking(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, Vid2Mp3Error> {
    let sink: SharedSink = config
        .output_sink
        .clone()
        .unwrap_or_else(|| Arc::new(ConsoleSink));
    let tool = &request.tool_path;
    let argv = command_line(request, config);
    let args = &argv[1..];

    info!(
        "Converting {} -> {}",
        request.input_path.display(),
        request.output_path.display()
    );
    debug!("Command: {:?} {:?}", tool, args);

    if request.output_path.try_exists().unwrap_or(false) {
        warn!(
            "Output '{}' already exists before the run; a success result may refer to this stale file",
            request.output_path.display()
        );
    }

    let (reader, writer) = io::pipe().map_err(|e| Vid2Mp3Error::SpawnFailed {
        path: tool.clone(),
        source: e,
    })?;
    let writer_for_stderr = writer.try_clone().map_err(|e| Vid2Mp3Error::SpawnFailed {
        path: tool.clone(),
        source: e,
    })?;

    sink.on_start(&argv);

    let started = Instant::now();
    let child = {
        let mut cmd = Command::new(tool);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_for_stderr);
        cmd.spawn()
            .map_err(|e| Vid2Mp3Error::from_spawn(tool.clone(), e))?
    };
    let mut guard = ChildGuard::new(child);
    debug!("Spawned pid {}", guard.id());

    let lines_relayed = relay_lines(reader, |line| {
        sink.on_line(line);
        if let Some(media_time) = parse_progress_time(line) {
            sink.on_progress(media_time);
        }
    })
    .map_err(|e| {
        Vid2Mp3Error::OutputReadFailed {
            path: tool.clone(),
            source: e,
        }
    })?;

    let status = guard
        .wait()
        .map_err(|e| Vid2Mp3Error::from_wait(tool.clone(), e))?;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let output_exists = request.output_path.try_exists().unwrap_or(false);
    let outcome = ConversionOutcome {
        output_path: request.output_path.clone(),
        exit_code: status.code(),
        output_exists,
        lines_relayed,
        duration_ms,
    };

    info!(
        "Tool exited with {} after {}ms ({} lines); output present: {}",
        status, duration_ms, lines_relayed, output_exists
    );
    sink.on_exit(&outcome);

    Ok(outcome)
}

/// Read `reader` to end-of-stream, calling `on_line` once per line.
///
/// Lines end at `\n`, `\r`, or `\r\n`; the terminator is stripped. ffmpeg
/// redraws its progress line with bare `\r`, so each redraw becomes its own
/// line. Invalid UTF-8 is replaced rather than rejected. A final fragment
/// without a terminator is still delivered.
///
/// Returns the number of lines delivered.
pub(crate) fn relay_lines<R: Read>(reader: R, mut on_line: impl FnMut(&str)) -> io::Result<usize> {
    let mut reader = BufReader::new(reader);
    let mut line: Vec<u8> = Vec::new();
    let mut count = 0usize;
    let mut after_cr = false;

    let mut emit = |line: &mut Vec<u8>| {
        on_line(&String::from_utf8_lossy(line));
        line.clear();
        count += 1;
    };

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        for &byte in buf {
            match byte {
                // second half of a "\r\n" pair
                b'\n' if after_cr => after_cr = false,
                b'\n' | b'\r' => {
                    emit(&mut line);
                    after_cr = byte == b'\r';
                }
                _ => {
                    after_cr = false;
                    line.push(byte);
                }
            }
        }
        let len = buf.len();
        reader.consume(len);
    }

    if !line.is_empty() {
        emit(&mut line);
    }
    Ok(count)
}

/// Owns a spawned child; kills and reaps it on drop unless it was waited on.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn id(&self) -> u32 {
        self.child.id()
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            warn!("Killing conversion tool (pid {})", self.child.id());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
