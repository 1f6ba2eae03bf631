//! Error types for the vid2mp3 library.
//!
//! Only failures to *run* the external tool are errors. A tool that ran to
//! completion but exited non-zero, or left no output file behind, is a normal
//! negative result and comes back as `Ok(false)` /
//! [`crate::outcome::ConversionOutcome`] with a failed status.
//!
//! The variants fall into two classes that callers may want to tell apart:
//!
//! * **I/O class** — the tool could not be started, its output could not be
//!   read, or waiting on it failed. See [`Vid2Mp3Error::is_io`].
//! * **Interruption class** — the wait for the tool was interrupted before it
//!   finished. See [`Vid2Mp3Error::is_interrupted`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the vid2mp3 library.
#[derive(Debug, Error)]
pub enum Vid2Mp3Error {
    // ── Spawn errors ──────────────────────────────────────────────────────
    /// The tool path does not name an existing file.
    #[error("Conversion tool not found: '{path}'\nCheck the path, or set FFMPEG_PATH.")]
    ToolNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool exists but the process may not execute it.
    #[error("Conversion tool is not executable: '{path}'\nTry: chmod +x {path:?}")]
    ToolNotExecutable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other failure to launch the tool (pipe creation, fork, exec).
    #[error("Failed to start '{path}': {source}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Running-process errors ────────────────────────────────────────────
    /// The combined output stream of the tool could not be read.
    #[error("Failed to read output of '{path}': {source}")]
    OutputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the tool to exit failed.
    #[error("Failed to wait for '{path}': {source}")]
    WaitFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The wait for the tool was interrupted before it exited.
    ///
    /// Raised when the async task running the conversion is cancelled or
    /// panics.
    #[error("Interrupted while waiting for the conversion tool: {0}")]
    Interrupted(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Vid2Mp3Error {
    /// `true` for errors raised while starting, reading from, or waiting on
    /// the tool.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound { .. }
                | Self::ToolNotExecutable { .. }
                | Self::SpawnFailed { .. }
                | Self::OutputReadFailed { .. }
                | Self::WaitFailed { .. }
        )
    }

    /// `true` when the wait for the tool was interrupted.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }

    /// Classify an error from `Command::spawn` for `path`.
    pub(crate) fn from_spawn(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::ToolNotFound { path, source },
            std::io::ErrorKind::PermissionDenied => Self::ToolNotExecutable { path, source },
            _ => Self::SpawnFailed { path, source },
        }
    }

    /// Classify an error from `Child::wait` for `path`.
    ///
    /// `Child::wait` already retries on `EINTR`, so the `Interrupted` arm is
    /// not reached by the blocking runner in practice. Interruption normally
    /// comes from a cancelled or panicked blocking task in the async entry
    /// points (see `convert::interrupted_by_join`).
    pub(crate) fn from_wait(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::Interrupted {
            Self::Interrupted(format!("'{}': {source}", path.display()))
        } else {
            Self::WaitFailed { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn spawn_not_found_is_tool_not_found() {
        let e = Vid2Mp3Error::from_spawn(
            "/no/such/ffmpeg".into(),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(e, Vid2Mp3Error::ToolNotFound { .. }));
        assert!(e.is_io());
        assert!(!e.is_interrupted());
        assert!(e.to_string().contains("/no/such/ffmpeg"), "got: {e}");
    }

    #[test]
    fn spawn_permission_denied_is_not_executable() {
        let e = Vid2Mp3Error::from_spawn(
            "ffmpeg".into(),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(e, Vid2Mp3Error::ToolNotExecutable { .. }));
        assert!(e.to_string().contains("chmod +x"));
    }

    #[test]
    fn spawn_other_is_spawn_failed() {
        let e = Vid2Mp3Error::from_spawn("ffmpeg".into(), io::Error::other("boom"));
        assert!(matches!(e, Vid2Mp3Error::SpawnFailed { .. }));
        assert!(e.to_string().contains("boom"));
    }

    #[test]
    fn interrupted_wait_is_interruption_class() {
        let e = Vid2Mp3Error::from_wait(
            "ffmpeg".into(),
            io::Error::from(io::ErrorKind::Interrupted),
        );
        assert!(e.is_interrupted());
        assert!(!e.is_io());
    }

    #[test]
    fn other_wait_error_is_io_class() {
        let e = Vid2Mp3Error::from_wait("ffmpeg".into(), io::Error::other("ECHILD"));
        assert!(matches!(e, Vid2Mp3Error::WaitFailed { .. }));
        assert!(e.is_io());
    }

    #[test]
    fn invalid_config_is_neither_class() {
        let e = Vid2Mp3Error::InvalidConfig("channels must be ≥ 1".into());
        assert!(!e.is_io());
        assert!(!e.is_interrupted());
    }
}
