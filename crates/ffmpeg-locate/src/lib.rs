//! # ffmpeg-locate
//!
//! Find an [ffmpeg](https://ffmpeg.org/) executable without the caller having
//! to hard-code an install location.
//!
//! ## Resolution order
//!
//! First match wins:
//!
//! 1. An explicit path passed by the caller. Returned as-is: the path is not
//!    checked, so a bad path surfaces as a spawn error at invocation time.
//! 2. `FFMPEG_PATH` — path to an existing ffmpeg binary.
//! 3. The first executable named `ffmpeg` (`ffmpeg.exe` on Windows) found on
//!    `PATH`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ffmpeg_locate::locate_ffmpeg;
//!
//! let ffmpeg = locate_ffmpeg(None).expect("ffmpeg not installed");
//! println!("using {}", ffmpeg.display());
//! ```

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable naming an ffmpeg binary; consulted before `PATH`.
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by ffmpeg-locate.
#[derive(Error, Debug)]
pub enum LocateError {
    /// Nothing usable was found in any location.
    #[error(
        "ffmpeg executable not found.\n\
Install ffmpeg and make sure `{binary}` is on PATH,\n\
or set FFMPEG_PATH=/path/to/ffmpeg, or pass the path explicitly."
    )]
    NotFound { binary: &'static str },

    /// `FFMPEG_PATH` is set but does not point at a file.
    #[error("FFMPEG_PATH points to '{path}', which is not a file")]
    EnvPathInvalid { path: PathBuf },
}

/// Platform file name of the ffmpeg binary.
pub fn ffmpeg_binary_name() -> &'static str {
    if cfg!(windows) {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Resolve the ffmpeg executable using the process environment.
///
/// See the crate docs for the resolution order.
pub fn locate_ffmpeg(explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
    locate_with(
        explicit,
        std::env::var_os(FFMPEG_PATH_ENV),
        std::env::var_os("PATH"),
    )
}

/// Resolve the ffmpeg executable against the given environment values.
///
/// [`locate_ffmpeg`] is this function fed from `std::env`; taking the values
/// as arguments keeps resolution testable without mutating process state.
pub fn locate_with(
    explicit: Option<&Path>,
    ffmpeg_path_var: Option<OsString>,
    path_var: Option<OsString>,
) -> Result<PathBuf, LocateError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }

    if let Some(raw) = ffmpeg_path_var.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(raw);
        if path.is_file() {
            return Ok(path);
        }
        return Err(LocateError::EnvPathInvalid { path });
    }

    let binary = ffmpeg_binary_name();
    path_var
        .as_deref()
        .and_then(|paths| find_in_path(binary, paths))
        .ok_or(LocateError::NotFound { binary })
}

/// Search a `PATH`-style list of directories for an executable `name`.
pub fn find_in_path(name: &str, paths: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str, exec: bool) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, b"").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if exec { 0o755 } else { 0o644 };
            fs::set_permissions(&p, fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = exec;
        p
    }

    #[test]
    fn explicit_path_wins_without_checking() {
        let p = Path::new("/definitely/not/here/ffmpeg");
        let got = locate_with(Some(p), Some("/other".into()), None).unwrap();
        assert_eq!(got, p);
    }

    #[test]
    fn env_var_used_before_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = touch(dir.path(), "my-ffmpeg", true);
        let got = locate_with(None, Some(bin.clone().into_os_string()), None).unwrap();
        assert_eq!(got, bin);
    }

    #[test]
    fn env_var_pointing_nowhere_is_an_error() {
        let err = locate_with(None, Some("/nope/ffmpeg".into()), None).unwrap_err();
        assert!(matches!(err, LocateError::EnvPathInvalid { .. }));
        assert!(err.to_string().contains(FFMPEG_PATH_ENV));
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let err = locate_with(None, Some(OsString::new()), None).unwrap_err();
        assert!(matches!(err, LocateError::NotFound { .. }));
    }

    #[test]
    fn path_search_finds_first_match() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let expected = touch(b.path(), ffmpeg_binary_name(), true);
        let paths = std::env::join_paths([a.path(), b.path()]).unwrap();
        assert_eq!(find_in_path(ffmpeg_binary_name(), &paths), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn path_search_skips_non_executable() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        touch(a.path(), "ffmpeg", false);
        let expected = touch(b.path(), "ffmpeg", true);
        let paths = std::env::join_paths([a.path(), b.path()]).unwrap();
        assert_eq!(find_in_path("ffmpeg", &paths), Some(expected));
    }

    #[test]
    fn not_found_mentions_binary_name() {
        let empty = tempfile::tempdir().unwrap();
        let err = locate_with(None, None, Some(empty.path().into())).unwrap_err();
        assert!(err.to_string().contains(ffmpeg_binary_name()));
    }
}
