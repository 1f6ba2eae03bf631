//! The three paths that describe one conversion, plus default output naming.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool, input, and output paths for one conversion.
///
/// None of the paths are validated here; a bad input or an unwritable output
/// is reported by the tool through its exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// External conversion executable (normally ffmpeg).
    pub tool_path: PathBuf,
    /// Media file to read.
    pub input_path: PathBuf,
    /// Audio file to write.
    pub output_path: PathBuf,
}

impl ConversionRequest {
    pub fn new(
        tool_path: impl Into<PathBuf>,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool_path: tool_path.into(),
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Create the directory the output file will be written into, with any
    /// missing parents.
    ///
    /// The tool does not create directories, so a generated output path under
    /// a directory that does not exist yet fails the conversion. A bare file
    /// name (no parent) needs nothing.
    pub fn create_output_dir(&self) -> std::io::Result<()> {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Output path for `input` when the caller does not pick one.
///
/// Produces `<dir>/<input stem>_<yyyyMMdd_HHmmss>.<extension>` using the
/// current local time, where `<dir>` is `out_dir` or else the input's own
/// directory. The timestamp keeps repeated runs from colliding with a stale
/// output.
pub fn default_output_path(input: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    output_path_at(input, out_dir, extension, Local::now())
}

fn output_path_at(
    input: &Path,
    out_dir: Option<&Path>,
    extension: &str,
    now: DateTime<Local>,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let stamp = now.format("%Y%m%d_%H%M%S");
    dir.join(format!("{stem}_{stamp}.{extension}"))
}
