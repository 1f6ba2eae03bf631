//! Result types for a finished conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything observed about one run of the external tool.
///
/// Returned by [`crate::convert::run`] once the tool has exited. The boolean
/// answer callers usually want is [`ConversionOutcome::succeeded`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Output path that was checked after the tool exited.
    pub output_path: PathBuf,
    /// Exit code of the tool. `None` when it was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Whether `output_path` existed after the tool exited.
    pub output_exists: bool,
    /// Number of combined-output lines relayed to the sink.
    pub lines_relayed: usize,
    /// Wall-clock time from spawn to exit, in milliseconds.
    pub duration_ms: u64,
}

impl ConversionOutcome {
    /// `true` iff the tool exited with code 0 **and** the output file exists.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.output_exists
    }

    /// Classify the outcome. A non-zero exit takes precedence over a missing
    /// file.
    pub fn status(&self) -> ConversionStatus {
        if self.exit_code != Some(0) {
            ConversionStatus::ToolFailed
        } else if !self.output_exists {
            ConversionStatus::OutputMissing
        } else {
            ConversionStatus::Completed
        }
    }
}

/// Terminal state of a conversion that ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Exit code 0 and the output file is present.
    Completed,
    /// The tool exited non-zero or was killed by a signal.
    ToolFailed,
    /// The tool exited 0 but no output file exists.
    OutputMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(exit_code: Option<i32>, output_exists: bool) -> ConversionOutcome {
        ConversionOutcome {
            output_path: "out.mp3".into(),
            exit_code,
            output_exists,
            lines_relayed: 3,
            duration_ms: 12,
        }
    }

    #[test]
    fn success_needs_zero_exit_and_file() {
        assert!(outcome(Some(0), true).succeeded());
        assert_eq!(outcome(Some(0), true).status(), ConversionStatus::Completed);
    }

    #[test]
    fn non_zero_exit_fails_even_with_file() {
        let o = outcome(Some(1), true);
        assert!(!o.succeeded());
        assert_eq!(o.status(), ConversionStatus::ToolFailed);
    }

    #[test]
    fn zero_exit_without_file_fails() {
        let o = outcome(Some(0), false);
        assert!(!o.succeeded());
        assert_eq!(o.status(), ConversionStatus::OutputMissing);
    }

    #[test]
    fn killed_by_signal_is_tool_failure() {
        let o = outcome(None, true);
        assert!(!o.succeeded());
        assert_eq!(o.status(), ConversionStatus::ToolFailed);
    }

    #[test]
    fn status_serialises_snake_case() {
        let json = serde_json::to_string(&ConversionStatus::OutputMissing).unwrap();
        assert_eq!(json, "\"output_missing\"");
    }
}
