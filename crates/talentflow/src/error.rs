use thiserror::Error;

use crate::input::format_file_size;
use crate::pipeline::stage::StageStatus;

/// Pre-run validation failures. These are reported to the caller before any
/// pipeline run exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File size {} exceeds the {} limit", format_file_size(*.size), format_file_size(*.max))]
    FileTooLarge { size: u64, max: u64 },
}

/// Programmer-misuse errors raised by the stage tracker. These indicate a bug
/// in the caller, not a runtime condition, and are never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("A pipeline run is already active")]
    AlreadyRunning,

    #[error("Illegal transition for stage '{stage_id}': {from} -> {to}")]
    IllegalTransition {
        stage_id: String,
        from: StageStatus,
        to: StageStatus,
    },

    #[error("Unknown stage id: {0}")]
    UnknownStage(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversize_message_is_human_readable() {
        let err = ValidationError::FileTooLarge {
            size: 11 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "File size 11 MB exceeds the 10 MB limit");
    }

    #[test]
    fn test_umbrella_error_wraps_sources() {
        let err = PipelineError::from(ValidationError::UnsupportedFormat(
            "image/png".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Validation failed: Unsupported file format: image/png"
        );
    }
}
