//! Portal error types.
//!
//! Every fallible operation in the scoring and storage pipeline returns a
//! [`PortalError`] so callers can tell validation failures (nothing was
//! written) apart from I/O failures (something may have been written).

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the scoring, recording, and storage layers.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Input failed a validation check.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Two sequences that must be aligned have different lengths.
    #[error("length mismatch: expected {expected} {what}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A subject or student identifier cannot be used as a path component.
    #[error("invalid {kind} identifier: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// No question set has been published for the subject.
    #[error("no question set published for subject {0:?}")]
    NoQuestionSet(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The aggregate file has rows that could not be parsed, so rewriting
    /// it would lose them.
    #[error("refusing to rewrite {}: {rows} unreadable row(s)", path.display())]
    UnreadableAggregate { path: PathBuf, rows: usize },

    /// A CSV file could not be written or its header could not be read.
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PortalError {
    /// Returns `true` if this error was raised before anything was persisted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PortalError::Validation(_)
                | PortalError::LengthMismatch { .. }
                | PortalError::InvalidIdentifier { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PortalError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PortalError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(PortalError::Validation("x".into()).is_validation());
        assert!(PortalError::LengthMismatch {
            what: "answers",
            expected: 2,
            actual: 1
        }
        .is_validation());
        assert!(!PortalError::NoQuestionSet("Math".into()).is_validation());
        assert!(!PortalError::io(
            "x.csv",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full")
        )
        .is_validation());
    }

    #[test]
    fn length_mismatch_message() {
        let err = PortalError::LengthMismatch {
            what: "grammar counts",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: expected 3 grammar counts, got 2"
        );
    }
}
