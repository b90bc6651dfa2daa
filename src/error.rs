//! Error handling for the pitfall assessment service
//!
//! One error enum per concern, with a top-level `PitfallError` that the
//! API boundary converts everything into. All of these are per-request
//! failures: none of them leave partial state behind.

use thiserror::Error;
use uuid::Uuid;

use crate::session::Stage;

/// Main error type for the assessment service
#[derive(Error, Debug)]
pub enum PitfallError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),
}

/// Failures raised by the user directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Username '{0}' already exists")]
    DuplicateIdentifier(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Old password is incorrect")]
    WrongOldSecret,

    #[error("New passwords do not match")]
    ConfirmationMismatch,
}

/// Failures raised by the session state machine
#[derive(Error, Debug)]
pub enum SessionError {
    /// A capability was invoked before the session reached the stage that
    /// gates it. The caller is expected to route the user backward.
    #[error("Precondition not met: session must be at least {required}")]
    PreconditionNotMet { required: Stage },

    #[error("Both state and city must be selected")]
    RegionIncomplete,
}

/// Malformed or missing measurement input
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing measurement '{field}'")]
    MissingField { field: &'static str },

    #[error("Measurement '{field}' is not numeric: '{value}'")]
    NotNumeric { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the measurement field the failure is about.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::NotNumeric { field, .. } => field,
        }
    }
}

/// Scorer failed to produce a probability
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ValidationError::MissingField { field: "SlopeDeg" };
        assert_eq!(err.field(), "SlopeDeg");

        let err = ValidationError::NotNumeric {
            field: "MoisturePct",
            value: "wet".to_string(),
        };
        assert_eq!(err.field(), "MoisturePct");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: PitfallError = DirectoryError::InvalidCredentials.into();
        assert!(matches!(
            err,
            PitfallError::Directory(DirectoryError::InvalidCredentials)
        ));

        let err: PitfallError = ScoringError::DimensionMismatch {
            expected: 11,
            got: 10,
        }
        .into();
        assert!(matches!(err, PitfallError::Scoring(_)));
    }
}
