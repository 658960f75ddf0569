/// Error types for the scheduling service.
///
/// Every failure is recoverable: the caller reports it and tries again,
/// and the service state is left exactly as it was before the call.

use crate::models::EntityKind;
use thiserror::Error;

/// Input that fails field-level validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid {field}: '{value}' is not a valid number")]
    MalformedNumber { field: &'static str, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} with ID {id} not found")]
    ReferenceNotFound { kind: EntityKind, id: u32 },

    #[error("Invalid date/time '{input}'. Please use '{expected}'")]
    DateFormat { input: String, expected: &'static str },
}

impl SchedulingError {
    pub fn not_found(kind: EntityKind, id: u32) -> Self {
        SchedulingError::ReferenceNotFound { kind, id }
    }
}
