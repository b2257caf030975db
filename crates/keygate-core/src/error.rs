//! Error types for credential form validation

use thiserror::Error;

use crate::form::Field;

/// A validation failure attached to one slot of the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is empty (or whitespace-only for the username)
    #[error("{} is required", .field.label())]
    Required { field: Field },

    /// PIN is present but is not exactly 5 decimal digits
    #[error("{} must be exactly {} digits", .field.label(), crate::PIN_LENGTH)]
    Format { field: Field },

    /// Externally injected failure, e.g. the authenticator rejected the login
    #[error("{0}")]
    General(String),
}

impl FieldError {
    /// Field the error belongs to, `None` for general errors
    pub fn field(&self) -> Option<Field> {
        match self {
            FieldError::Required { field } | FieldError::Format { field } => Some(*field),
            FieldError::General(_) => None,
        }
    }

    /// Whether this is a missing-value error
    pub fn is_required(&self) -> bool {
        matches!(self, FieldError::Required { .. })
    }

    /// Whether this is a malformed-value error
    pub fn is_format(&self) -> bool {
        matches!(self, FieldError::Format { .. })
    }
}
