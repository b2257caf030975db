//! Validation ruleset for the credential form
//!
//! Rules are pure functions over the raw field text. The form re-runs them
//! on every change, blur and submit and keeps the result in
//! [`ValidationErrors`]; whether an error is shown is decided by the form's
//! touched flags, not here.

use crate::error::FieldError;
use crate::form::{Field, FormValues};
use crate::PIN_LENGTH;

/// Username must contain at least one non-whitespace character
pub fn validate_username(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required {
            field: Field::Username,
        });
    }
    Ok(())
}

/// PIN must be present and exactly [`PIN_LENGTH`] ASCII digits
pub fn validate_pin(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required { field: Field::Pin });
    }
    if !is_well_formed_pin(value) {
        return Err(FieldError::Format { field: Field::Pin });
    }
    Ok(())
}

/// Equivalent of `^\d{5}$` restricted to ASCII digits
pub fn is_well_formed_pin(value: &str) -> bool {
    value.len() == PIN_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Errors computed for the whole form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub username: Option<FieldError>,
    pub pin: Option<FieldError>,
    /// Populated from outside the form (authenticator feedback)
    pub general: Option<FieldError>,
}

impl ValidationErrors {
    /// Validate every field of the form
    pub fn compute(values: &FormValues) -> Self {
        Self {
            username: validate_username(&values.username).err(),
            pin: validate_pin(&values.pin).err(),
            general: None,
        }
    }

    /// Error for a single field
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        match field {
            Field::Username => self.username.as_ref(),
            Field::Pin => self.pin.as_ref(),
        }
    }

    /// True when no field-level error is present
    ///
    /// The general slot does not block submission.
    pub fn fields_valid(&self) -> bool {
        self.username.is_none() && self.pin.is_none()
    }

    /// True when nothing at all is recorded
    pub fn is_empty(&self) -> bool {
        self.fields_valid() && self.general.is_none()
    }

    /// Iterate over field-level errors in field order
    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.username.iter().chain(self.pin.iter())
    }
}
