//! Credential form state
//!
//! [`CredentialForm`] owns the username/PIN input, the touched flags and the
//! derived error set. It never talks to the terminal or the authenticator
//! directly: the render surface feeds it events and reads its views back,
//! and [`CredentialForm::submit`] hands valid credentials to an
//! [`AuthDispatcher`].

use std::fmt;

use zeroize::Zeroizing;

use crate::dispatch::AuthDispatcher;
use crate::error::FieldError;
use crate::validation::ValidationErrors;

/// Input slots of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Pin,
}

impl Field {
    /// Every field, in tab order
    pub const ALL: [Field; 2] = [Field::Username, Field::Pin];

    /// Human-readable label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Pin => "Pin",
        }
    }

    /// Next field in tab order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Field::Username => Field::Pin,
            Field::Pin => Field::Username,
        }
    }

    /// Previous field in tab order, wrapping around
    pub fn prev(self) -> Self {
        // Two fields: previous and next coincide
        self.next()
    }
}

/// Initial capacity of a PIN buffer; covers any PIN input without growing
pub const SECRET_BUFFER_CAPACITY: usize = 16;

/// Append to a secret buffer without leaving unwiped copies behind
///
/// `String::push` may reallocate and free the old allocation as-is. Instead,
/// when the buffer is full the contents move into a fresh zeroizing buffer
/// and the old one is wiped on drop.
pub fn push_secret(buffer: &mut Zeroizing<String>, c: char) {
    let needed = buffer.len() + c.len_utf8();
    if buffer.capacity() < needed {
        let mut grown = Zeroizing::new(String::with_capacity(
            needed.max(SECRET_BUFFER_CAPACITY).max(buffer.capacity() * 2),
        ));
        grown.push_str(buffer);
        *buffer = grown;
    }
    buffer.push(c);
}

/// Raw field values
#[derive(Clone, Default)]
pub struct FormValues {
    pub username: String,
    /// Wiped from memory when replaced or dropped
    pub pin: Zeroizing<String>,
}

impl FormValues {
    /// Value of a single field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Pin => &self.pin,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Username => self.username = value,
            Field::Pin => self.pin = Zeroizing::new(value),
        }
    }
}

impl fmt::Debug for FormValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValues")
            .field("username", &self.username)
            .field("pin", &format_args!("<{} chars>", self.pin.chars().count()))
            .finish()
    }
}

/// Which fields have been blurred at least once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub username: bool,
    pub pin: bool,
}

impl Touched {
    /// Touched flag for a field
    pub fn get(&self, field: Field) -> bool {
        match field {
            Field::Username => self.username,
            Field::Pin => self.pin,
        }
    }

    fn mark(&mut self, field: Field) {
        match field {
            Field::Username => self.username = true,
            Field::Pin => self.pin = true,
        }
    }

    fn mark_all(&mut self) {
        self.username = true;
        self.pin = true;
    }

    /// True if any field was touched
    pub fn any(&self) -> bool {
        self.username || self.pin
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Credentials were handed to the dispatcher
    Dispatched,
    /// Validation failed; nothing was dispatched
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    /// Whether the dispatcher was invoked
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched)
    }
}

/// Username + PIN form with touched-gated validation
#[derive(Debug, Clone, Default)]
pub struct CredentialForm {
    values: FormValues,
    touched: Touched,
    errors: ValidationErrors,
    pin_visible: bool,
}

impl CredentialForm {
    /// Create an empty form
    ///
    /// Errors are computed up front so `is_valid` is meaningful before any
    /// input; none are visible until a field is touched.
    pub fn new() -> Self {
        let mut form = Self::default();
        form.revalidate();
        form
    }

    /// Replace a field's value and re-run validation
    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value.into());
        self.revalidate();
    }

    /// Append a character to a field
    pub fn push_char(&mut self, field: Field, c: char) {
        match field {
            Field::Username => self.values.username.push(c),
            Field::Pin => push_secret(&mut self.values.pin, c),
        }
        self.revalidate();
    }

    /// Remove the last character of a field
    pub fn pop_char(&mut self, field: Field) {
        let popped = match field {
            Field::Username => self.values.username.pop(),
            Field::Pin => self.values.pin.pop(),
        };
        if popped.is_some() {
            self.revalidate();
        }
    }

    /// Mark a field touched (user left it) and re-run validation
    pub fn blur(&mut self, field: Field) {
        self.touched.mark(field);
        self.revalidate();
    }

    /// Validate and, if valid, invoke the dispatcher exactly once
    ///
    /// On failure every field is marked touched so all errors become
    /// visible, and nothing else happens.
    pub fn submit<D>(&mut self, dispatcher: &D) -> SubmitOutcome
    where
        D: AuthDispatcher + ?Sized,
    {
        self.revalidate();

        if !self.errors.fields_valid() {
            self.touched.mark_all();
            tracing::debug!(
                errors = self.errors.field_errors().count(),
                "Login submit rejected by validation"
            );
            return SubmitOutcome::Rejected(self.errors.clone());
        }

        tracing::info!(username = %self.values.username, "Dispatching login");
        dispatcher.login_user(&self.values.username, &self.values.pin);
        SubmitOutcome::Dispatched
    }

    /// Clear values, touched flags and every error
    pub fn reset(&mut self) {
        self.values = FormValues::default();
        self.touched = Touched::default();
        self.revalidate();
    }

    /// Flip between masked and plain PIN display
    pub fn toggle_pin_visibility(&mut self) {
        self.pin_visible = !self.pin_visible;
    }

    /// Whether the PIN should be rendered in plain text
    pub fn pin_visible(&self) -> bool {
        self.pin_visible
    }

    /// Record an externally produced failure in the general slot
    ///
    /// The slot is cleared the next time validation runs.
    pub fn set_general_error(&mut self, message: impl Into<String>) {
        self.errors.general = Some(FieldError::General(message.into()));
    }

    /// Externally injected error, if any
    pub fn general_error(&self) -> Option<&FieldError> {
        self.errors.general.as_ref()
    }

    /// Error the render surface should show for a field
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        if self.touched.get(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Full computed error set, including errors for untouched fields
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether both fields currently pass validation
    pub fn is_valid(&self) -> bool {
        self.errors.fields_valid()
    }

    /// Touched flag for a field
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.get(field)
    }

    /// All touched flags
    pub fn touched(&self) -> Touched {
        self.touched
    }

    /// Current raw values
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Value of one field
    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    fn revalidate(&mut self) {
        self.errors = ValidationErrors::compute(&self.values);
    }
}
