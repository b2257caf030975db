//! Application state outside the login controller

use keygate_core::{
    push_secret, validate_pin, validate_username, Field, FieldError, PIN_LENGTH,
};
use zeroize::Zeroizing;

use crate::auth::Session;

/// Longest username the input accepts
pub const MAX_USERNAME_LEN: usize = 32;

/// Longest PIN input accepted; longer than a valid PIN so format errors show
pub const MAX_PIN_INPUT_LEN: usize = 8;

/// Application state
pub struct AppState {
    /// Field with the cursor on the login screen
    pub login_focus: Field,

    /// A login was dispatched and no outcome has arrived yet
    pub login_pending: bool,

    /// Change PIN form
    pub change_pin: ChangePinForm,

    /// Signed-in session, if any
    pub session: Option<Session>,

    /// The expiry warning toast was shown for the current idle stretch
    pub session_warned: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create new application state
    pub fn new() -> Self {
        Self {
            login_focus: Field::Username,
            login_pending: false,
            change_pin: ChangePinForm::default(),
            session: None,
            session_warned: false,
        }
    }
}

/// Input limit for a login field
pub fn max_len(field: Field) -> usize {
    match field {
        Field::Username => MAX_USERNAME_LEN,
        Field::Pin => MAX_PIN_INPUT_LEN,
    }
}

/// Inputs of the Change PIN screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangePinField {
    #[default]
    Username,
    CurrentPin,
    NewPin,
}

impl ChangePinField {
    pub const ALL: [ChangePinField; 3] = [
        ChangePinField::Username,
        ChangePinField::CurrentPin,
        ChangePinField::NewPin,
    ];

    fn index(self) -> usize {
        match self {
            ChangePinField::Username => 0,
            ChangePinField::CurrentPin => 1,
            ChangePinField::NewPin => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChangePinField::Username => "Username",
            ChangePinField::CurrentPin => "Current PIN",
            ChangePinField::NewPin => "New PIN",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_pin(self) -> bool {
        !matches!(self, ChangePinField::Username)
    }

    fn max_len(self) -> usize {
        if self.is_pin() {
            MAX_PIN_INPUT_LEN
        } else {
            MAX_USERNAME_LEN
        }
    }
}

/// Change PIN form with the same touched-gated validation as the login form
#[derive(Default)]
pub struct ChangePinForm {
    username: String,
    current_pin: Zeroizing<String>,
    new_pin: Zeroizing<String>,
    touched: [bool; 3],
    /// Field with the cursor
    pub focus: ChangePinField,
    /// Waiting for the authenticator
    pub pending: bool,
    /// Authenticator rejection
    pub error: Option<String>,
}

impl ChangePinForm {
    /// Value of a field
    pub fn value(&self, field: ChangePinField) -> &str {
        match field {
            ChangePinField::Username => &self.username,
            ChangePinField::CurrentPin => self.current_pin.as_str(),
            ChangePinField::NewPin => self.new_pin.as_str(),
        }
    }

    fn value_mut(&mut self, field: ChangePinField) -> &mut String {
        match field {
            ChangePinField::Username => &mut self.username,
            ChangePinField::CurrentPin => &mut *self.current_pin,
            ChangePinField::NewPin => &mut *self.new_pin,
        }
    }

    /// Append a character to the focused field
    pub fn push_char(&mut self, c: char) {
        let field = self.focus;
        if self.value(field).chars().count() < field.max_len() {
            match field {
                ChangePinField::Username => self.username.push(c),
                ChangePinField::CurrentPin => push_secret(&mut self.current_pin, c),
                ChangePinField::NewPin => push_secret(&mut self.new_pin, c),
            }
        }
        self.error = None;
    }

    /// Remove the last character of the focused field
    pub fn pop_char(&mut self) {
        let field = self.focus;
        self.value_mut(field).pop();
        self.error = None;
    }

    /// Move focus forward, blurring the field being left
    pub fn focus_next(&mut self) {
        self.touched[self.focus.index()] = true;
        self.focus = self.focus.next();
    }

    /// Move focus backward, blurring the field being left
    pub fn focus_prev(&mut self) {
        self.touched[self.focus.index()] = true;
        self.focus = self.focus.prev();
    }

    /// Validation error for a field, regardless of touched state
    pub fn field_error(&self, field: ChangePinField) -> Option<String> {
        let value = self.value(field);
        let result = match field {
            ChangePinField::Username => validate_username(value),
            ChangePinField::CurrentPin | ChangePinField::NewPin => validate_pin(value),
        };

        match result {
            Err(FieldError::Required { .. }) => Some(format!("{} is required", field.label())),
            Err(FieldError::Format { .. }) => Some(format!(
                "{} must be exactly {} digits",
                field.label(),
                PIN_LENGTH
            )),
            Err(FieldError::General(message)) => Some(message),
            Ok(()) if field == ChangePinField::NewPin && *self.new_pin == *self.current_pin => {
                Some("New PIN must differ from the current PIN".to_string())
            }
            Ok(()) => None,
        }
    }

    /// Error to show for a field (touched fields only)
    pub fn visible_error(&self, field: ChangePinField) -> Option<String> {
        if self.touched[field.index()] {
            self.field_error(field)
        } else {
            None
        }
    }

    /// Whether a field has been blurred
    pub fn is_touched(&self, field: ChangePinField) -> bool {
        self.touched[field.index()]
    }

    /// Validate for submission; on failure every field becomes touched
    pub fn check_submit(&mut self) -> bool {
        let valid = ChangePinField::ALL
            .iter()
            .all(|field| self.field_error(*field).is_none());
        if !valid {
            self.touched = [true; 3];
        }
        valid
    }

    /// Forget everything typed so far
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
