//! Keygate Core - credential form controller
//!
//! This crate holds the part of the Keygate login screen that has behavior:
//! the username/PIN form, its validation rules, and the seams through which
//! it talks to an auth dispatcher and a navigation host. Rendering lives in
//! `keygate-tui`.

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod navigation;
pub mod validation;

pub use controller::LoginController;
pub use dispatch::AuthDispatcher;
pub use error::FieldError;
pub use form::{
    push_secret, CredentialForm, Field, FormValues, SubmitOutcome, Touched,
    SECRET_BUFFER_CAPACITY,
};
pub use navigation::{FocusEvent, FocusListeners, FocusSubscription, NavigationHost, ScreenId};
pub use validation::{validate_pin, validate_username, ValidationErrors};

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 5;
