//! Local authenticator standing in for the login backend
//!
//! The login form only knows the `AuthDispatcher` trait; this module
//! provides the implementation the terminal app ships with: an argon2 PIN
//! store with progressive lockout, driven by a background task.

mod credentials;
mod lockout;
mod session;
mod worker;

pub use credentials::{CredentialError, CredentialStore};
pub use lockout::LockoutPolicy;
pub use session::Session;
pub use worker::{handle_command, spawn_authenticator, AuthCommand, ChannelDispatcher};

#[cfg(test)]
pub(crate) use credentials::test_params;
