//! Keygate terminal login screen
//!
//! Terminal front end for the `keygate-core` credential form: a login
//! screen, a change-PIN screen, and a signed-in home screen backed by a
//! local argon2 credential store.

pub mod app;
pub mod auth;
pub mod ui;

pub use app::App;
