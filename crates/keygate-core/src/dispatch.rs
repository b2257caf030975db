//! Auth dispatcher seam
//!
//! The form hands validated credentials to an [`AuthDispatcher`] and moves
//! on. Whatever the dispatcher does with them (verify locally, call a
//! server) happens outside the form, and so does reporting the outcome.

use std::sync::Arc;

/// Receiver of validated login attempts
///
/// Implementations must not block: the call is fire-and-forget from the
/// form's point of view.
pub trait AuthDispatcher {
    /// Start a login for the given credentials
    fn login_user(&self, username: &str, pin: &str);
}

impl<D: AuthDispatcher + ?Sized> AuthDispatcher for &D {
    fn login_user(&self, username: &str, pin: &str) {
        (**self).login_user(username, pin)
    }
}

impl<D: AuthDispatcher + ?Sized> AuthDispatcher for Arc<D> {
    fn login_user(&self, username: &str, pin: &str) {
        (**self).login_user(username, pin)
    }
}
