//! Login screen controller: a mounted [`CredentialForm`] wired to its
//! navigation host and auth dispatcher

use crate::dispatch::AuthDispatcher;
use crate::error::FieldError;
use crate::form::{CredentialForm, Field, SubmitOutcome};
use crate::navigation::{FocusSubscription, NavigationHost, ScreenId};

/// Mounted login screen
///
/// Holds the focus subscription for [`ScreenId::Login`] for as long as it
/// lives; dropping the controller is the unmount.
pub struct LoginController<D> {
    form: CredentialForm,
    dispatcher: D,
    focus: FocusSubscription,
}

impl<D: AuthDispatcher> LoginController<D> {
    /// Mount the screen: fresh form, focus subscription on the host
    pub fn mount<H>(host: &mut H, dispatcher: D) -> Self
    where
        H: NavigationHost + ?Sized,
    {
        let focus = host.subscribe_focus(ScreenId::Login);
        tracing::debug!("Login controller mounted");
        Self {
            form: CredentialForm::new(),
            dispatcher,
            focus,
        }
    }

    /// Apply pending focus events; any focus resets the form
    ///
    /// Returns true if a reset happened.
    pub fn sync_navigation(&mut self) -> bool {
        if self.focus.drain() == 0 {
            return false;
        }
        self.form.reset();
        tracing::debug!("Login form reset on focus");
        true
    }

    /// Keystroke-level edit: replace a field's value
    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        self.form.change(field, value);
    }

    /// Append one character to a field
    pub fn on_input(&mut self, field: Field, c: char) {
        self.form.push_char(field, c);
    }

    /// Remove the last character of a field
    pub fn on_backspace(&mut self, field: Field) {
        self.form.pop_char(field);
    }

    /// User left a field
    pub fn on_blur(&mut self, field: Field) {
        self.form.blur(field);
    }

    /// Login button
    pub fn submit(&mut self) -> SubmitOutcome {
        self.form.submit(&self.dispatcher)
    }

    /// Eye icon
    pub fn toggle_pin_visibility(&mut self) {
        self.form.toggle_pin_visibility();
    }

    /// "Change Your PIN" link
    pub fn request_change_pin<H>(&self, host: &mut H)
    where
        H: NavigationHost + ?Sized,
    {
        host.navigate(ScreenId::ChangePin);
    }

    /// Feed an authenticator failure back into the form
    pub fn report_login_failure(&mut self, message: impl Into<String>) {
        self.form.set_general_error(message);
    }

    /// Read-only view for rendering
    pub fn form(&self) -> &CredentialForm {
        &self.form
    }

    /// Convenience for the render surface
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        self.form.visible_error(field)
    }

    /// Dispatcher this controller submits to
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }
}
