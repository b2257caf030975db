//! Property-based tests for keygate-core using proptest
//!
//! These tests verify invariants that should hold for all inputs.

use std::cell::RefCell;

use proptest::prelude::*;
use keygate_core::{
    validate_pin, validate_username, AuthDispatcher, CredentialForm, Field, FocusListeners,
    FocusSubscription, LoginController, NavigationHost, ScreenId, SubmitOutcome,
};

// ============================================
// Test Doubles
// ============================================

#[derive(Default)]
struct RecordingDispatcher {
    calls: RefCell<Vec<(String, String)>>,
}

impl AuthDispatcher for RecordingDispatcher {
    fn login_user(&self, username: &str, pin: &str) {
        self.calls
            .borrow_mut()
            .push((username.to_owned(), pin.to_owned()));
    }
}

#[derive(Default)]
struct TestHost {
    listeners: FocusListeners,
}

impl NavigationHost for TestHost {
    fn navigate(&mut self, screen: ScreenId) {
        self.listeners.notify(screen);
    }

    fn subscribe_focus(&mut self, screen: ScreenId) -> FocusSubscription {
        self.listeners.subscribe(screen)
    }
}

// ============================================
// Strategies
// ============================================

fn arb_valid_pin() -> impl Strategy<Value = String> {
    "[0-9]{5}"
}

fn arb_malformed_pin() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[0-9]{6,16}",
        ".{1,12}".prop_filter("must not be five ascii digits", |s| {
            !(s.len() == 5 && s.bytes().all(|b| b.is_ascii_digit()))
        }),
    ]
}

fn arb_username() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{1,24}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t]{0,6}"
}

// ============================================
// Validation Properties
// ============================================

proptest! {
    #[test]
    fn prop_malformed_pin_is_format_error(pin in arb_malformed_pin()) {
        let err = validate_pin(&pin).unwrap_err();
        prop_assert!(err.is_format());
    }

    #[test]
    fn prop_five_digit_pin_passes(pin in arb_valid_pin()) {
        prop_assert!(validate_pin(&pin).is_ok());
    }

    #[test]
    fn prop_blank_username_is_required(username in arb_blank(), pin in prop_oneof![arb_valid_pin(), arb_malformed_pin()]) {
        prop_assert!(validate_username(&username).unwrap_err().is_required());

        let mut form = CredentialForm::new();
        form.change(Field::Username, username);
        form.change(Field::Pin, pin);
        prop_assert!(form.errors().get(Field::Username).unwrap().is_required());
    }
}

// ============================================
// Submit Properties
// ============================================

proptest! {
    #[test]
    fn prop_valid_submit_dispatches_once(username in arb_username(), pin in arb_valid_pin()) {
        let dispatcher = RecordingDispatcher::default();
        let mut form = CredentialForm::new();
        form.change(Field::Username, username.clone());
        form.change(Field::Pin, pin.clone());

        prop_assert_eq!(form.submit(&dispatcher), SubmitOutcome::Dispatched);
        prop_assert_eq!(dispatcher.calls.into_inner(), vec![(username, pin)]);
    }

    #[test]
    fn prop_invalid_submit_dispatches_nothing(username in prop_oneof![arb_username(), arb_blank()], pin in arb_malformed_pin()) {
        let dispatcher = RecordingDispatcher::default();
        let mut form = CredentialForm::new();
        form.change(Field::Username, username);
        form.change(Field::Pin, pin);

        let outcome = form.submit(&dispatcher);
        prop_assert!(!outcome.is_dispatched());
        prop_assert!(dispatcher.calls.borrow().is_empty());
        prop_assert!(form.is_touched(Field::Username));
        prop_assert!(form.is_touched(Field::Pin));
        prop_assert!(form.visible_error(Field::Pin).is_some());
    }
}

// ============================================
// Reset and Visibility Properties
// ============================================

proptest! {
    #[test]
    fn prop_focus_always_resets(
        username in ".{0,16}",
        pin in ".{0,8}",
        touch_username in any::<bool>(),
        touch_pin in any::<bool>(),
        general in prop::option::of("[a-z ]{1,20}"),
    ) {
        let mut host = TestHost::default();
        let mut controller = LoginController::mount(&mut host, RecordingDispatcher::default());

        controller.on_change(Field::Username, username);
        controller.on_change(Field::Pin, pin);
        if touch_username {
            controller.on_blur(Field::Username);
        }
        if touch_pin {
            controller.on_blur(Field::Pin);
        }
        if let Some(message) = general {
            controller.report_login_failure(message);
        }

        host.navigate(ScreenId::Login);
        prop_assert!(controller.sync_navigation());

        let form = controller.form();
        prop_assert_eq!(form.value(Field::Username), "");
        prop_assert_eq!(form.value(Field::Pin), "");
        prop_assert!(!form.touched().any());
        prop_assert!(form.visible_error(Field::Username).is_none());
        prop_assert!(form.visible_error(Field::Pin).is_none());
        prop_assert!(form.general_error().is_none());
    }

    #[test]
    fn prop_double_toggle_is_identity(pin in ".{0,8}", start_visible in any::<bool>()) {
        let mut form = CredentialForm::new();
        form.change(Field::Pin, pin.clone());
        if start_visible {
            form.toggle_pin_visibility();
        }
        let before = form.pin_visible();

        form.toggle_pin_visibility();
        form.toggle_pin_visibility();

        prop_assert_eq!(form.pin_visible(), before);
        prop_assert_eq!(form.value(Field::Pin), pin.as_str());
    }
}
