//! Application state and event handling

mod config;
mod events;
mod router;
mod state;

pub use config::{ConfigError, TuiConfig};
pub use events::{Event, EventHandler};
pub use router::Router;
pub use state::{max_len, AppState, ChangePinField, ChangePinForm};

use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keygate_core::{
    Field, FocusSubscription, LoginController, NavigationHost, ScreenId, SubmitOutcome,
};
use ratatui::prelude::*;

use crate::auth::{spawn_authenticator, ChannelDispatcher, CredentialStore, Session};
use crate::ui::{self, components::notification::{Notification, NotificationManager}, Theme};

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Screen stack and focus notifications
    pub router: Router,

    /// Mounted login form
    pub login: LoginController<ChannelDispatcher>,

    /// Focus events for the Change PIN screen
    change_pin_focus: FocusSubscription,

    /// Color palette
    pub theme: Theme,

    /// Loaded configuration
    pub config: TuiConfig,

    /// Toasts
    pub notifications: NotificationManager,

    /// Keyboard and background events
    events: EventHandler,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    /// Last tick time
    last_tick: Instant,
}

impl App {
    /// Create the app, loading the credential store named in `config`
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: TuiConfig) -> anyhow::Result<Self> {
        let store = CredentialStore::load(config.credentials_path.clone()).with_context(|| {
            format!(
                "Failed to load credentials from {}",
                config.credentials_path.display()
            )
        })?;
        if store.is_empty() {
            tracing::warn!("No users enrolled; run `keygate enroll --username <name>` first");
        }
        Ok(Self::with_store(config, store))
    }

    /// Create the app around an already loaded store
    pub fn with_store(config: TuiConfig, store: CredentialStore) -> Self {
        let events = EventHandler::new(config.tick_rate());
        let (dispatcher, _authenticator) = spawn_authenticator(store, events.sender());

        let mut router = Router::new();
        let login = LoginController::mount(&mut router, dispatcher);
        let change_pin_focus = router.subscribe_focus(ScreenId::ChangePin);
        router.push(ScreenId::Login);

        let theme = if config.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::default()
        };

        let mut app = Self {
            state: AppState::new(),
            router,
            login,
            change_pin_focus,
            theme,
            config,
            notifications: NotificationManager::new(),
            events,
            should_quit: false,
            tick: 0,
            last_tick: Instant::now(),
        };
        app.sync_navigation();
        app
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let tick_rate = self.config.tick_rate();

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = tick_rate
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if let Some(key) = self.events.poll_keyboard(timeout)? {
                self.handle_key(key);
            }

            while let Some(event) = self.events.try_recv() {
                self.handle_event(event);
            }

            if self.last_tick.elapsed() >= tick_rate {
                self.on_tick();
                self.last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.router.current() {
            ScreenId::Login => self.handle_login_key(key),
            ScreenId::ChangePin => self.handle_change_pin_key(key),
            ScreenId::Home => self.handle_home_key(key),
        }

        self.sync_navigation();
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        let focus = self.state.login_focus;

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => {
                self.login.on_blur(focus);
                self.state.login_focus = focus.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.login.on_blur(focus);
                self.state.login_focus = focus.prev();
            }
            KeyCode::Enter => {
                if let SubmitOutcome::Rejected(errors) = self.login.submit() {
                    // Put the cursor on the first broken field
                    if let Some(field) = errors.field_errors().find_map(|e| e.field()) {
                        self.state.login_focus = field;
                    }
                } else {
                    self.state.login_pending = true;
                }
            }
            KeyCode::F(2) => self.login.toggle_pin_visibility(),
            KeyCode::F(3) => self.login.request_change_pin(&mut self.router),
            KeyCode::Backspace => self.login.on_backspace(focus),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.login.form().value(focus).chars().count() < max_len(focus) {
                    self.login.on_input(focus, c);
                }
            }
            _ => {}
        }
    }

    fn handle_change_pin_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.change_pin;

        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => {
                if form.pending || !form.check_submit() {
                    return;
                }
                self.login.dispatcher().change_pin(
                    form.value(ChangePinField::Username),
                    form.value(ChangePinField::CurrentPin),
                    form.value(ChangePinField::NewPin),
                );
                form.pending = true;
            }
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.push_char(c)
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        if let Some(session) = self.state.session.as_mut() {
            session.touch();
            self.state.session_warned = false;
        }

        match key.code {
            KeyCode::Char('l') | KeyCode::Char('L') => self.logout("Logged out"),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Apply an event posted by a background task
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::LoginSucceeded {
                username,
                generation,
            } => {
                if !self.is_current_login(generation) {
                    tracing::debug!(%username, generation, "Ignoring stale login result");
                    return;
                }
                self.state.login_pending = false;
                self.notifications
                    .push(Notification::success(format!("Welcome, {}", username)));
                self.state.session = Some(Session::with_timeout(
                    username,
                    self.config.session_timeout(),
                    self.config.session_warning(),
                ));
                self.router.navigate(ScreenId::Home);
            }
            Event::LoginFailed { reason, generation } => {
                if !self.is_current_login(generation) {
                    tracing::debug!(generation, "Ignoring stale login failure");
                    return;
                }
                self.state.login_pending = false;
                self.login.report_login_failure(reason);
            }
            Event::PinChanged { username } => {
                self.state.change_pin.pending = false;
                self.notifications
                    .push(Notification::success(format!("PIN updated for {}", username)));
                if self.router.current() == ScreenId::ChangePin {
                    self.go_back();
                }
            }
            Event::PinChangeFailed { reason } => {
                self.state.change_pin.pending = false;
                self.notifications
                    .push(Notification::error("PIN was not changed"));
                self.state.change_pin.error = Some(reason);
            }
        }

        self.sync_navigation();
    }

    /// Advance timers: toasts and session expiry
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.notifications.tick();

        let Some(session) = self.state.session.as_ref() else {
            return;
        };
        if session.is_expired() {
            self.logout("Session expired");
            self.sync_navigation();
        } else if session.is_warning_period() && !self.state.session_warned {
            self.state.session_warned = true;
            self.notifications.push(Notification::warning(format!(
                "Session ends in {}",
                session.remaining_formatted()
            )));
        }
    }

    fn logout(&mut self, message: &str) {
        self.state.session_warned = false;
        if let Some(session) = self.state.session.take() {
            tracing::info!(username = session.username(), "{}", message);
        }
        self.notifications.push(Notification::info(message));
        self.router.reset_to(ScreenId::Login);
    }

    fn go_back(&mut self) {
        if self.router.back().is_none() {
            self.router.reset_to(ScreenId::Login);
        }
    }

    /// Outcome belongs to a login made on the form as it is now
    fn is_current_login(&self, generation: u64) -> bool {
        self.router.current() == ScreenId::Login
            && generation == self.login.dispatcher().generation()
    }

    /// Deliver pending focus events to the screens
    fn sync_navigation(&mut self) {
        if self.login.sync_navigation() {
            // Logins sent from the wiped form no longer count
            self.login.dispatcher().invalidate_pending();
            self.state.login_focus = Field::Username;
            self.state.login_pending = false;
        }
        if self.change_pin_focus.drain() > 0 {
            self.state.change_pin.reset();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{test_params, LockoutPolicy};
    use crate::ui::components::notification::NotificationLevel;
    use rstest::rstest;
    use tempfile::TempDir;

    /// App with `alice` / `12345` enrolled
    pub(crate) fn test_app() -> (App, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::load_with(
            temp_dir.path().join("credentials.json"),
            test_params(),
            LockoutPolicy::default(),
        )
        .unwrap();
        store.enroll("alice", "12345").unwrap();

        let config = TuiConfig {
            credentials_path: store.path().to_path_buf(),
            ..TuiConfig::default()
        };
        (App::with_store(config, store), temp_dir)
    }

    pub(crate) fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub(crate) fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn pump(app: &mut App) {
        let event = app.events.recv().await.expect("event channel open");
        app.handle_event(event);
    }

    #[tokio::test]
    async fn test_starts_on_login() {
        let (app, _dir) = test_app();
        assert_eq!(app.router.current(), ScreenId::Login);
        assert_eq!(app.state.login_focus, Field::Username);
        assert_eq!(app.router.listener_count(ScreenId::Login), 1);
    }

    #[rstest]
    #[case(KeyCode::Tab)]
    #[case(KeyCode::Down)]
    #[case(KeyCode::Up)]
    #[case(KeyCode::BackTab)]
    #[tokio::test]
    async fn test_focus_keys_blur_current_field(#[case] key: KeyCode) {
        let (mut app, _dir) = test_app();
        press(&mut app, key);

        assert_eq!(app.state.login_focus, Field::Pin);
        assert_eq!(
            app.login
                .visible_error(Field::Username)
                .map(ToString::to_string)
                .as_deref(),
            Some("Username is required")
        );
        assert!(app.login.visible_error(Field::Pin).is_none());
    }

    #[tokio::test]
    async fn test_invalid_submit_stays_local() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12");
        press(&mut app, KeyCode::Enter);

        assert!(!app.state.login_pending);
        assert_eq!(app.state.login_focus, Field::Username);
        assert!(app.login.form().is_touched(Field::Pin));
        assert!(app.events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_successful_login_opens_home() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Enter);
        assert!(app.state.login_pending);

        pump(&mut app).await;

        assert_eq!(app.router.current(), ScreenId::Home);
        assert_eq!(
            app.state.session.as_ref().map(Session::username),
            Some("alice")
        );
        assert!(!app.state.login_pending);
    }

    #[tokio::test]
    async fn test_failed_login_sets_general_error() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "99999");
        press(&mut app, KeyCode::Enter);

        pump(&mut app).await;

        assert_eq!(app.router.current(), ScreenId::Login);
        let general = app.login.form().general_error().unwrap().to_string();
        assert!(general.starts_with("Invalid username or PIN"));

        // Editing clears it again
        press(&mut app, KeyCode::Backspace);
        assert!(app.login.form().general_error().is_none());
    }

    #[tokio::test]
    async fn test_change_pin_round_trip_resets_login() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1234");

        press(&mut app, KeyCode::F(3));
        assert_eq!(app.router.current(), ScreenId::ChangePin);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.router.current(), ScreenId::Login);
        assert_eq!(app.login.form().value(Field::Username), "");
        assert_eq!(app.login.form().value(Field::Pin), "");
        assert_eq!(app.state.login_focus, Field::Username);
    }

    #[tokio::test]
    async fn test_change_pin_submits_to_authenticator() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::F(3));

        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "67890");
        press(&mut app, KeyCode::Enter);
        assert!(app.state.change_pin.pending);

        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Login);

        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "67890");
        press(&mut app, KeyCode::Enter);
        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Home);
    }

    #[tokio::test]
    async fn test_login_outcome_after_form_reset_is_dropped() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Enter);

        // Leave and come back before the authenticator answers
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.login.form().value(Field::Username), "");

        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Login);
        assert!(app.state.session.is_none());
        assert!(app.login.form().general_error().is_none());

        // A fresh attempt from the reset form still goes through
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Enter);
        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Home);
    }

    #[tokio::test]
    async fn test_stale_failure_keeps_new_attempt_pending() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "99999");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Esc);

        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Enter);

        pump(&mut app).await;
        assert!(app.state.login_pending);
        assert!(app.login.form().general_error().is_none());

        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Home);
    }

    #[tokio::test]
    async fn test_visibility_toggle() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "123");
        press(&mut app, KeyCode::F(2));
        assert!(app.login.form().pin_visible());
        press(&mut app, KeyCode::F(2));
        assert!(!app.login.form().pin_visible());
        assert_eq!(app.login.form().value(Field::Pin), "123");
    }

    #[tokio::test]
    async fn test_logout_returns_to_empty_login() {
        let (mut app, _dir) = test_app();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Enter);
        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::Home);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.router.current(), ScreenId::Login);
        assert!(app.state.session.is_none());
        assert_eq!(app.login.form().value(Field::Username), "");
        assert!(!app.router.can_go_back());
    }

    #[tokio::test]
    async fn test_session_expiry_logs_out() {
        let (mut app, _dir) = test_app();
        app.state.session = Some(Session::with_timeout(
            "alice",
            Duration::ZERO,
            Duration::ZERO,
        ));
        app.router.navigate(ScreenId::Home);
        std::thread::sleep(Duration::from_millis(5));

        app.on_tick();
        assert_eq!(app.router.current(), ScreenId::Login);
        assert!(app.state.session.is_none());
    }

    #[tokio::test]
    async fn test_session_warning_shown_once() {
        let (mut app, _dir) = test_app();
        app.state.session = Some(Session::with_timeout(
            "alice",
            Duration::from_secs(60),
            Duration::from_secs(60),
        ));
        app.router.navigate(ScreenId::Home);
        std::thread::sleep(Duration::from_millis(2));

        app.on_tick();
        app.on_tick();
        assert!(app.state.session_warned);
        assert_eq!(app.notifications.len(), 1);
        assert_eq!(
            app.notifications.latest().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );
    }

    #[tokio::test]
    async fn test_failed_pin_change_keeps_form() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::F(3));
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "54321");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "67890");
        press(&mut app, KeyCode::Enter);

        pump(&mut app).await;
        assert_eq!(app.router.current(), ScreenId::ChangePin);
        assert!(!app.state.change_pin.pending);
        assert!(app.state.change_pin.error.is_some());
        assert_eq!(app.state.change_pin.value(ChangePinField::Username), "alice");
    }

    #[tokio::test]
    async fn test_pin_input_limit() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1234567890");
        assert_eq!(app.login.form().value(Field::Pin), "12345678");
    }
}
