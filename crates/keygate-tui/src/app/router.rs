//! Navigation router for screen transitions

use keygate_core::{FocusListeners, FocusSubscription, NavigationHost, ScreenId};

/// Router manages navigation history and focus notifications
///
/// Every screen change emits a focus event for the screen that ends up on
/// top of the stack.
pub struct Router {
    /// Navigation history stack
    history: Vec<ScreenId>,
    /// Maximum history depth
    max_depth: usize,
    /// Focus listeners per screen
    listeners: FocusListeners,
}

impl Router {
    /// Create a router with nothing on the stack
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            max_depth: 20,
            listeners: FocusListeners::new(),
        }
    }

    /// Push a new screen onto the history
    pub fn push(&mut self, screen: ScreenId) {
        if self.history.len() >= self.max_depth {
            self.history.remove(0);
        }
        self.history.push(screen);
        tracing::debug!(%screen, "Navigate");
        self.listeners.notify(screen);
    }

    /// Go back to the previous screen
    ///
    /// The root screen is never popped.
    pub fn back(&mut self) -> Option<ScreenId> {
        if !self.can_go_back() {
            return None;
        }
        self.history.pop();
        let screen = self.current();
        tracing::debug!(%screen, "Navigate back");
        self.listeners.notify(screen);
        Some(screen)
    }

    /// Drop the history and start over at `screen`
    pub fn reset_to(&mut self, screen: ScreenId) {
        self.history.clear();
        self.push(screen);
    }

    /// Screen on top of the stack
    pub fn current(&self) -> ScreenId {
        self.history.last().copied().unwrap_or_default()
    }

    /// Get the breadcrumb trail
    pub fn breadcrumb(&self) -> Vec<&'static str> {
        self.history.iter().map(|s| Self::screen_title(*s)).collect()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Live focus listeners for a screen
    pub fn listener_count(&self, screen: ScreenId) -> usize {
        self.listeners.listener_count(screen)
    }

    /// Get title for a screen
    pub fn screen_title(screen: ScreenId) -> &'static str {
        match screen {
            ScreenId::Login => "Login",
            ScreenId::ChangePin => "Change PIN",
            ScreenId::Home => "Home",
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationHost for Router {
    fn navigate(&mut self, screen: ScreenId) {
        self.push(screen);
    }

    fn subscribe_focus(&mut self, screen: ScreenId) -> FocusSubscription {
        self.listeners.subscribe(screen)
    }
}
