//! Navigation seam: screen identifiers, focus subscriptions, navigate requests

use std::fmt;

use tokio::sync::mpsc;

/// Screens a navigation host knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Credential entry
    #[default]
    Login,
    /// PIN change flow
    ChangePin,
    /// Signed-in landing screen
    Home,
}

impl ScreenId {
    /// Stable identifier used in logs and navigation requests
    pub fn name(self) -> &'static str {
        match self {
            ScreenId::Login => "LoginScreen",
            ScreenId::ChangePin => "ChangePinScreen",
            ScreenId::Home => "HomeScreen",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A screen became active (first display or return from another screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub screen: ScreenId,
}

/// Host that owns the screen stack
pub trait NavigationHost {
    /// Request a move to another screen
    fn navigate(&mut self, screen: ScreenId);

    /// Subscribe to focus events for a screen
    ///
    /// The subscription stays live until the returned guard is dropped.
    fn subscribe_focus(&mut self, screen: ScreenId) -> FocusSubscription;
}

/// Scoped focus listener; dropping it unsubscribes
#[derive(Debug)]
pub struct FocusSubscription {
    screen: ScreenId,
    receiver: mpsc::UnboundedReceiver<FocusEvent>,
}

impl FocusSubscription {
    /// Screen this subscription listens to
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    /// Drain queued focus events, returning how many arrived
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.receiver.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Explicit unsubscribe; equivalent to dropping the guard
    pub fn unsubscribe(self) {}
}

/// Listener registry for hosts to embed
#[derive(Debug, Default)]
pub struct FocusListeners {
    senders: Vec<(ScreenId, mpsc::UnboundedSender<FocusEvent>)>,
}

impl FocusListeners {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `screen`
    pub fn subscribe(&mut self, screen: ScreenId) -> FocusSubscription {
        self.prune();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders.push((screen, sender));
        tracing::trace!(%screen, "Focus listener added");
        FocusSubscription { screen, receiver }
    }

    /// Deliver a focus event to every live listener of `screen`
    ///
    /// Returns the number of listeners reached.
    pub fn notify(&mut self, screen: ScreenId) -> usize {
        self.prune();
        let event = FocusEvent { screen };
        self.senders
            .iter()
            .filter(|(s, _)| *s == screen)
            .filter(|(_, sender)| sender.send(event).is_ok())
            .count()
    }

    /// Live listeners for `screen`
    pub fn listener_count(&self, screen: ScreenId) -> usize {
        self.senders
            .iter()
            .filter(|(s, sender)| *s == screen && !sender.is_closed())
            .count()
    }

    fn prune(&mut self) {
        self.senders.retain(|(_, sender)| !sender.is_closed());
    }
}
