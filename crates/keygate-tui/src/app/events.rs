//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

/// Events posted to the UI loop from background tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Authenticator accepted the credentials
    LoginSucceeded { username: String, generation: u64 },
    /// Authenticator rejected the credentials
    LoginFailed { reason: String, generation: u64 },
    /// PIN change was stored
    PinChanged { username: String },
    /// PIN change was refused
    PinChangeFailed { reason: String },
}

/// Keyboard polling plus a channel for background events
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
    /// How long a keyboard poll may block
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            tick_rate,
        }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Tick rate used for keyboard polling
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for a key press, waiting at most `timeout`
    ///
    /// Release and repeat events are dropped.
    pub fn poll_keyboard(&self, timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}
