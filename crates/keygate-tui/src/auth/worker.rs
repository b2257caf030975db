//! Authenticator task and the channel dispatcher that feeds it

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use keygate_core::AuthDispatcher;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use zeroize::Zeroizing;

use super::credentials::CredentialStore;
use crate::app::Event;

/// Work item for the authenticator
pub enum AuthCommand {
    Login {
        username: String,
        pin: Zeroizing<String>,
        /// Login generation the attempt was made in
        generation: u64,
    },
    ChangePin {
        username: String,
        current_pin: Zeroizing<String>,
        new_pin: Zeroizing<String>,
    },
}

/// [`AuthDispatcher`] that queues commands for the authenticator task
///
/// Every login is stamped with the current generation. Bumping it with
/// [`ChannelDispatcher::invalidate_pending`] marks all logins in flight as
/// stale; their outcomes carry the old number and can be dropped.
#[derive(Clone)]
pub struct ChannelDispatcher {
    commands: mpsc::UnboundedSender<AuthCommand>,
    generation: Arc<AtomicU64>,
}

impl ChannelDispatcher {
    /// Wrap an existing command sender
    pub fn new(commands: mpsc::UnboundedSender<AuthCommand>) -> Self {
        Self {
            commands,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generation stamped on logins sent now
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new generation; returns it
    pub fn invalidate_pending(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Queue a PIN change
    pub fn change_pin(&self, username: &str, current_pin: &str, new_pin: &str) {
        self.send(AuthCommand::ChangePin {
            username: username.to_string(),
            current_pin: Zeroizing::new(current_pin.to_string()),
            new_pin: Zeroizing::new(new_pin.to_string()),
        });
    }

    fn send(&self, command: AuthCommand) {
        if self.commands.send(command).is_err() {
            tracing::error!("Authenticator is not running; command dropped");
        }
    }
}

impl AuthDispatcher for ChannelDispatcher {
    fn login_user(&self, username: &str, pin: &str) {
        self.send(AuthCommand::Login {
            username: username.to_string(),
            pin: Zeroizing::new(pin.to_string()),
            generation: self.generation(),
        });
    }
}

/// Execute one command against the store and describe the outcome
pub fn handle_command(store: &mut CredentialStore, command: AuthCommand) -> Event {
    match command {
        AuthCommand::Login {
            username,
            pin,
            generation,
        } => match store.verify(&username, &pin) {
            Ok(()) => {
                tracing::info!(%username, "Login accepted");
                Event::LoginSucceeded {
                    username,
                    generation,
                }
            }
            Err(e) => {
                tracing::info!(%username, "Login rejected: {}", e);
                Event::LoginFailed {
                    reason: e.to_string(),
                    generation,
                }
            }
        },
        AuthCommand::ChangePin {
            username,
            current_pin,
            new_pin,
        } => match store.change_pin(&username, &current_pin, &new_pin) {
            Ok(()) => Event::PinChanged { username },
            Err(e) => {
                tracing::info!(%username, "PIN change rejected: {}", e);
                Event::PinChangeFailed {
                    reason: e.to_string(),
                }
            }
        },
    }
}

/// Start the authenticator on the blocking pool
///
/// Argon2 verification is CPU-bound, so the loop runs on a blocking thread
/// and exits once every dispatcher clone or the event receiver is gone.
pub fn spawn_authenticator(
    mut store: CredentialStore,
    events: mpsc::UnboundedSender<Event>,
) -> (ChannelDispatcher, JoinHandle<()>) {
    let (commands, mut receiver) = mpsc::unbounded_channel();

    let handle = tokio::task::spawn_blocking(move || {
        tracing::debug!("Authenticator started");
        while let Some(command) = receiver.blocking_recv() {
            let event = handle_command(&mut store, command);
            if events.send(event).is_err() {
                break;
            }
        }
        tracing::debug!("Authenticator stopped");
    });

    (ChannelDispatcher::new(commands), handle)
}
