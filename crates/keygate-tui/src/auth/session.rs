//! Signed-in session with idle timeout

use std::time::{Duration, Instant};

/// Default idle timeout (5 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Warning period before session expires (60 seconds)
pub const WARNING_PERIOD: Duration = Duration::from_secs(60);

/// Session of a user who logged in through the form
#[derive(Clone, Debug)]
pub struct Session {
    username: String,
    last_activity: Instant,
    timeout: Duration,
    warning_period: Duration,
}

impl Session {
    /// Start a session with the default timeout
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_timeout(username, DEFAULT_TIMEOUT, WARNING_PERIOD)
    }

    /// Start a session with a custom timeout and warning period
    pub fn with_timeout(
        username: impl Into<String>,
        timeout: Duration,
        warning_period: Duration,
    ) -> Self {
        let now = Instant::now();
        Self {
            username: username.into(),
            last_activity: now,
            timeout,
            warning_period: warning_period.min(timeout),
        }
    }

    /// Signed-in user
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Record activity (resets timeout)
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > self.timeout
    }

    /// Check if we're in the warning period
    pub fn is_warning_period(&self) -> bool {
        let elapsed = self.last_activity.elapsed();
        !self.is_expired() && elapsed > self.timeout.saturating_sub(self.warning_period)
    }

    /// Get remaining time until expiry in seconds
    pub fn remaining_seconds(&self) -> u64 {
        self.timeout
            .saturating_sub(self.last_activity.elapsed())
            .as_secs()
    }

    /// Format remaining time as MM:SS
    pub fn remaining_formatted(&self) -> String {
        let secs = self.remaining_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
