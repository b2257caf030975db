//! Brute-force protection through progressive lockout

use std::time::Duration;

/// Lockout policy for failed login attempts
#[derive(Clone, Debug)]
pub struct LockoutPolicy {
    /// Thresholds and their corresponding lockout durations
    /// Format: (min_attempts, lockout_duration)
    thresholds: Vec<(u32, Duration)>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            thresholds: vec![
                // Attempts 1-3: No lockout
                (4, Duration::from_secs(30)),
                (6, Duration::from_secs(5 * 60)),
                (8, Duration::from_secs(30 * 60)),
                (10, Duration::from_secs(24 * 60 * 60)),
            ],
        }
    }
}

impl LockoutPolicy {
    /// Build a policy from explicit thresholds, sorted by attempt count
    pub fn custom(mut thresholds: Vec<(u32, Duration)>) -> Self {
        thresholds.sort_by_key(|(min, _)| *min);
        Self { thresholds }
    }

    /// Lockout duration that applies after `failed_attempts` failures
    pub fn lockout_duration(&self, failed_attempts: u32) -> Option<Duration> {
        self.thresholds
            .iter()
            .rev()
            .find(|(min, _)| failed_attempts >= *min)
            .map(|(_, duration)| *duration)
    }

    /// Failures allowed before the first lockout kicks in
    pub fn max_attempts(&self) -> u32 {
        self.thresholds.first().map(|(min, _)| *min).unwrap_or(u32::MAX)
    }

    /// Attempts left before the first lockout
    pub fn attempts_remaining(&self, failed_attempts: u32) -> u32 {
        self.max_attempts().saturating_sub(failed_attempts)
    }

    /// Time left on a lockout that started at `last_failed_at` (unix seconds)
    ///
    /// `None` when no lockout applies or it has already elapsed.
    pub fn remaining(&self, failed_attempts: u32, last_failed_at: i64, now: i64) -> Option<Duration> {
        let duration = self.lockout_duration(failed_attempts)?;
        let until = last_failed_at.saturating_add(duration.as_secs() as i64);
        if now >= until {
            return None;
        }
        Some(Duration::from_secs((until - now) as u64))
    }
}

/// Human-readable rendering of a lockout length
pub fn describe(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{} seconds", secs)
    } else if secs < 3600 {
        format!("{} minutes", secs.div_ceil(60))
    } else {
        format!("{} hours", secs.div_ceil(3600))
    }
}
