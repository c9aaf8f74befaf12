use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window throttle for login attempts, keyed by client.
pub struct LoginThrottle {
    max_attempts: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl LoginThrottle {
    /// 5 attempts per 5 minutes.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(300);

    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Records an attempt for `key`. Returns how long the client has to
    /// wait when the budget is already spent.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = self.window;
        attempts.retain(|_, seen| {
            while seen
                .front()
                .is_some_and(|&t| now.duration_since(t) >= window)
            {
                seen.pop_front();
            }
            !seen.is_empty()
        });

        let seen = attempts.entry(key.to_string()).or_default();

        if seen.len() >= self.max_attempts {
            let oldest = seen.front().copied().unwrap_or(now);
            return Err(window.saturating_sub(now.duration_since(oldest)));
        }

        seen.push_back(now);
        Ok(())
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_WINDOW)
    }
}
