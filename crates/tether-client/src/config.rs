//! Session and reconnection configuration.

use std::time::Duration;

/// Configuration for a session client.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a freshly opened connection must stay up before it is
    /// announced stable. A first inbound message confirms stability
    /// immediately, whichever comes first.
    pub stability_period: Duration,

    /// Reconnection policy.
    pub reconnect: ReconnectConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stability_period: Duration::from_secs(2),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stability period.
    pub fn with_stability_period(mut self, period: Duration) -> Self {
        self.stability_period = period;
        self
    }

    /// Sets the reconnection policy.
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }
}

/// Reconnection configuration.
///
/// The delay for attempt `n` is `initial_delay * backoff_factor^n`, capped at
/// `max_delay`, plus a random jitter of up to `jitter`. The result is never
/// zero, so a dead server is never hot-looped against.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt.
    pub initial_delay: Duration,

    /// Upper bound of the random component added to every delay.
    pub jitter: Duration,

    /// Multiplier applied for each further attempt tier.
    pub backoff_factor: f64,

    /// Cap on the computed delay, before jitter.
    pub max_delay: Duration,

    /// Maximum number of consecutive attempts; `None` retries indefinitely.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(750),
            jitter: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(15),
            max_retries: None,
        }
    }
}

impl ReconnectConfig {
    /// Creates a reconnection configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggressive reconnection policy.
    pub fn aggressive() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            jitter: Duration::from_millis(100),
            backoff_factor: 1.5,
            max_delay: Duration::from_secs(5),
            max_retries: None,
        }
    }

    /// Creates a conservative reconnection policy.
    pub fn conservative() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            jitter: Duration::from_secs(1),
            backoff_factor: 2.5,
            max_delay: Duration::from_secs(60),
            max_retries: Some(5),
        }
    }

    /// Sets the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the jitter bound.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the backoff factor.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Whether attempt number `attempt` (zero-based) may go ahead.
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.max_retries.is_none_or(|max| attempt < max)
    }

    /// The delay to wait before attempt number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let grown =
            self.initial_delay.as_secs_f64() * self.backoff_factor.powi(attempt.min(32) as i32);
        let capped = grown.min(self.max_delay.as_secs_f64());
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(fastrand::u64(0..=jitter_ms))
        };
        (Duration::from_secs_f64(capped) + jitter).max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn no_jitter() -> ReconnectConfig {
        ReconnectConfig::new()
            .with_initial_delay(Duration::from_secs(1))
            .with_jitter(Duration::ZERO)
            .with_backoff_factor(2.0)
            .with_max_delay(Duration::from_secs(60))
    }

    #[test]
    fn test_delay_grows_geometrically() {
        let config = no_jitter();
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(2), Duration::from_secs(4));
        assert_eq!(config.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn test_delay_caps_at_max() {
        let config = no_jitter();
        assert_eq!(config.delay_for(10), Duration::from_secs(60));
        assert_eq!(config.delay_for(32), Duration::from_secs(60));
        // Past the exponent clamp the cap still holds
        assert_eq!(config.delay_for(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_delay_is_never_zero() {
        let config = ReconnectConfig::new()
            .with_initial_delay(Duration::ZERO)
            .with_jitter(Duration::ZERO);
        assert!(config.delay_for(0) > Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let config = ReconnectConfig::new()
            .with_initial_delay(Duration::from_millis(750))
            .with_jitter(Duration::from_millis(500));
        for attempt in 0..8 {
            let delay = config.delay_for(attempt);
            assert!(delay >= Duration::from_millis(750));
            assert!(delay <= Duration::from_secs(15) + Duration::from_millis(500));
        }
    }

    #[test]
    fn test_should_retry_unlimited_by_default() {
        let config = ReconnectConfig::default();
        assert!(config.should_retry(0));
        assert!(config.should_retry(1_000_000));
    }

    #[test]
    fn test_should_retry_honours_ceiling() {
        let config = ReconnectConfig::new().with_max_retries(3);
        assert!(config.should_retry(0));
        assert!(config.should_retry(2));
        assert!(!config.should_retry(3));
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new()
            .with_stability_period(Duration::from_secs(5))
            .with_reconnect(ReconnectConfig::aggressive());
        assert_eq!(config.stability_period, Duration::from_secs(5));
        assert_eq!(config.reconnect.initial_delay, Duration::from_millis(100));
    }
}
