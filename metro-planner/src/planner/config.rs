//! Configuration for the route planner.

use std::time::Duration;

/// Default cap on expansion steps per search.
pub const DEFAULT_MAX_STEPS: usize = 80;

/// Default pause between the distance phase and the line-ordering phase.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(1);

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of frontier expansions before giving up.
    pub max_steps: usize,

    /// Pause observed between fetching distance estimates and fetching
    /// per-line station orderings, to stay within the API request quota.
    pub rate_limit_delay: Duration,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_steps: usize, rate_limit_delay: Duration) -> Self {
        Self {
            max_steps,
            rate_limit_delay,
        }
    }

    /// Set the expansion cap.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the rate-limit pause.
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.max_steps, 80);
        assert_eq!(config.rate_limit_delay, Duration::from_secs(1));
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(10, Duration::from_millis(250));

        assert_eq!(config.max_steps, 10);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(250));
    }

    #[test]
    fn builder_methods() {
        let config = PlannerConfig::default()
            .with_max_steps(5)
            .with_rate_limit_delay(Duration::ZERO);

        assert_eq!(config.max_steps, 5);
        assert!(config.rate_limit_delay.is_zero());
    }
}
