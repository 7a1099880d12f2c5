//! Processor configuration loaded from environment variables.

use std::time::Duration;

const DEFAULT_FULFILLMENT_DELAY_MS: u64 = 2000;

/// Order-processor tuning with sensible defaults.
///
/// Reads from environment variables:
/// - `FULFILLMENT_DELAY_MS` — simulated fulfillment latency in milliseconds
///   (default: `2000`)
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Placeholder for real fulfillment work. The cart's terminal state is
    /// only written after this delay elapses.
    pub fulfillment_delay: Duration,
}

impl ProcessingConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let millis = std::env::var("FULFILLMENT_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FULFILLMENT_DELAY_MS);
        Self {
            fulfillment_delay: Duration::from_millis(millis),
        }
    }

    /// Configuration with no simulated latency, for tests.
    pub fn immediate() -> Self {
        Self {
            fulfillment_delay: Duration::ZERO,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            fulfillment_delay: Duration::from_millis(DEFAULT_FULFILLMENT_DELAY_MS),
        }
    }
}
