//! Simulated upload configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Timing and progress parameters for the simulated upload pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Milliseconds between progress ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Upper bound of the random per-tick increment, in percentage points.
    #[serde(default = "default_max_increment")]
    pub max_increment: f64,
    /// Milliseconds a completed upload stays visible before it is cleared.
    #[serde(default = "default_clear_delay")]
    pub clear_delay_ms: u64,
    /// Seed for the progress generator. Unseeded runs use OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl UploadConfig {
    /// Tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Clear delay as a [`Duration`].
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    /// Reject settings under which uploads could never finish.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.max_increment.is_finite() || self.max_increment <= 0.0 {
            return Err(AppError::configuration(format!(
                "upload.max_increment must be a positive finite number, got {}",
                self.max_increment
            )));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            max_increment: default_max_increment(),
            clear_delay_ms: default_clear_delay(),
            seed: None,
        }
    }
}

fn default_tick_interval() -> u64 {
    200
}

fn default_max_increment() -> f64 {
    20.0
}

fn default_clear_delay() -> u64 {
    1000
}
