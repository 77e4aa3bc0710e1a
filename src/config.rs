use std::time::Duration;

use bon::Builder;

use crate::axis::AxisId;

/// Poll rate used when a configuration does not name one.
pub const DEFAULT_POLL_RATE_HZ: f64 = 1.0;

/// Configuration for one simulated axis.
///
/// ```ignore
/// let config = AxisConfig::builder()
///     .id(1)
///     .limit_low(-1000)
///     .limit_high(1000)
///     .poll_rate_hz(10.0)
///     .initial_position(250.0)
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct AxisConfig {
    /// Unique device id.
    #[builder(into)]
    pub id: AxisId,

    /// Lower soft limit in counts.
    pub limit_low: i32,

    /// Upper soft limit in counts. Must not be below `limit_low`.
    pub limit_high: i32,

    /// How often the axis is polled, in Hz.
    #[builder(default = DEFAULT_POLL_RATE_HZ)]
    pub poll_rate_hz: f64,

    /// Position restored into the counter when the axis is registered, e.g. from saved state.
    pub initial_position: Option<f64>,
}

impl AxisConfig {
    /// The time between two polls, the reciprocal of the poll rate.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        if !(self.poll_rate_hz.is_finite() && self.poll_rate_hz > 0.0) {
            return Err(ConfigError::InvalidPollRate(self.poll_rate_hz));
        }

        Duration::try_from_secs_f64(self.poll_rate_hz.recip())
            .map_err(|_| ConfigError::InvalidPollRate(self.poll_rate_hz))
    }

    /// Check every field, returning the poll interval on success.
    pub fn validate(&self) -> Result<Duration, ConfigError> {
        if self.limit_low > self.limit_high {
            return Err(ConfigError::InvertedLimits {
                low: self.limit_low,
                high: self.limit_high,
            });
        }

        if let Some(position) = self.initial_position {
            if !position.is_finite() {
                return Err(ConfigError::NonFiniteInitialPosition(position));
            }
        }

        self.poll_interval()
    }
}

/// Indicates an axis configuration that cannot be simulated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("lower limit {low} is above upper limit {high}")]
    InvertedLimits { low: i32, high: i32 },

    #[error("poll rate must be a positive finite number of Hz, got {0}")]
    InvalidPollRate(f64),

    #[error("initial position must be finite, got {0}")]
    NonFiniteInitialPosition(f64),
}
