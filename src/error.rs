use thiserror::Error;

/// Rejected configuration. Raised before any simulation runs; values are
/// never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive finite rate, got {value}")]
    NonPositiveRate { name: &'static str, value: f64 },

    #[error("replenishment_period must be positive and finite, got {0}")]
    NonPositivePeriod(f64),

    #[error("{name} must be non-negative and finite, got {value}")]
    NegativePrice { name: &'static str, value: f64 },

    #[error("horizon must be positive and finite, got {0}")]
    NonPositiveHorizon(f64),

    #[error("warmup must be non-negative and finite, got {0}")]
    NegativeWarmup(f64),

    #[error("trials must be at least 1")]
    ZeroTrials,

    #[error("empty {axis} range: min {min} > max {max}")]
    EmptyGrid { axis: &'static str, min: u32, max: u32 },

    #[error("period_min must be at least 1")]
    ZeroPeriodBound,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
