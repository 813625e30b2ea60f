use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Stand parameters held fixed for a single run (the replenishment policy
/// plus the demand and price environment it operates in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandConfig {
    /// Customers per unit time (exponential interarrival rate).
    pub arrival_rate: f64,
    /// Services per unit time for the single server.
    pub service_rate: f64,
    /// Cost per unit resupplied.
    pub wholesale_price: f64,
    /// Revenue per admitted customer.
    pub retail_price: f64,
    /// Time between resupplies; also the date of the first one.
    pub replenishment_period: f64,
    /// Units per resupply batch, and the initial stocking.
    pub replenishment_quantity: u32,
}

/// Horizon, transient exclusion and replication settings shared by every
/// run in a trial set or sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub horizon: f64,
    /// Sales and costs dated at or before this time are excluded.
    pub warmup: f64,
    pub trials: u32,
    pub seed: u64,
}

/// Inclusive integer bounds of the (period, quantity) grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub period_min: u32,
    pub period_max: u32,
    pub quantity_min: u32,
    pub quantity_max: u32,
}

impl StandConfig {
    pub fn canonical() -> Self {
        StandConfig {
            arrival_rate: 5.0,
            service_rate: 6.0,
            wholesale_price: 3.0,
            retail_price: 4.0,
            replenishment_period: 10.0,
            replenishment_quantity: 8,
        }
    }

    /// Same stand with a different replenishment policy.
    pub fn with_policy(&self, period: f64, quantity: u32) -> Self {
        StandConfig {
            replenishment_period: period,
            replenishment_quantity: quantity,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [("arrival_rate", self.arrival_rate), ("service_rate", self.service_rate)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveRate { name, value });
            }
        }
        for (name, value) in
            [("wholesale_price", self.wholesale_price), ("retail_price", self.retail_price)]
        {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativePrice { name, value });
            }
        }
        if !(self.replenishment_period.is_finite() && self.replenishment_period > 0.0) {
            return Err(ConfigError::NonPositivePeriod(self.replenishment_period));
        }
        Ok(())
    }

    /// `validate` plus the checks that need the horizon: the resupply date
    /// must still advance when the period is added at the horizon, or the
    /// clock stalls below it. Rounding only worsens at larger dates, so
    /// checking at the horizon covers every date the run reaches.
    pub fn validate_for(&self, run: &RunConfig) -> ConfigResult<()> {
        self.validate()?;
        run.validate()?;
        if run.horizon + self.replenishment_period <= run.horizon {
            return Err(ConfigError::NonPositivePeriod(self.replenishment_period));
        }
        Ok(())
    }
}

impl RunConfig {
    pub fn canonical() -> Self {
        RunConfig { horizon: 1000.0, warmup: 500.0, trials: 5, seed: 42 }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigError::NonPositiveHorizon(self.horizon));
        }
        if !(self.warmup.is_finite() && self.warmup >= 0.0) {
            return Err(ConfigError::NegativeWarmup(self.warmup));
        }
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(())
    }
}

impl SweepConfig {
    pub fn canonical() -> Self {
        SweepConfig { period_min: 1, period_max: 100, quantity_min: 1, quantity_max: 50 }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.period_min > self.period_max {
            return Err(ConfigError::EmptyGrid {
                axis: "period",
                min: self.period_min,
                max: self.period_max,
            });
        }
        if self.quantity_min > self.quantity_max {
            return Err(ConfigError::EmptyGrid {
                axis: "quantity",
                min: self.quantity_min,
                max: self.quantity_max,
            });
        }
        if self.period_min == 0 {
            return Err(ConfigError::ZeroPeriodBound);
        }
        Ok(())
    }

    /// Number of grid cells. Only meaningful once validated.
    pub fn cell_count(&self) -> usize {
        (self.period_max - self.period_min + 1) as usize
            * (self.quantity_max - self.quantity_min + 1) as usize
    }
}

impl Default for StandConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_configs_are_valid() {
        assert_eq!(StandConfig::canonical().validate(), Ok(()));
        assert_eq!(RunConfig::canonical().validate(), Ok(()));
        assert_eq!(SweepConfig::canonical().validate(), Ok(()));
    }

    #[test]
    fn non_positive_rates_rejected() {
        let mut c = StandConfig::canonical();
        c.arrival_rate = 0.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonPositiveRate { name: "arrival_rate", .. })
        ));

        let mut c = StandConfig::canonical();
        c.service_rate = -1.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonPositiveRate { name: "service_rate", .. })
        ));

        let mut c = StandConfig::canonical();
        c.arrival_rate = f64::NAN;
        assert!(c.validate().is_err(), "NaN rate must be rejected");
    }

    #[test]
    fn non_positive_period_rejected() {
        let c = StandConfig::canonical().with_policy(0.0, 8);
        assert_eq!(c.validate(), Err(ConfigError::NonPositivePeriod(0.0)));
    }

    #[test]
    fn period_lost_to_rounding_at_horizon_rejected() {
        let run = RunConfig { horizon: 1.0, warmup: 0.0, trials: 1, seed: 1 };
        let c = StandConfig::canonical().with_policy(1e-20, 1);
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.validate_for(&run), Err(ConfigError::NonPositivePeriod(1e-20)));

        // A period that resolves at small dates can still vanish at a large horizon.
        let far = RunConfig { horizon: 1e17, ..run.clone() };
        let c = StandConfig::canonical().with_policy(1.0, 1);
        assert_eq!(c.validate_for(&run), Ok(()));
        assert_eq!(c.validate_for(&far), Err(ConfigError::NonPositivePeriod(1.0)));
    }

    #[test]
    fn negative_prices_rejected() {
        let mut c = StandConfig::canonical();
        c.retail_price = -4.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NegativePrice { name: "retail_price", .. })
        ));
    }

    #[test]
    fn zero_prices_and_quantity_allowed() {
        let mut c = StandConfig::canonical().with_policy(5.0, 0);
        c.wholesale_price = 0.0;
        c.retail_price = 0.0;
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn run_config_rejects_bad_horizon_warmup_and_trials() {
        let mut r = RunConfig::canonical();
        r.horizon = 0.0;
        assert_eq!(r.validate(), Err(ConfigError::NonPositiveHorizon(0.0)));

        let mut r = RunConfig::canonical();
        r.warmup = -1.0;
        assert_eq!(r.validate(), Err(ConfigError::NegativeWarmup(-1.0)));

        let mut r = RunConfig::canonical();
        r.trials = 0;
        assert_eq!(r.validate(), Err(ConfigError::ZeroTrials));
    }

    #[test]
    fn empty_grid_is_an_error() {
        let s = SweepConfig { period_min: 30, period_max: 10, quantity_min: 20, quantity_max: 30 };
        assert!(matches!(s.validate(), Err(ConfigError::EmptyGrid { axis: "period", .. })));

        let s = SweepConfig { period_min: 10, period_max: 30, quantity_min: 31, quantity_max: 30 };
        assert!(matches!(s.validate(), Err(ConfigError::EmptyGrid { axis: "quantity", .. })));

        let s = SweepConfig { period_min: 0, period_max: 3, quantity_min: 1, quantity_max: 2 };
        assert_eq!(s.validate(), Err(ConfigError::ZeroPeriodBound));
    }

    #[test]
    fn cell_count_is_inclusive() {
        let s = SweepConfig { period_min: 10, period_max: 30, quantity_min: 20, quantity_max: 30 };
        assert_eq!(s.cell_count(), 21 * 11);
    }

    #[test]
    fn partial_json_falls_back_to_canonical() {
        let c: StandConfig = serde_json::from_str(r#"{"arrival_rate": 0.5}"#).unwrap();
        assert_eq!(c.arrival_rate, 0.5);
        assert_eq!(c.replenishment_quantity, 8);

        let r: RunConfig = serde_json::from_str(r#"{"trials": 10}"#).unwrap();
        assert_eq!(r.trials, 10);
        assert_eq!(r.horizon, 1000.0);
    }

    #[test]
    fn negative_quantity_fails_to_parse() {
        let parsed = serde_json::from_str::<StandConfig>(r#"{"replenishment_quantity": -3}"#);
        assert!(parsed.is_err());
    }
}
