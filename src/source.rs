use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::{ConfigError, ConfigResult};

/// Exponential interarrival and service durations drawn from one explicit
/// random stream. The stream is owned, so two sources never share state.
pub struct StochasticSource<R> {
    interarrival: Exp<f64>,
    service: Exp<f64>,
    rng: R,
}

impl<R: Rng> StochasticSource<R> {
    pub fn new(arrival_rate: f64, service_rate: f64, rng: R) -> ConfigResult<Self> {
        Ok(StochasticSource {
            interarrival: exp("arrival_rate", arrival_rate)?,
            service: exp("service_rate", service_rate)?,
            rng,
        })
    }

    pub fn sample_interarrival(&mut self) -> f64 {
        self.interarrival.sample(&mut self.rng)
    }

    pub fn sample_service(&mut self) -> f64 {
        self.service.sample(&mut self.rng)
    }
}

fn exp(name: &'static str, rate: f64) -> ConfigResult<Exp<f64>> {
    // Exp::new accepts 0 and +inf; neither gives a usable duration here.
    if !(rate.is_finite() && rate > 0.0) {
        return Err(ConfigError::NonPositiveRate { name, value: rate });
    }
    Exp::new(rate).map_err(|_| ConfigError::NonPositiveRate { name, value: rate })
}
