use rand::Rng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::config::{RunConfig, StandConfig};
use crate::error::ConfigResult;
use crate::events::{EventKind, EventLog, StandEvent, StandEventDetail};
use crate::source::StochasticSource;
use crate::stand::StandState;
use crate::types::CustomerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Finished,
}

/// Totals reported by one finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// `sales - cost`, both counted strictly after the warm-up.
    pub profit: f64,
    pub sales: f64,
    pub cost: f64,
    pub admitted: u64,
    pub balked: u64,
    pub units_resupplied: u64,
    pub final_clock: f64,
}

pub struct Simulation<R = ChaCha20Rng> {
    pub state: StandState,
    source: StochasticSource<R>,
    phase: Phase,
    /// Processed events, only kept when tracing is on.
    log: Option<EventLog>,
}

impl<R: Rng> Simulation<R> {
    /// Validate the inputs and draw the first interarrival time. Nothing is
    /// sampled if the configuration is rejected.
    pub fn new(config: &StandConfig, run: &RunConfig, rng: R) -> ConfigResult<Self> {
        config.validate_for(run)?;
        let mut source = StochasticSource::new(config.arrival_rate, config.service_rate, rng)?;
        let first_arrival = source.sample_interarrival();
        Ok(Simulation {
            state: StandState::new(config, run.horizon, run.warmup, first_arrival),
            source,
            phase: Phase::Running,
            log: None,
        })
    }

    /// Record every processed event (used in tests and diagnostics).
    pub fn with_trace(mut self) -> Self {
        self.log = Some(EventLog::new());
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn log(&self) -> &[StandEvent] {
        self.log.as_deref().unwrap_or(&[])
    }

    /// Process events until the clock reaches the horizon. The event that
    /// moves the clock past the horizon is not processed; the first event
    /// always is, since the clock starts at zero.
    pub fn run(&mut self) -> RunOutcome {
        while self.phase == Phase::Running {
            if self.state.clock >= self.state.horizon {
                self.phase = Phase::Finished;
                break;
            }
            self.step();
        }

        let outcome = self.outcome();
        log::debug!(
            "run finished: clock={:.3} admitted={} balked={} profit={}",
            outcome.final_clock,
            outcome.admitted,
            outcome.balked,
            outcome.profit
        );
        outcome
    }

    fn step(&mut self) {
        let (time, detail) = match self.state.scheduler.next_event() {
            EventKind::Arrival => {
                let t = self.state.scheduler.next_arrival_date;
                let customer_id = CustomerId(self.state.customers.len() as u64);
                let source = &mut self.source;
                let admitted = self.state.arrive(t, || source.sample_service());
                self.state.scheduler.next_arrival_date += self.source.sample_interarrival();
                (t, StandEventDetail::CustomerArrived { customer_id, admitted })
            }
            EventKind::Restock => {
                let t = self.state.scheduler.next_restock_date;
                self.state.restock();
                (t, StandEventDetail::Restocked { quantity: self.state.replenishment_quantity() })
            }
        };

        self.state.clock = self.state.scheduler.clock();

        if let Some(log) = self.log.as_mut() {
            log.push(StandEvent {
                time,
                kind: detail,
                stock_after: self.state.stock,
                clock_after: self.state.clock,
            });
        }
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome {
            profit: self.state.profit(),
            sales: self.state.sales,
            cost: self.state.cost,
            admitted: self.state.admitted,
            balked: self.state.balked,
            units_resupplied: self.state.units_resupplied,
            final_clock: self.state.clock,
        }
    }
}
