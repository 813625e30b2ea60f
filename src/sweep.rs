use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{RunConfig, StandConfig, SweepConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::trial;
use crate::types::GridCell;

/// Mean profit of every grid cell plus the best one.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub profits: BTreeMap<GridCell, f64>,
    pub best: GridCell,
    pub best_profit: f64,
}

/// Flat, serialisable view of one evaluated cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellProfit {
    pub period: u32,
    pub quantity: u32,
    pub mean_profit: f64,
}

impl SweepResult {
    pub fn cells(&self) -> Vec<CellProfit> {
        self.profits
            .iter()
            .map(|(cell, &mean_profit)| CellProfit {
                period: cell.period,
                quantity: cell.quantity,
                mean_profit,
            })
            .collect()
    }

    /// The `n` most profitable cells, best first; equal profits keep grid order.
    pub fn top(&self, n: usize) -> Vec<CellProfit> {
        let mut cells = self.cells();
        cells.sort_by(|a, b| b.mean_profit.total_cmp(&a.mean_profit));
        cells.truncate(n);
        cells
    }
}

/// Single-writer reduction target for evaluated cells. Cells must be
/// recorded in grid order for the tie-break to hold: a later cell replaces
/// the best only if strictly more profitable.
#[derive(Debug, Default)]
pub struct SweepAccumulator {
    profits: BTreeMap<GridCell, f64>,
    best: Option<(GridCell, f64)>,
}

impl SweepAccumulator {
    pub fn record(&mut self, cell: GridCell, mean_profit: f64) {
        self.profits.insert(cell, mean_profit);
        match self.best {
            Some((_, best)) if mean_profit <= best => {}
            _ => self.best = Some((cell, mean_profit)),
        }
    }

    /// `None` if nothing was recorded.
    pub fn finish(self) -> Option<SweepResult> {
        let (best, best_profit) = self.best?;
        Some(SweepResult { profits: self.profits, best, best_profit })
    }
}

/// Grid cells in traversal order: period ascending, then quantity ascending.
pub fn grid_cells(bounds: &SweepConfig) -> Vec<GridCell> {
    (bounds.period_min..=bounds.period_max)
        .flat_map(|period| {
            (bounds.quantity_min..=bounds.quantity_max)
                .map(move |quantity| GridCell::new(period, quantity))
        })
        .collect()
}

/// Evaluate every (period, quantity) policy on the grid with `template`
/// supplying the remaining stand parameters.
///
/// Cells run in parallel but share replication streams: replication `i` of
/// every cell sees the same random stream, so cells are compared on common
/// random numbers and the result does not depend on the thread count.
pub fn sweep(
    template: &StandConfig,
    bounds: &SweepConfig,
    run: &RunConfig,
) -> ConfigResult<SweepResult> {
    bounds.validate()?;
    // The shortest period is the first to be lost to rounding at the horizon.
    template.with_policy(bounds.period_min as f64, bounds.quantity_min).validate_for(run)?;

    let cells = grid_cells(bounds);
    log::info!(
        "sweep: {} cells (period {}..={}, quantity {}..={}), {} trials each",
        cells.len(),
        bounds.period_min,
        bounds.period_max,
        bounds.quantity_min,
        bounds.quantity_max,
        run.trials
    );

    let evaluated: Vec<(GridCell, f64)> = cells
        .into_par_iter()
        .map(|cell| {
            let config = template.with_policy(cell.period as f64, cell.quantity);
            trial::mean_profit(&config, run).map(|mean| (cell, mean))
        })
        .collect::<ConfigResult<_>>()?;

    let mut acc = SweepAccumulator::default();
    for (cell, mean) in evaluated {
        acc.record(cell, mean);
    }
    let result = acc.finish().ok_or(ConfigError::EmptyGrid {
        axis: "period",
        min: bounds.period_min,
        max: bounds.period_max,
    })?;

    for period in bounds.period_min..=bounds.period_max {
        let row = result.profits.range(
            GridCell::new(period, bounds.quantity_min)..=GridCell::new(period, bounds.quantity_max),
        );
        if let Some((cell, mean)) = row.reduce(|best, cur| if cur.1 > best.1 { cur } else { best }) {
            log::info!("sweep: period {period}: best quantity {} mean {mean:.2}", cell.quantity);
        }
    }
    log::info!(
        "sweep: best (period {}, quantity {}) mean profit {:.2}",
        result.best.period,
        result.best.quantity,
        result.best_profit
    );

    Ok(result)
}
