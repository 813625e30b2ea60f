use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use standsim::config::{RunConfig, StandConfig, SweepConfig};
use standsim::sweep::{self, CellProfit, SweepResult};
use standsim::trial::{self, TrialSummary};

/// Everything the binary can be configured with; each section may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    stand: StandConfig,
    run: RunConfig,
    sweep: SweepConfig,
}

#[derive(Serialize)]
struct SweepReport {
    best_period: u32,
    best_quantity: u32,
    best_mean_profit: f64,
    cells: Vec<CellProfit>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<String> = None;
    let mut do_sweep = false;
    let mut json = false;
    let mut quiet = false;
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(value(&args, i, "--config")?.to_string());
            }
            "--sweep" => do_sweep = true,
            "--json" => json = true,
            "--quiet" => quiet = true,
            flag @ ("--seed" | "--trials" | "--horizon" | "--warmup" | "--period" | "--quantity"
            | "--period-min" | "--period-max" | "--quantity-min" | "--quantity-max"
            | "--arrival-rate" | "--service-rate" | "--wholesale-price" | "--retail-price") => {
                i += 1;
                overrides.push((flag.to_string(), value(&args, i, flag)?.to_string()));
            }
            other => log::warn!("ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    let mut cfg = match config_path {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse {path}"))?
        }
        None => FileConfig::default(),
    };
    for (flag, raw) in &overrides {
        apply_override(&mut cfg, flag, raw)?;
    }

    if do_sweep {
        let result = sweep::sweep(&cfg.stand, &cfg.sweep, &cfg.run)?;
        if json {
            let report = SweepReport {
                best_period: result.best.period,
                best_quantity: result.best.quantity,
                best_mean_profit: result.best_profit,
                cells: result.cells(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if !quiet {
            print_sweep(&result, &cfg);
        }
    } else {
        let summary = trial::run_trial_summary(&cfg.stand, &cfg.run)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !quiet {
            print_trials(&summary, &cfg);
        }
    }

    Ok(())
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{flag} requires a value"),
    }
}

fn apply_override(cfg: &mut FileConfig, flag: &str, raw: &str) -> Result<()> {
    let float = || raw.parse::<f64>().with_context(|| format!("{flag} requires a number"));
    let int = || raw.parse::<u32>().with_context(|| format!("{flag} requires a non-negative integer"));
    match flag {
        "--seed" => cfg.run.seed = raw.parse::<u64>().with_context(|| format!("{flag} requires a u64"))?,
        "--trials" => cfg.run.trials = int()?,
        "--horizon" => cfg.run.horizon = float()?,
        "--warmup" => cfg.run.warmup = float()?,
        "--period" => cfg.stand.replenishment_period = float()?,
        "--quantity" => cfg.stand.replenishment_quantity = int()?,
        "--period-min" => cfg.sweep.period_min = int()?,
        "--period-max" => cfg.sweep.period_max = int()?,
        "--quantity-min" => cfg.sweep.quantity_min = int()?,
        "--quantity-max" => cfg.sweep.quantity_max = int()?,
        "--arrival-rate" => cfg.stand.arrival_rate = float()?,
        "--service-rate" => cfg.stand.service_rate = float()?,
        "--wholesale-price" => cfg.stand.wholesale_price = float()?,
        "--retail-price" => cfg.stand.retail_price = float()?,
        _ => bail!("unhandled flag {flag}"),
    }
    Ok(())
}

fn print_trials(summary: &TrialSummary, cfg: &FileConfig) {
    let s = &cfg.stand;
    println!(
        "\n=== Trials: period {} quantity {} (seed {}, horizon {}, warmup {}) ===",
        s.replenishment_period, s.replenishment_quantity, cfg.run.seed, cfg.run.horizon, cfg.run.warmup
    );
    println!("{:>5} | {:>10}", "Trial", "Profit");
    println!("{}", "-".repeat(18));
    for (i, p) in summary.profits.iter().enumerate() {
        println!("{:>5} | {:>10.1}", i, p);
    }

    let d = &summary.stats;
    println!("\n{:>8} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8} | {:>8}", "min", "p25", "p50", "p75", "max", "mean", "stddev");
    println!(
        "{:>8.1} | {:>8.1} | {:>8.1} | {:>8.1} | {:>8.1} | {:>8.1} | {:>8.1}",
        d.min, d.p25, d.p50, d.p75, d.max, d.mean, d.std_dev
    );
}

fn print_sweep(result: &SweepResult, cfg: &FileConfig) {
    let b = &cfg.sweep;
    println!(
        "\n=== Sweep: period {}..={}, quantity {}..={} ({} trials per cell, seed {}) ===",
        b.period_min, b.period_max, b.quantity_min, b.quantity_max, cfg.run.trials, cfg.run.seed
    );
    println!(
        "  Best: period {} quantity {} → mean profit {:.1}",
        result.best.period, result.best.quantity, result.best_profit
    );

    println!("\n--- Top 10 ---");
    println!("{:>6} | {:>8} | {:>11}", "Period", "Quantity", "Mean profit");
    for c in result.top(10) {
        println!("{:>6} | {:>8} | {:>11.1}", c.period, c.quantity, c.mean_profit);
    }
}
