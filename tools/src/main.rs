//! churn-runner: headless runner for the customer churn simulation.
//!
//! Usage:
//!   churn-runner --seed 12345 --model data/churn_model.json
//!   churn-runner --seed 12345 --model data/churn_model.json --out history.json

use anyhow::Result;
use churnsim_core::{SimConfig, Simulation, StateCounts};
use std::env;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id: String,
    seed: u64,
    generated_at: chrono::DateTime<chrono::Utc>,
    total_periods: u64,
    states: &'a [String],
    rows: Vec<ReportRow<'a>>,
    counts: &'a StateCounts,
    revenue: Vec<f64>,
}

#[derive(serde::Serialize)]
struct ReportRow<'a> {
    customer_id: &'a str,
    name: &'a str,
    birth_period: u64,
    states: Vec<Option<&'a str>>,
    codes: Vec<Option<i64>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let model = flag_value(&args, "--model");
    let out = flag_value(&args, "--out");

    let config = match model {
        Some(path) => SimConfig::load(path)?,
        None => {
            log::warn!("no --model given, using the built-in test model");
            SimConfig::default_test()
        }
    };

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4());
    let mut sim = Simulation::seeded(config, seed)?;

    println!("churn-runner");
    println!("  run_id:    {run_id}");
    println!("  seed:      {seed}");
    println!("  model:     {}", model.unwrap_or("(built-in)"));
    println!();
    println!("{sim}");
    println!();

    let table = sim.run_simulation()?.clone();
    let chain = sim.model();
    let counts = StateCounts::from_table(&table, chain);
    let revenue = counts.revenue(&sim.config().prices);

    print_summary(&sim, &counts, &revenue);

    if let Some(path) = out {
        let labels = table.to_labels(chain);
        let codes = table.to_codes(chain);
        let rows = table
            .rows()
            .iter()
            .zip(labels)
            .zip(codes)
            .map(|((row, states), codes)| ReportRow {
                customer_id: &row.customer_id,
                name: &row.name,
                birth_period: row.birth_period,
                states,
                codes,
            })
            .collect();
        let report = RunReport {
            run_id,
            seed,
            generated_at: chrono::Utc::now(),
            total_periods: sim.config().total_periods,
            states: chain.labels(),
            rows,
            counts: &counts,
            revenue,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!();
        println!("history written to {path}");
    }

    Ok(())
}

fn print_summary(sim: &Simulation, counts: &StateCounts, revenue: &[f64]) {
    let model = sim.model();
    let last = counts.periods() - 1;

    println!("=== RUN SUMMARY ===");
    println!("  periods:        {}", sim.config().total_periods);
    println!("  customers:      {}", sim.customers().len());
    for (i, label) in model.labels().iter().enumerate() {
        let state = churnsim_core::StateId(i);
        println!("  {label:<14}  {}", counts.count(last, state).unwrap_or(0));
    }

    println!();
    println!("=== PURCHASES PER PERIOD ===");
    for (label, series) in counts.purchase_series(model) {
        let cells: Vec<String> = series.iter().map(|n| n.to_string()).collect();
        println!("  {label:<14}  {}", cells.join(" "));
    }
    if !sim.config().prices.is_empty() {
        let cells: Vec<String> = revenue.iter().map(|r| format!("{r:.0}")).collect();
        println!("  {:<14}  {}", "revenue", cells.join(" "));
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
