//! Projection Engine CLI
//!
//! Batch mode reads calculation requests from CSV and writes the computed
//! results as CSV to stdout. Schedule mode prints the year-by-year growth
//! table of a single SIP.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.csv > results.csv
//! cargo run -- schedule <monthly> <rate> <years> [step_up] [lump_sum]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::debug;
use projection_engine::engine::write_schedule;
use projection_engine::{yearly_schedule, EngineError, ProjectionEngine, ProjectionInput, Result};
use rust_decimal::Decimal;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use std::str::FromStr;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => Err(EngineError::MissingArgument),
        Some("schedule") => run_schedule(&args[1..]),
        Some(input_path) => run_batch(input_path),
    }
}

fn run_batch(input_path: &str) -> Result<()> {
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut engine = ProjectionEngine::new();
    engine.process_csv(reader)?;
    debug!("Computed {} requests from {}", engine.len(), input_path);

    let stdout = io::stdout();
    engine.write_output(stdout.lock())?;

    Ok(())
}

fn run_schedule(args: &[String]) -> Result<()> {
    let monthly = decimal_arg(args, 0, "monthly")?;
    let rate = decimal_arg(args, 1, "rate")?;
    let years = match args.get(2) {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| EngineError::InvalidArgument {
                name: "years",
                value: value.clone(),
            })?,
        None => return Err(EngineError::MissingScheduleArgument { name: "years" }),
    };
    let step_up = optional_decimal_arg(args, 3, "step_up")?;
    let lump_sum = optional_decimal_arg(args, 4, "lump_sum")?;

    let input = ProjectionInput::sip(monthly, rate, years)
        .with_step_up(step_up)
        .with_lump_sum(lump_sum);
    let rows = yearly_schedule(&input)?;

    let stdout = io::stdout();
    write_schedule(&rows, stdout.lock())
}

fn decimal_arg(args: &[String], index: usize, name: &'static str) -> Result<Decimal> {
    let value = args
        .get(index)
        .ok_or(EngineError::MissingScheduleArgument { name })?;
    Decimal::from_str(value.trim()).map_err(|_| EngineError::InvalidArgument {
        name,
        value: value.clone(),
    })
}

fn optional_decimal_arg(args: &[String], index: usize, name: &'static str) -> Result<Decimal> {
    if args.get(index).is_none() {
        return Ok(Decimal::ZERO);
    }
    decimal_arg(args, index, name)
}
