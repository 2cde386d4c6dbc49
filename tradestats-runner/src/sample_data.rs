//! Sample trade-file generator.
//!
//! Produces directories of random-but-plausible trade CSVs for exercising
//! the pipeline: the instrument universe is every ordered currency-pair
//! cross from a fixed rate table, prices jitter ±10% around the pair ratio,
//! and the optional columns are blank half the time. Deterministic under an
//! explicit seed.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tradestats_core::{delete_source_files, HEADER};

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct SampleDataConfig {
    pub out_dir: PathBuf,
    /// Number of files to produce (`trades_list_0.csv` ..).
    pub file_count: usize,
    /// Each file holds a uniform 0..=max_trades rows.
    pub max_trades: usize,
    /// Inclusive start of the timestamp range, local time.
    pub start: NaiveDateTime,
    /// Exclusive end of the timestamp range, local time.
    pub end: NaiveDateTime,
    /// Seed for reproducible output; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Delete existing `.csv` files in the target directory first.
    pub clear_before: bool,
}

impl Default for SampleDataConfig {
    fn default() -> Self {
        // Same four-day window the original sample data used.
        let start = NaiveDate::from_ymd_opt(2017, 7, 1)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2017, 7, 5)
            .and_then(|d| d.and_hms_opt(1, 33, 0))
            .unwrap_or_default();
        Self {
            out_dir: PathBuf::from("common_directory"),
            file_count: 3,
            max_trades: 1_000,
            start,
            end,
            seed: None,
            clear_before: true,
        }
    }
}

const RATES: [(&str, f64); 9] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("JPY", 110.79),
    ("GBP", 0.76),
    ("CHF", 0.97),
    ("CAD", 1.24),
    ("AUD", 1.25),
    ("NZD", 1.33),
    ("ZAR", 13.03),
];

/// Every ordered currency-pair cross and its rate ratio.
pub fn instrument_universe() -> Vec<(String, f64)> {
    let mut universe = Vec::with_capacity(RATES.len() * (RATES.len() - 1));
    for (base, base_rate) in RATES {
        for (quote, quote_rate) in RATES {
            if base != quote {
                universe.push((format!("{base}{quote}"), quote_rate / base_rate));
            }
        }
    }
    universe
}

fn custom_list(prefix: &str, total: usize) -> Vec<String> {
    (1..=total).map(|i| format!("{prefix}_{i}")).collect()
}

/// Generate the sample files and return their paths.
pub fn generate_sample_files(config: &SampleDataConfig) -> Result<Vec<PathBuf>> {
    if config.clear_before {
        delete_source_files(&config.out_dir);
    }
    fs::create_dir_all(&config.out_dir).with_context(|| {
        format!("failed to create directory {}", config.out_dir.display())
    })?;

    let start_ts = local_timestamp(config.start)?;
    let end_ts = local_timestamp(config.end)?;
    anyhow::ensure!(
        start_ts < end_ts,
        "start of the timestamp range must precede its end"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let universe = instrument_universe();
    let trade_references = custom_list("TR", 5);
    let underlying_assets = custom_list("UA", 10);
    let client_references = custom_list("CR", 3);
    let sides = ["SELL", "BUY"];

    let mut files = Vec::with_capacity(config.file_count);
    for i in 0..config.file_count {
        let path = config.out_dir.join(format!("trades_list_{i}.csv"));
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        wtr.write_record(HEADER)?;

        let rows = rng.gen_range(0..=config.max_trades);
        for _ in 0..rows {
            let (instrument, ratio) = &universe[rng.gen_range(0..universe.len())];
            let price = jittered_price(&mut rng, *ratio);
            let quantity = rng.gen_range(1..=10_000i64);
            let timestamp = rng.gen_range(start_ts..end_ts);
            let reference = pick(&mut rng, &trade_references).to_string();
            let side = pick(&mut rng, &sides).to_string();
            let asset = pick(&mut rng, &underlying_assets).to_string();
            let client = pick(&mut rng, &client_references).to_string();
            wtr.write_record([
                instrument.clone(),
                price.to_string(),
                quantity.to_string(),
                timestamp.to_string(),
                optional(&mut rng, &reference),
                optional(&mut rng, &side),
                optional(&mut rng, &asset),
                optional(&mut rng, &client),
            ])?;
        }
        wtr.flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;
        files.push(path);
    }
    Ok(files)
}

/// ±10% around the pair ratio, rounded to 4 decimal places.
fn jittered_price(rng: &mut StdRng, ratio: f64) -> f64 {
    let price = rng.gen_range(ratio * 0.9..=ratio * 1.1);
    (price * 10_000.0).round() / 10_000.0
}

fn pick<'a, S: AsRef<str>>(rng: &mut StdRng, values: &'a [S]) -> &'a str {
    values[rng.gen_range(0..values.len())].as_ref()
}

/// Half the time the value, half the time blank.
fn optional(rng: &mut StdRng, value: &str) -> String {
    if rng.gen_bool(0.5) {
        value.to_string()
    } else {
        String::new()
    }
}

fn local_timestamp(dt: NaiveDateTime) -> Result<i64> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|dt| dt.timestamp())
        .with_context(|| format!("{dt} does not exist in the local timezone"))
}
