//! TradeStats CLI — ingest trade files and write the derived daily reports.
//!
//! Commands:
//! - `run` — load trade CSVs, persist them to SQLite, and emit the four
//!   report buckets (optionally from a TOML config file)
//! - `generate` — produce random sample trade files for a dry run

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tradestats_runner::{
    generate_sample_files, run_pipeline, PipelineConfig, SampleDataConfig, WriteMode,
};

#[derive(Parser)]
#[command(
    name = "tradestats",
    about = "TradeStats CLI — trade ledger ingestion and daily aggregation reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load trade CSVs, persist them, and write the report buckets.
    Run {
        /// Path to a TOML pipeline config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Source directory of trade CSV files (overrides the config file).
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Output directory for the report buckets (overrides the config file).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// SQLite database file (overrides the config file).
        #[arg(long)]
        database: Option<PathBuf>,

        /// Database write mode: replace or append.
        #[arg(long)]
        db_mode: Option<String>,

        /// Database table name (overrides the config file).
        #[arg(long)]
        table: Option<String>,

        /// Delete source files after reading them. Destructive.
        #[arg(long, default_value_t = false)]
        delete_inputs: bool,

        /// Keep existing files in the output directory instead of clearing it.
        #[arg(long, default_value_t = false)]
        keep_output: bool,
    },
    /// Generate random sample trade files.
    Generate {
        /// Directory to write the files into.
        #[arg(long, default_value = "common_directory")]
        out_dir: PathBuf,

        /// Number of files to generate.
        #[arg(long, default_value_t = 3)]
        files: usize,

        /// Maximum rows per file.
        #[arg(long, default_value_t = 1000)]
        max_trades: usize,

        /// RNG seed for reproducible data.
        #[arg(long)]
        seed: Option<u64>,

        /// Start of the timestamp range (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS").
        #[arg(long, default_value = "2017-07-01 08:30:00")]
        start: String,

        /// End of the timestamp range.
        #[arg(long, default_value = "2017-07-05 01:33:00")]
        end: String,

        /// Keep existing .csv files in the target directory.
        #[arg(long, default_value_t = false)]
        keep_existing: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            input_dir,
            output_dir,
            database,
            db_mode,
            table,
            delete_inputs,
            keep_output,
        } => {
            run_cmd(
                config,
                input_dir,
                output_dir,
                database,
                db_mode,
                table,
                delete_inputs,
                keep_output,
            )
            .await
        }
        Commands::Generate {
            out_dir,
            files,
            max_trades,
            seed,
            start,
            end,
            keep_existing,
        } => generate_cmd(out_dir, files, max_trades, seed, &start, &end, keep_existing),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_cmd(
    config_path: Option<PathBuf>,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    db_mode: Option<String>,
    table: Option<String>,
    delete_inputs: bool,
    keep_output: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_toml_path(&path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(path) = database {
        config.database.path = path;
    }
    if let Some(mode) = db_mode {
        config.database.mode = parse_write_mode(&mode)?;
    }
    if let Some(table) = table {
        config.database.table = table;
    }
    config.delete_inputs |= delete_inputs;
    config.clear_output &= !keep_output;

    let summary = run_pipeline(&config).await?;

    println!("Completed.");
    println!(
        "  {} trades loaded, {} rows persisted to {}",
        summary.trades_loaded,
        summary.rows_persisted,
        config.database.path.display()
    );
    println!(
        "  {} instruments, {} trade references, {} days written under {}",
        summary.instruments,
        summary.trade_references,
        summary.days,
        config.output_dir.display()
    );
    Ok(())
}

fn generate_cmd(
    out_dir: PathBuf,
    files: usize,
    max_trades: usize,
    seed: Option<u64>,
    start: &str,
    end: &str,
    keep_existing: bool,
) -> Result<()> {
    let config = SampleDataConfig {
        out_dir,
        file_count: files,
        max_trades,
        start: parse_datetime(start)?,
        end: parse_datetime(end)?,
        seed,
        clear_before: !keep_existing,
    };

    let files = generate_sample_files(&config)?;
    println!("Created {} files:", files.len());
    for f in &files {
        println!("  {}", f.display());
    }
    Ok(())
}

fn parse_write_mode(s: &str) -> Result<WriteMode> {
    match s {
        "replace" => Ok(WriteMode::Replace),
        "append" => Ok(WriteMode::Append),
        other => bail!("unknown write mode '{other}' (expected 'replace' or 'append')"),
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date/time '{s}'"))?;
    date.and_hms_opt(0, 0, 0)
        .context("midnight is always representable")
}
