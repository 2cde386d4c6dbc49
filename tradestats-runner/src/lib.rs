//! TradeStats Runner — pipeline orchestration around `tradestats-core`.
//!
//! This crate provides:
//! - The pipeline configuration surface (TOML file + defaults)
//! - The SQLite persistence sink for the enriched ledger
//! - The report emitter (four CSV buckets plus the enriched ledger)
//! - A deterministic sample-data generator
//! - The end-to-end `run_pipeline` entry point

pub mod config;
pub mod emitter;
pub mod pipeline;
pub mod sample_data;
pub mod store;

pub use config::{ConfigError, DatabaseConfig, PipelineConfig};
pub use emitter::emit_reports;
pub use pipeline::{run_pipeline, PipelineSummary};
pub use sample_data::{generate_sample_files, instrument_universe, SampleDataConfig};
pub use store::{StoreError, TradeStore, WriteMode};
