//! End-to-end pipeline: load → enrich → persist → aggregate → emit.
//!
//! Data flows strictly forward; the three derived views are computed from
//! the same enriched ledger. Everything after loading is fatal on failure —
//! there is no partial-success or rollback semantics.

use crate::config::PipelineConfig;
use crate::emitter::emit_reports;
use crate::store::TradeStore;
use anyhow::{Context, Result};
use tradestats_core::{
    daily_stats, delete_source_files, enrich, instrument_daily_stats, load_dir,
    reference_groups,
};
use tracing::info;

/// What a run did, for logging and assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub trades_loaded: usize,
    pub rows_persisted: u64,
    pub instruments: usize,
    pub trade_references: usize,
    pub days: usize,
}

/// Run the whole batch job described by `config`.
pub async fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    info!(dir = %config.input_dir.display(), "loading trade files");
    let trades = load_dir(&config.input_dir).context("failed to load the trade ledger")?;
    info!(trades = trades.len(), "ledger loaded");

    if config.delete_inputs {
        let removed = delete_source_files(&config.input_dir);
        info!(removed, "deleted source files");
    }

    let ledger = enrich(trades).context("failed to enrich the ledger")?;

    info!(db = %config.database.path.display(), table = %config.database.table, "persisting ledger");
    let store = TradeStore::connect(&config.database.path)
        .await
        .context("failed to open the trades database")?;
    let rows_persisted = store
        .save_trades(&config.database.table, &ledger, config.database.mode)
        .await
        .context("failed to persist the ledger")?;

    let instrument_daily = instrument_daily_stats(&ledger);
    let references = reference_groups(&ledger);
    let daily = daily_stats(&ledger);

    info!(out = %config.output_dir.display(), "emitting reports");
    emit_reports(
        &config.output_dir,
        &ledger,
        &instrument_daily,
        &references,
        &daily,
        config.clear_output,
    )?;

    Ok(PipelineSummary {
        trades_loaded: ledger.len(),
        rows_persisted,
        instruments: instrument_daily.len(),
        trade_references: references.len(),
        days: daily.len(),
    })
}
