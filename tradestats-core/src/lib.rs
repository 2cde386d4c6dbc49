//! TradeStats Core — trade ledger domain types and the aggregation pipeline.
//!
//! This crate contains the heart of the batch job:
//! - Domain types (trades, sides, enriched trades)
//! - CSV ledger loading with a fixed 8-column schema
//! - Enrichment (market value and calendar day derivation)
//! - The three grouping/reduction operations: per-instrument daily stats,
//!   trade-reference constituents, and per-day cross-instrument stats
//!
//! Everything here is synchronous and operates on fully-resident data.
//! I/O side effects (database sink, report emission) live in the runner.

pub mod aggregate;
pub mod domain;
pub mod enrich;
pub mod ledger;

pub use aggregate::{
    daily_stats, instrument_daily_stats, reference_groups, DailyRow, DailyStats,
    InstrumentDailyStats, InstrumentRow, ReferenceGroup,
};
pub use domain::{EnrichedTrade, Side, Trade};
pub use enrich::{enrich, EnrichError};
pub use ledger::{delete_source_files, load_dir, LedgerError, HEADER};
