//! Domain types for the trade ledger.

pub mod trade;

pub use trade::{EnrichedTrade, Side, Trade};
