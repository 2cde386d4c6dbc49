//! Trade — a single ledger row, plus its enriched form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of the market a trade was on.
///
/// Source files may leave the instrument type blank; a blank side is modeled
/// as `Option::<Side>::None` throughout the pipeline, never as a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation, as it appears in source and report files.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Parse the wire representation. Empty string means "no side" and is
    /// handled by the caller; anything else unrecognized is `None` here.
    pub fn parse(s: &str) -> Option<Side> {
        match s {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trade record as loaded from a source file.
///
/// Immutable once loaded. Duplicates are valid and retained; the ledger is an
/// ordered sequence, not a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub instrument: String,
    pub price: f64,
    pub quantity: i64,
    /// Epoch seconds, interpreted in the local timezone during enrichment.
    pub timestamp: i64,
    /// May be empty; empty references are excluded from grouping.
    pub trade_reference: String,
    /// `None` encodes the empty instrument-type cell.
    pub side: Option<Side>,
    pub underlying_asset: String,
    pub client_reference: String,
}

impl Trade {
    /// The side column as written to files and the database.
    pub fn side_str(&self) -> &'static str {
        self.side.map(Side::as_str).unwrap_or("")
    }
}

/// A trade plus the two computed columns added by enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTrade {
    pub trade: Trade,
    /// Price × Quantity.
    pub market_value: f64,
    /// Calendar day of the trade timestamp.
    pub day: NaiveDate,
}
