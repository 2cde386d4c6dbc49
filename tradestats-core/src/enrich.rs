//! Enrichment — derives the two computed columns used by every aggregator.
//!
//! Market Value = Price × Quantity, plain floating-point arithmetic, no
//! rounding. Day = calendar date of the timestamp interpreted as local-epoch
//! seconds, matching the behavior of the system that produces the files.

use crate::domain::{EnrichedTrade, Trade};
use chrono::{Local, NaiveDate, TimeZone};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("timestamp {0} is out of range for the local calendar")]
    TimestampOutOfRange(i64),
}

/// Enrich a ledger, consuming it and returning the augmented rows in the
/// same order. Fails rather than silently propagating a timestamp that does
/// not map to a calendar day.
pub fn enrich(trades: Vec<Trade>) -> Result<Vec<EnrichedTrade>, EnrichError> {
    trades
        .into_iter()
        .map(|trade| {
            let day = local_day(trade.timestamp)
                .ok_or(EnrichError::TimestampOutOfRange(trade.timestamp))?;
            let market_value = trade.price * trade.quantity as f64;
            Ok(EnrichedTrade {
                trade,
                market_value,
                day,
            })
        })
        .collect()
}

/// Calendar day of an epoch-seconds timestamp in the local timezone.
///
/// For the rare local-time fold (DST transitions) the earlier interpretation
/// wins; both interpretations fall on the same calendar day anyway.
pub fn local_day(timestamp: i64) -> Option<NaiveDate> {
    Local
        .timestamp_opt(timestamp, 0)
        .earliest()
        .map(|dt| dt.date_naive())
}
