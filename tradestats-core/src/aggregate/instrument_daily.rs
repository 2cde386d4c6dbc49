//! Per-instrument daily statistics.
//!
//! For each instrument, for each day that instrument traded: total market
//! value, closing value (price of the latest trade that day), and the
//! arithmetic mean price.

use super::{group_in_order, latest};
use crate::domain::EnrichedTrade;
use chrono::NaiveDate;

/// One day of statistics for an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub total_market_value: f64,
    /// Price of the latest trade of the day; first record encountered wins
    /// an exact timestamp tie.
    pub closing_value: f64,
    pub average_price: f64,
}

/// The daily table for one instrument, days in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentDailyStats {
    pub instrument: String,
    pub rows: Vec<DailyRow>,
}

/// One table per distinct instrument, instruments in first-seen order.
/// An empty ledger yields an empty output.
pub fn instrument_daily_stats(ledger: &[EnrichedTrade]) -> Vec<InstrumentDailyStats> {
    group_in_order(ledger.iter(), |t| Some(t.trade.instrument.clone()))
        .into_iter()
        .map(|(instrument, trades)| {
            let rows = group_in_order(trades, |t| Some(t.day))
                .into_iter()
                .map(|(day, day_trades)| {
                    let total_market_value = day_trades.iter().map(|t| t.market_value).sum();
                    let price_sum: f64 = day_trades.iter().map(|t| t.trade.price).sum();
                    // Groups are never empty by construction.
                    let closing_value = latest(day_trades.iter().copied())
                        .map(|t| t.trade.price)
                        .unwrap_or_default();
                    DailyRow {
                        day,
                        total_market_value,
                        closing_value,
                        average_price: price_sum / day_trades.len() as f64,
                    }
                })
                .collect();
            InstrumentDailyStats { instrument, rows }
        })
        .collect()
}
