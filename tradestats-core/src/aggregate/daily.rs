//! Per-day cross-instrument statistics.
//!
//! For each day, for each instrument traded that day: total traded value,
//! the signed closing value (SELL value minus BUY value), and the closing
//! position (side of the latest sided trade).

use super::{group_in_order, latest};
use crate::domain::{EnrichedTrade, Side};
use chrono::NaiveDate;

/// One instrument's statistics within a day.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRow {
    pub instrument: String,
    pub total_traded_value: f64,
    /// Σ market value of SELL trades − Σ market value of BUY trades.
    /// Unsided trades contribute to neither term.
    pub closing_value: f64,
    /// Side of the latest sided trade of the day; `None` when every trade
    /// that day was unsided. First record encountered wins an exact
    /// timestamp tie.
    pub closing_position: Option<Side>,
}

/// The cross-instrument table for one day, instruments in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub day: NaiveDate,
    pub rows: Vec<InstrumentRow>,
}

/// One table per distinct day, days in first-seen order. An empty ledger
/// yields an empty output.
pub fn daily_stats(ledger: &[EnrichedTrade]) -> Vec<DailyStats> {
    group_in_order(ledger.iter(), |t| Some(t.day))
        .into_iter()
        .map(|(day, day_trades)| {
            let rows = group_in_order(day_trades, |t| Some(t.trade.instrument.clone()))
                .into_iter()
                .map(|(instrument, trades)| {
                    let mut total_traded_value = 0.0;
                    let mut sell_value = 0.0;
                    let mut buy_value = 0.0;
                    for t in &trades {
                        total_traded_value += t.market_value;
                        match t.trade.side {
                            Some(Side::Sell) => sell_value += t.market_value,
                            Some(Side::Buy) => buy_value += t.market_value,
                            None => {}
                        }
                    }
                    let closing_position =
                        latest(trades.iter().copied().filter(|t| t.trade.side.is_some()))
                            .and_then(|t| t.trade.side);
                    InstrumentRow {
                        instrument,
                        total_traded_value,
                        closing_value: sell_value - buy_value,
                        closing_position,
                    }
                })
                .collect();
            DailyStats { day, rows }
        })
        .collect()
}
