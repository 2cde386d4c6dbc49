//! The grouping/reduction operations that turn the flat ledger into the
//! derived report tables.
//!
//! All three operations share the same discipline:
//! - Groups appear in first-seen key order (a Vec of groups plus a HashMap
//!   index, never hash-order iteration)
//! - Within a group, rows keep ledger order, so floating-point sums are
//!   performed in ledger order and are reproducible
//! - "Closing" resolution scans in ledger order with a strictly-greater
//!   timestamp comparison, so on an exact timestamp tie the first record
//!   encountered wins

pub mod daily;
pub mod instrument_daily;
pub mod references;

pub use daily::{daily_stats, DailyStats, InstrumentRow};
pub use instrument_daily::{instrument_daily_stats, DailyRow, InstrumentDailyStats};
pub use references::{reference_groups, ReferenceGroup};

use crate::domain::EnrichedTrade;
use std::collections::HashMap;
use std::hash::Hash;

/// Partition trades into groups in first-seen key order. Trades whose key
/// function returns `None` are excluded entirely.
pub(crate) fn group_in_order<'a, K, F>(
    trades: impl IntoIterator<Item = &'a EnrichedTrade>,
    mut key: F,
) -> Vec<(K, Vec<&'a EnrichedTrade>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&'a EnrichedTrade) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a EnrichedTrade>)> = Vec::new();
    for trade in trades {
        let Some(k) = key(trade) else { continue };
        match index.get(&k) {
            Some(&i) => groups[i].1.push(trade),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![trade]));
            }
        }
    }
    groups
}

/// The trade with the maximum timestamp, first-encountered winning ties.
pub(crate) fn latest<'a>(
    trades: impl IntoIterator<Item = &'a EnrichedTrade>,
) -> Option<&'a EnrichedTrade> {
    let mut best: Option<&'a EnrichedTrade> = None;
    for trade in trades {
        match best {
            Some(b) if trade.trade.timestamp > b.trade.timestamp => best = Some(trade),
            None => best = Some(trade),
            _ => {}
        }
    }
    best
}
