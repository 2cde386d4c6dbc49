//! Trade-reference grouping.

use super::group_in_order;
use crate::domain::EnrichedTrade;

/// The constituent trades of one trade reference, in ledger order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGroup {
    pub reference: String,
    pub trades: Vec<EnrichedTrade>,
}

/// Partition the ledger by trade reference, references in first-seen order.
/// Trades with an empty reference are excluded entirely; there is no "none"
/// bucket.
pub fn reference_groups(ledger: &[EnrichedTrade]) -> Vec<ReferenceGroup> {
    group_in_order(ledger.iter(), |t| {
        let reference = &t.trade.trade_reference;
        (!reference.is_empty()).then(|| reference.clone())
    })
    .into_iter()
    .map(|(reference, trades)| ReferenceGroup {
        reference,
        trades: trades.into_iter().cloned().collect(),
    })
    .collect()
}
