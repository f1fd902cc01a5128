//! Stage 5 — finalizer: re-derive order money columns from line items.
//!
//! The authoritative totals pass. Every order's subtotal, tax, and total are
//! recomputed bottom-up from its line items with the canonical formula:
//!
//! ```text
//! line_subtotal = round2(quantity × unit_price × (1 − discount))
//! tax_amount    = round2(Σ line_subtotal × tax_rate)
//! total_amount  = round2(Σ + tax + shipping_fee − discount_amount)
//! ```
//!
//! The transaction stage applies the same formula when it creates payments,
//! so this pass is a no-op on well-formed data — but it guarantees the
//! invariant holds even if an upstream stage changes, and it is what the
//! audit checks verify against.

use crate::config::GeneratorConfig;
use crate::model::round2;

use super::transactions::TransactionData;

/// Recompute `subtotal` on every line item and the money columns on every
/// order. Relies on items being grouped by `order_id` in insertion order,
/// which the transaction stage guarantees.
pub fn finalize_totals(config: &GeneratorConfig, txn: &mut TransactionData) {
    for item in &mut txn.order_items {
        item.subtotal = item.computed_subtotal();
    }

    // Single forward scan over the contiguous item runs
    let mut cursor = 0;
    for order in &mut txn.orders {
        let mut item_sum = 0.0;
        while cursor < txn.order_items.len() && txn.order_items[cursor].order_id == order.order_id {
            item_sum = round2(item_sum + txn.order_items[cursor].subtotal);
            cursor += 1;
        }
        order.tax_amount = round2(item_sum * config.pricing.tax_rate);
        order.total_amount =
            round2(item_sum + order.tax_amount + order.shipping_fee - order.discount_amount);
    }
}
