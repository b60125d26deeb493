//! Order totals
//!
//! Single place where the money invariant is enforced:
//! `subtotal == Σ item.subtotal (item not REJECTED)` and
//! `total == subtotal + tax - discount`. Tip is recorded on the order but
//! never folded into `total`.

use shared::order::ItemStatus;

use crate::db::models::Order;

/// Recompute `subtotal` and `total` from the item list.
///
/// Call after any mutation of the items. Rejected lines stay in the list
/// for receipts but contribute nothing.
pub fn recalculate_totals(order: &mut Order) {
    order.subtotal = order
        .items
        .iter()
        .filter(|item| item.status != ItemStatus::Rejected)
        .map(|item| item.subtotal)
        .sum();
    order.total = order.subtotal + order.tax - order.discount;
}
