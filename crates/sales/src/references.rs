use std::collections::HashSet;

use vintrade_core::ProductId;

use crate::{Order, SpecialOrderList};

/// Product ids a customer still holds a claim on.
///
/// Lines of non-terminal orders plus every special-order line, whatever its
/// status.
pub fn live_referenced_ids(orders: &[Order], lists: &[SpecialOrderList]) -> HashSet<ProductId> {
    let from_orders = orders
        .iter()
        .filter(|o| !o.status().is_terminal())
        .flat_map(Order::product_ids);
    let from_lists = lists.iter().flat_map(SpecialOrderList::product_ids);
    from_orders.chain(from_lists).collect()
}
