//! Customer commitments: placed orders and per-customer special-order lists.
//!
//! These are the live references the catalog reconciler must protect.
//! Deterministic domain logic only (no IO, no storage).

pub mod order;
pub mod references;
pub mod special_order;

pub use order::{Order, OrderLine, OrderStatus};
pub use references::live_referenced_ids;
pub use special_order::{SpecialOrderItem, SpecialOrderList, SpecialOrderStatus};
