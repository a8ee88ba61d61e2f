//! Catalog domain: products, the discontinued archive, and the reconciler
//! that swaps a supplier's price list without orphaning live references.
//!
//! Pure, deterministic logic only (no IO, no storage).

pub mod discontinued;
pub mod product;
pub mod reconcile;
pub mod retention;
pub mod supplier;
pub mod withdraw;

pub use discontinued::DiscontinuedEntry;
pub use product::{Origin, Product, ProductFields, ProductPatch};
pub use reconcile::{ReconcileOutcome, Reconciliation, reconcile};
pub use retention::{Pruned, RetentionPolicy, prune_discontinued};
pub use supplier::{RenameOutcome, rename_supplier};
pub use withdraw::{Withdrawal, withdraw_product};
