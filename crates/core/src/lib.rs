//! `vintrade-core`: shared domain building blocks.
//!
//! Identifiers, supplier keys, the domain error model and the optimistic
//! concurrency expectation used by the storage layer. No IO lives here.

pub mod error;
pub mod id;
pub mod supplier;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, OrderId, ProductId};
pub use supplier::SupplierKey;
pub use version::ExpectedVersion;
