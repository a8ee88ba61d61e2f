use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintrade_core::{ProductId, SupplierKey};

use crate::product::Product;

/// A product withdrawn from sale but kept because a customer still holds a
/// reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscontinuedEntry {
    pub product: Product,
    pub discontinued_at: DateTime<Utc>,
    /// Supplier key of the batch (or manual withdrawal) that displaced it.
    pub replaced_by: SupplierKey,
}

impl DiscontinuedEntry {
    pub fn new(product: Product, discontinued_at: DateTime<Utc>, replaced_by: SupplierKey) -> Self {
        Self {
            product,
            discontinued_at,
            replaced_by,
        }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}
