use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintrade_core::{CustomerId, DomainError, DomainResult, ProductId};

/// Per-line status of a special-order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialOrderStatus {
    #[default]
    Requested,
    Ordered,
    Arrived,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub status: SpecialOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A customer's live, editable list of special-order lines.
///
/// At most one line per product id. Every line holds its product live,
/// whatever its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialOrderList {
    customer: CustomerId,
    #[serde(default)]
    items: Vec<SpecialOrderItem>,
}

impl SpecialOrderList {
    pub fn new(customer: CustomerId) -> Self {
        Self {
            customer,
            items: Vec::new(),
        }
    }

    pub fn customer(&self) -> &CustomerId {
        &self.customer
    }

    pub fn items(&self) -> &[SpecialOrderItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: ProductId) -> Option<&SpecialOrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add a line, or update quantity/status/note of an existing one.
    pub fn upsert(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        status: SpecialOrderStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                item.status = status;
                item.note = note;
                item.updated_at = now;
            }
            None => self.items.push(SpecialOrderItem {
                product_id,
                quantity,
                status,
                note,
                updated_at: now,
            }),
        }
        Ok(())
    }

    pub fn set_status(
        &mut self,
        product_id: ProductId,
        status: SpecialOrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(format!("special-order item {product_id}")))?;
        item.status = status;
        item.updated_at = now;
        Ok(())
    }

    pub fn remove(&mut self, product_id: ProductId) -> DomainResult<SpecialOrderItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(format!("special-order item {product_id}")))?;
        Ok(self.items.remove(pos))
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.items.iter().map(|i| i.product_id)
    }
}
