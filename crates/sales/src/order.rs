use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintrade_catalog::Product;
use vintrade_core::{CustomerId, DomainError, DomainResult, OrderId, ProductId, SupplierKey};

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal orders no longer hold their products live.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    fn can_move_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Shipped, Completed)
        )
    }
}

/// Snapshot of a product at order time.
///
/// Later catalog edits or re-imports never change an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub supplier: SupplierKey,
    pub producer: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vintage: Option<String>,
    pub quantity: u32,
    /// Frontline bottle price when the order was placed.
    pub unit_price: f64,
}

impl OrderLine {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            supplier: product.supplier.clone(),
            producer: product.fields.producer.clone(),
            name: product.fields.name.clone(),
            vintage: product.fields.vintage.clone(),
            quantity,
            unit_price: product.pricing.frontline,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer: CustomerId,
    lines: Vec<OrderLine>,
    status: OrderStatus,
    placed_at: DateTime<Utc>,
}

impl Order {
    /// Place a new order in `Pending`.
    pub fn place(
        id: OrderId,
        customer: CustomerId,
        lines: Vec<OrderLine>,
        placed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("an order needs at least one line"));
        }
        if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
            return Err(DomainError::validation(format!(
                "quantity for {} must be at least 1",
                line.product_id
            )));
        }
        Ok(Self {
            id,
            customer,
            lines,
            status: OrderStatus::Pending,
            placed_at,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &CustomerId {
        &self.customer
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Order total in dollars, rounded to cents.
    pub fn total(&self) -> f64 {
        let sum: f64 = self.lines.iter().map(OrderLine::line_total).sum();
        (sum * 100.0).round() / 100.0
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.lines.iter().map(|l| l.product_id)
    }

    pub fn transition(&mut self, next: OrderStatus) -> DomainResult<()> {
        if self.status == next {
            return Err(DomainError::conflict(format!("order is already {next:?}")));
        }
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "order {} is {:?} and can no longer change",
                self.id, self.status
            )));
        }
        if !self.status.can_move_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move order from {:?} to {next:?}",
                self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}
