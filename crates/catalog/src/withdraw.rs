//! Manual removal of an active product.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use vintrade_core::{DomainError, DomainResult, ProductId};

use crate::discontinued::DiscontinuedEntry;
use crate::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Withdrawal {
    /// Nothing referenced it; it is gone.
    Deleted,
    /// Still referenced; moved to the archive.
    Archived,
}

/// Remove `id` from the active catalog.
///
/// Unreferenced products are hard-deleted; live-referenced ones are moved to
/// the archive tagged with their own supplier key.
pub fn withdraw_product(
    active: &mut Vec<Product>,
    discontinued: &mut Vec<DiscontinuedEntry>,
    id: ProductId,
    live_ids: &HashSet<ProductId>,
    now: DateTime<Utc>,
) -> DomainResult<Withdrawal> {
    let pos = active
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
    let product = active.remove(pos);

    if !live_ids.contains(&id) {
        return Ok(Withdrawal::Deleted);
    }

    discontinued.retain(|d| d.id() != id);
    let replaced_by = product.supplier.clone();
    discontinued.push(DiscontinuedEntry::new(product, now, replaced_by));
    Ok(Withdrawal::Archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::product;

    #[test]
    fn unreferenced_products_are_deleted() {
        let p = product("acme", "A");
        let mut active = vec![p.clone()];
        let mut archive = vec![];
        let w = withdraw_product(&mut active, &mut archive, p.id, &HashSet::new(), Utc::now()).unwrap();
        assert_eq!(w, Withdrawal::Deleted);
        assert!(active.is_empty());
        assert!(archive.is_empty());
    }

    #[test]
    fn referenced_products_are_archived() {
        let p = product("acme", "A");
        let mut active = vec![p.clone()];
        let mut archive = vec![];
        let w = withdraw_product(&mut active, &mut archive, p.id, &HashSet::from([p.id]), Utc::now())
            .unwrap();
        assert_eq!(w, Withdrawal::Archived);
        assert!(active.is_empty());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].replaced_by, p.supplier);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let err = withdraw_product(&mut vec![], &mut vec![], ProductId::new(), &HashSet::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
