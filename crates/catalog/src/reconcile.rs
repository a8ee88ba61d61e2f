//! Supplier price-list replacement.
//!
//! Replacing a supplier's rows must never orphan a product a customer has
//! committed to, and must not let superseded, unreferenced rows pile up in the
//! active catalog. `reconcile` is the set partition that enforces both:
//!
//! ```text
//! active ──┬── other suppliers ───────────────┐
//!          └── this supplier ──┬── live ──► archive (tagged)
//!                              └── not live ──► dropped
//! new batch ──────────────────────────────────┴──► active
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use vintrade_core::{ProductId, SupplierKey};

use crate::discontinued::DiscontinuedEntry;
use crate::product::Product;

/// What a reconciliation did, for the import summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Rows in the new batch.
    pub imported: usize,
    /// Previously active rows of this supplier (archived + dropped).
    pub replaced: usize,
    /// Old rows moved to the archive because they are live-referenced.
    pub archived: Vec<ProductId>,
    /// Old rows removed outright.
    pub dropped: Vec<ProductId>,
}

/// New catalog state after a supplier import.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub active: Vec<Product>,
    pub discontinued: Vec<DiscontinuedEntry>,
    pub outcome: ReconcileOutcome,
}

/// Replace `supplier`'s active rows with `new_batch`.
///
/// Batch rows are tagged with `supplier`. An archived row that already had an
/// archive entry replaces that entry, so the archive holds each id once. A
/// batch row that reuses an existing id supersedes the old row (and leaves the
/// archive if it was there) instead of being archived or dropped.
pub fn reconcile(
    active: Vec<Product>,
    discontinued: Vec<DiscontinuedEntry>,
    new_batch: Vec<Product>,
    supplier: &SupplierKey,
    live_ids: &HashSet<ProductId>,
    now: DateTime<Utc>,
) -> Reconciliation {
    let batch_ids: HashSet<ProductId> = new_batch.iter().map(|p| p.id).collect();

    let (old_rows, other_suppliers): (Vec<Product>, Vec<Product>) = active
        .into_iter()
        .filter(|p| !batch_ids.contains(&p.id))
        .partition(|p| &p.supplier == supplier);

    let (must_archive, droppable): (Vec<Product>, Vec<Product>) =
        old_rows.into_iter().partition(|p| live_ids.contains(&p.id));

    let archived: Vec<ProductId> = must_archive.iter().map(|p| p.id).collect();
    let superseded: HashSet<ProductId> = archived.iter().chain(batch_ids.iter()).copied().collect();

    let mut archive: Vec<DiscontinuedEntry> = discontinued
        .into_iter()
        .filter(|d| !superseded.contains(&d.id()))
        .collect();
    archive.extend(
        must_archive
            .into_iter()
            .map(|p| DiscontinuedEntry::new(p, now, supplier.clone())),
    );

    let outcome = ReconcileOutcome {
        imported: new_batch.len(),
        replaced: archived.len() + droppable.len(),
        archived,
        dropped: droppable.iter().map(|p| p.id).collect(),
    };

    let mut next_active = other_suppliers;
    next_active.extend(new_batch.into_iter().map(|mut p| {
        p.supplier = supplier.clone();
        p
    }));

    Reconciliation {
        active: next_active,
        discontinued: archive,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::product;

    fn key(s: &str) -> SupplierKey {
        SupplierKey::new(s).unwrap()
    }

    fn ids(items: &[Product]) -> Vec<ProductId> {
        items.iter().map(|p| p.id).collect()
    }

    #[test]
    fn referenced_rows_are_archived_and_the_rest_dropped() {
        let a = product("Acme", "A");
        let b = product("Acme", "B");
        let c = product("Acme", "C");
        let other = product("Kermit", "K");
        let d = product("Acme", "D");
        let e = product("Acme", "E");

        let live = HashSet::from([b.id]);
        let now = Utc::now();
        let r = reconcile(
            vec![a.clone(), other.clone(), b.clone(), c.clone()],
            vec![],
            vec![d.clone(), e.clone()],
            &key("Acme"),
            &live,
            now,
        );

        assert_eq!(ids(&r.active), vec![other.id, d.id, e.id]);
        assert_eq!(r.discontinued.len(), 1);
        assert_eq!(r.discontinued[0].id(), b.id);
        assert_eq!(r.discontinued[0].replaced_by, key("acme"));
        assert_eq!(r.discontinued[0].discontinued_at, now);

        assert_eq!(r.outcome.imported, 2);
        assert_eq!(r.outcome.replaced, 3);
        assert_eq!(r.outcome.archived, vec![b.id]);
        assert_eq!(r.outcome.dropped, vec![a.id, c.id]);
    }

    #[test]
    fn rearchiving_replaces_the_previous_entry() {
        let b = product("Acme", "B");
        let stale = DiscontinuedEntry::new(b.clone(), Utc::now(), key("old"));
        let keep = DiscontinuedEntry::new(product("Zed", "Z"), Utc::now(), key("zed"));

        let r = reconcile(
            vec![b.clone()],
            vec![stale, keep.clone()],
            vec![],
            &key("acme"),
            &HashSet::from([b.id]),
            Utc::now(),
        );

        assert_eq!(r.discontinued.len(), 2);
        assert_eq!(r.discontinued[0], keep);
        assert_eq!(r.discontinued[1].id(), b.id);
        assert_eq!(r.discontinued[1].replaced_by, key("acme"));
    }

    #[test]
    fn first_import_for_a_supplier_touches_nothing_else() {
        let other = product("Kermit", "K");
        let batch = vec![product("whatever", "N")];
        let r = reconcile(
            vec![other.clone()],
            vec![],
            batch.clone(),
            &key("Acme"),
            &HashSet::new(),
            Utc::now(),
        );
        assert_eq!(r.active.len(), 2);
        assert_eq!(r.active[0], other);
        assert_eq!(r.active[1].supplier, key("acme"));
        assert_eq!(r.outcome.replaced, 0);
        assert!(r.discontinued.is_empty());
    }

    #[test]
    fn relisting_an_archived_id_moves_it_back_to_active() {
        let b = product("Acme", "B");
        let archived = DiscontinuedEntry::new(b.clone(), Utc::now(), key("acme"));

        let r = reconcile(
            vec![],
            vec![archived],
            vec![b.clone()],
            &key("acme"),
            &HashSet::from([b.id]),
            Utc::now(),
        );

        assert_eq!(ids(&r.active), vec![b.id]);
        assert!(r.discontinued.is_empty());
        assert!(r.outcome.archived.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// (supplier index, live?) per existing row; batch size.
        fn scenario() -> impl Strategy<Value = (Vec<(u8, bool)>, Vec<(u8, bool)>, usize)> {
            (
                prop::collection::vec((0u8..3, any::<bool>()), 0..20),
                prop::collection::vec((0u8..3, any::<bool>()), 0..6),
                0usize..8,
            )
        }

        const SUPPLIERS: [&str; 3] = ["acme", "kermit", "zed"];

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: nothing disappears except rows classified droppable,
            /// and no live row of the supplier leaves both sets.
            #[test]
            fn reconcile_is_a_partition((rows, archived, batch_len) in scenario()) {
                let supplier = key("acme");
                let mut live = HashSet::new();

                let active: Vec<Product> = rows.iter().map(|(s, is_live)| {
                    let p = product(SUPPLIERS[*s as usize], "row");
                    if *is_live { live.insert(p.id); }
                    p
                }).collect();
                let discontinued: Vec<DiscontinuedEntry> = archived.iter().map(|(s, is_live)| {
                    let p = product(SUPPLIERS[*s as usize], "old");
                    if *is_live { live.insert(p.id); }
                    DiscontinuedEntry::new(p, Utc::now(), key("earlier"))
                }).collect();
                let batch: Vec<Product> = (0..batch_len).map(|_| product("acme", "new")).collect();

                let mut before: HashSet<ProductId> = active.iter().map(|p| p.id).collect();
                before.extend(discontinued.iter().map(|d| d.id()));
                before.extend(batch.iter().map(|p| p.id));
                let archive_before = discontinued.len();

                let r = reconcile(active, discontinued, batch.clone(), &supplier, &live, Utc::now());

                let mut after: HashSet<ProductId> = r.active.iter().map(|p| p.id).collect();
                after.extend(r.discontinued.iter().map(|d| d.id()));

                let dropped: HashSet<ProductId> = r.outcome.dropped.iter().copied().collect();
                let expected: HashSet<ProductId> = before.difference(&dropped).copied().collect();
                prop_assert_eq!(&after, &expected);

                for id in &live {
                    prop_assert!(after.contains(id));
                    prop_assert!(!dropped.contains(id));
                }

                let supplier_rows: Vec<ProductId> = r.active.iter()
                    .filter(|p| p.supplier == supplier)
                    .map(|p| p.id)
                    .collect();
                prop_assert_eq!(supplier_rows, ids(&batch));
                prop_assert!(r.discontinued.len() >= archive_before);

                let active_ids: HashSet<ProductId> = r.active.iter().map(|p| p.id).collect();
                for d in &r.discontinued {
                    prop_assert!(!active_ids.contains(&d.id()));
                }
            }

            /// Property: importing the same batch twice leaves the supplier's
            /// active rows equal to the batch and never shrinks the archive.
            #[test]
            fn repeated_import_is_idempotent(rows in prop::collection::vec(any::<bool>(), 0..12)) {
                let supplier = key("acme");
                let mut live = HashSet::new();
                let active: Vec<Product> = rows.iter().map(|is_live| {
                    let p = product("acme", "row");
                    if *is_live { live.insert(p.id); }
                    p
                }).collect();
                let batch: Vec<Product> = (0..3).map(|_| product("acme", "new")).collect();

                let first = reconcile(active, vec![], batch.clone(), &supplier, &live, Utc::now());
                let second = reconcile(
                    first.active.clone(),
                    first.discontinued.clone(),
                    batch.clone(),
                    &supplier,
                    &live,
                    Utc::now(),
                );

                // Same ids again: the rows supersede themselves.
                prop_assert!(second.outcome.dropped.is_empty());
                prop_assert!(second.outcome.archived.is_empty());
                let supplier_rows: Vec<ProductId> = second.active.iter()
                    .filter(|p| p.supplier == supplier)
                    .map(|p| p.id)
                    .collect();
                prop_assert_eq!(supplier_rows, ids(&batch));
                prop_assert!(second.discontinued.len() >= first.discontinued.len());
            }
        }
    }
}
