//! Supplier rename / merge.

use vintrade_core::SupplierKey;

use crate::discontinued::DiscontinuedEntry;
use crate::product::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    pub active_moved: usize,
    pub archive_retagged: usize,
    /// `to` already had rows, so two price lists now share one key.
    pub merged: bool,
}

/// Move everything filed under `from` to `to`.
///
/// Active rows and archive entries are re-keyed, as are `replaced_by` tags.
/// Renaming onto an existing key merges the two suppliers; the next import
/// for `to` then replaces both sets of rows.
pub fn rename_supplier(
    active: &mut [Product],
    discontinued: &mut [DiscontinuedEntry],
    from: &SupplierKey,
    to: &SupplierKey,
) -> RenameOutcome {
    if from == to {
        return RenameOutcome::default();
    }

    let merged = active.iter().any(|p| &p.supplier == to)
        || discontinued.iter().any(|d| &d.product.supplier == to);

    let mut outcome = RenameOutcome {
        merged,
        ..RenameOutcome::default()
    };

    for p in active.iter_mut().filter(|p| &p.supplier == from) {
        p.supplier = to.clone();
        outcome.active_moved += 1;
    }

    for d in discontinued.iter_mut() {
        let mut touched = false;
        if &d.product.supplier == from {
            d.product.supplier = to.clone();
            touched = true;
        }
        if &d.replaced_by == from {
            d.replaced_by = to.clone();
            touched = true;
        }
        if touched {
            outcome.archive_retagged += 1;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::product;
    use chrono::Utc;

    fn key(s: &str) -> SupplierKey {
        SupplierKey::new(s).unwrap()
    }

    #[test]
    fn rename_moves_rows_and_archive_tags() {
        let mut active = vec![product("Acme", "A"), product("Zed", "Z")];
        let mut archive = vec![DiscontinuedEntry::new(product("Acme", "B"), Utc::now(), key("acme"))];

        let out = rename_supplier(&mut active, &mut archive, &key("acme"), &key("Acme Imports"));

        assert_eq!(out, RenameOutcome { active_moved: 1, archive_retagged: 1, merged: false });
        assert_eq!(active[0].supplier, key("acme-imports"));
        assert_eq!(active[1].supplier, key("zed"));
        assert_eq!(archive[0].product.supplier, key("acme-imports"));
        assert_eq!(archive[0].replaced_by, key("acme-imports"));
    }

    #[test]
    fn renaming_onto_an_existing_supplier_is_a_merge() {
        let mut active = vec![product("Acme", "A"), product("Acme Imports", "B")];
        let out = rename_supplier(&mut active, &mut [], &key("acme"), &key("acme imports"));
        assert!(out.merged);
        assert!(active.iter().all(|p| p.supplier == key("acme-imports")));
    }

    #[test]
    fn renaming_to_itself_is_a_no_op() {
        let mut active = vec![product("Acme", "A")];
        let out = rename_supplier(&mut active, &mut [], &key("acme"), &key("ACME"));
        assert_eq!(out, RenameOutcome::default());
    }
}
