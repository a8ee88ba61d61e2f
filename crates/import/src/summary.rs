use serde::{Deserialize, Serialize};

use vintrade_catalog::ReconcileOutcome;
use vintrade_core::SupplierKey;

use crate::rows::DataQualityWarning;

/// Result of one import, as reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub supplier: SupplierKey,
    pub source_name: String,
    pub imported: usize,
    pub replaced: usize,
    pub archived: usize,
    pub dropped: usize,
    pub skipped_rows: usize,
    pub warning_count: usize,
    /// Empty when there are more than `MAX_LISTED_WARNINGS`.
    pub warnings: Vec<String>,
    pub mapping_saved: bool,
}

impl ImportSummary {
    pub const MAX_LISTED_WARNINGS: usize = 5;

    pub fn new(
        supplier: SupplierKey,
        source_name: impl Into<String>,
        outcome: &ReconcileOutcome,
        skipped_rows: usize,
        warnings: &[DataQualityWarning],
        mapping_saved: bool,
    ) -> Self {
        let listed = if warnings.len() <= Self::MAX_LISTED_WARNINGS {
            warnings.iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };
        Self {
            supplier,
            source_name: source_name.into(),
            imported: outcome.imported,
            replaced: outcome.replaced,
            archived: outcome.archived.len(),
            dropped: outcome.dropped.len(),
            skipped_rows,
            warning_count: warnings.len(),
            warnings: listed,
            mapping_saved,
        }
    }

    /// Confirmation text shown after an import.
    pub fn message(&self) -> String {
        let mut msg = format!(
            "Imported {} products from {}.",
            self.imported, self.source_name
        );
        if self.replaced > 0 {
            msg.push_str(&format!(" {} previous products replaced", self.replaced));
            if self.archived > 0 {
                msg.push_str(&format!(
                    " ({} moved to discontinued because they are still referenced)",
                    self.archived
                ));
            }
            msg.push('.');
        }
        if self.skipped_rows > 0 {
            msg.push_str(&format!(
                " {} rows skipped without producer or name.",
                self.skipped_rows
            ));
        }
        if self.mapping_saved {
            msg.push_str(&format!(" Mapping template saved for {}.", self.supplier));
        }

        if !self.warnings.is_empty() {
            msg.push_str("\n\nWarnings:\n");
            msg.push_str(&self.warnings.join("\n"));
        } else if self.warning_count > 0 {
            msg.push_str(&format!(
                "\n\n{} validation warnings detected.",
                self.warning_count
            ));
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::WarningKind;
    use vintrade_core::ProductId;

    fn warning(row_number: usize) -> DataQualityWarning {
        DataQualityWarning {
            row_number,
            kind: WarningKind::MissingCost,
            product: "Red".into(),
        }
    }

    fn outcome() -> ReconcileOutcome {
        ReconcileOutcome {
            imported: 2,
            replaced: 3,
            archived: vec![ProductId::new()],
            dropped: vec![ProductId::new(), ProductId::new()],
        }
    }

    #[test]
    fn lists_up_to_five_warnings() {
        let warnings: Vec<_> = (2..7).map(warning).collect();
        let s = ImportSummary::new(
            SupplierKey::new("acme").unwrap(),
            "acme.csv",
            &outcome(),
            0,
            &warnings,
            true,
        );

        assert_eq!(s.warning_count, 5);
        assert_eq!(s.warnings.len(), 5);
        assert_eq!((s.archived, s.dropped), (1, 2));
        let msg = s.message();
        assert!(msg.starts_with(
            "Imported 2 products from acme.csv. 3 previous products replaced (1 moved to discontinued"
        ));
        assert!(msg.contains("Mapping template saved for acme."));
        assert!(msg.contains("Row 6: Missing FOB price for Red"));
    }

    #[test]
    fn only_counts_when_more_than_five() {
        let warnings: Vec<_> = (2..8).map(warning).collect();
        let s = ImportSummary::new(
            SupplierKey::new("acme").unwrap(),
            "acme.csv",
            &ReconcileOutcome::default(),
            1,
            &warnings,
            false,
        );

        assert!(s.warnings.is_empty());
        let msg = s.message();
        assert!(msg.ends_with("6 validation warnings detected."));
        assert!(msg.contains("1 rows skipped"));
        assert!(!msg.contains("Mapping template"));
    }
}
