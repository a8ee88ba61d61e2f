//! Header-to-field mapping for supplier price lists.
//!
//! Detection is deliberately simple: for each canonical field the headers are
//! scanned left to right and the first one containing any of the field's
//! synonyms wins. A mapping the operator confirmed for a supplier is replayed
//! verbatim on later imports.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use vintrade_core::{DomainError, DomainResult, SupplierKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    ItemCode,
    Producer,
    ProductName,
    Vintage,
    PackSize,
    BottleSize,
    Category,
    Cost,
    Country,
    Region,
    Appellation,
    ProductLink,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::ItemCode,
        CanonicalField::Producer,
        CanonicalField::ProductName,
        CanonicalField::Vintage,
        CanonicalField::PackSize,
        CanonicalField::BottleSize,
        CanonicalField::Category,
        CanonicalField::Cost,
        CanonicalField::Country,
        CanonicalField::Region,
        CanonicalField::Appellation,
        CanonicalField::ProductLink,
    ];

    /// Lowercase substrings that identify this field in a header.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            CanonicalField::ItemCode => &["item code", "sku", "code", "item#"],
            CanonicalField::Producer => &["producer", "winery", "brand", "manufacturer", "supplier"],
            CanonicalField::ProductName => &["product", "name", "wine", "description", "item"],
            CanonicalField::Vintage => &["vintage", "year"],
            CanonicalField::PackSize => &["pack", "pack size", "case size", "cs", "btl/cs"],
            CanonicalField::BottleSize => &["bottle", "bottle size", "size", "ml", "volume"],
            CanonicalField::Category => &["type", "category", "product type", "class"],
            CanonicalField::Cost => &["fob", "price", "case price", "cost", "wholesale"],
            CanonicalField::Country => &["country"],
            CanonicalField::Region => &["region"],
            CanonicalField::Appellation => &["appellation", "sub-region", "ava"],
            CanonicalField::ProductLink => &["link", "url"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::ItemCode => "item_code",
            CanonicalField::Producer => "producer",
            CanonicalField::ProductName => "product_name",
            CanonicalField::Vintage => "vintage",
            CanonicalField::PackSize => "pack_size",
            CanonicalField::BottleSize => "bottle_size",
            CanonicalField::Category => "category",
            CanonicalField::Cost => "cost",
            CanonicalField::Country => "country",
            CanonicalField::Region => "region",
            CanonicalField::Appellation => "appellation",
            CanonicalField::ProductLink => "product_link",
        }
    }

    fn matches(self, header: &str) -> bool {
        let lowered = header.to_lowercase();
        self.synonyms().iter().any(|s| lowered.contains(s))
    }
}

/// Canonical field to source column index; `None` means unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub fields: BTreeMap<CanonicalField, Option<usize>>,
    /// Unclaimed columns the operator kept as free-form fields.
    #[serde(default)]
    pub extra_columns: Vec<usize>,
}

impl ColumnMapping {
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.fields.get(&field).copied().flatten()
    }

    pub fn set(&mut self, field: CanonicalField, column: Option<usize>) {
        self.fields.insert(field, column);
    }

    pub fn with_extra_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        let unique: BTreeSet<usize> = columns.into_iter().collect();
        self.extra_columns = unique.into_iter().collect();
        self
    }

    /// Columns claimed by some canonical field.
    pub fn claimed(&self) -> BTreeSet<usize> {
        self.fields.values().filter_map(|c| *c).collect()
    }

    /// Every index must point at an existing header.
    pub fn validate(&self, header_count: usize) -> DomainResult<()> {
        for (field, column) in &self.fields {
            match column {
                Some(c) if *c >= header_count => {
                    return Err(DomainError::validation(format!(
                        "{} is mapped to column {c} but the table has {header_count} columns",
                        field.as_str()
                    )));
                }
                _ => {}
            }
        }
        if let Some(c) = self.extra_columns.iter().find(|c| **c >= header_count) {
            return Err(DomainError::validation(format!(
                "extra column {c} is out of range ({header_count} columns)"
            )));
        }
        Ok(())
    }
}

/// A header no canonical field claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHeader {
    pub index: usize,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingProposal {
    pub supplier: SupplierKey,
    pub mapping: ColumnMapping,
    pub extra_headers: Vec<ExtraHeader>,
    /// True when `mapping` is the supplier's saved template.
    pub from_template: bool,
}

/// Propose a mapping for `headers`; never fails.
pub fn map_columns(
    headers: &[String],
    supplier: &SupplierKey,
    saved: Option<&ColumnMapping>,
) -> MappingProposal {
    let (mapping, from_template) = match saved {
        Some(saved) => (saved.clone(), true),
        None => (detect(headers), false),
    };

    let claimed = mapping.claimed();
    let extra_headers = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| !claimed.contains(i) && !h.trim().is_empty())
        .map(|(index, header)| ExtraHeader {
            index,
            header: header.clone(),
        })
        .collect();

    MappingProposal {
        supplier: supplier.clone(),
        mapping,
        extra_headers,
        from_template,
    }
}

fn detect(headers: &[String]) -> ColumnMapping {
    let fields = CanonicalField::ALL
        .iter()
        .map(|field| (*field, headers.iter().position(|h| field.matches(h))))
        .collect();
    ColumnMapping {
        fields,
        extra_columns: Vec::new(),
    }
}

/// Saved mappings, one per supplier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTemplates(BTreeMap<SupplierKey, ColumnMapping>);

impl MappingTemplates {
    pub fn get(&self, supplier: &SupplierKey) -> Option<&ColumnMapping> {
        self.0.get(supplier)
    }

    /// Store `mapping`; returns true when it differs from what was saved.
    pub fn save(&mut self, supplier: SupplierKey, mapping: ColumnMapping) -> bool {
        let changed = self.0.get(&supplier) != Some(&mapping);
        self.0.insert(supplier, mapping);
        changed
    }

    /// Move `from`'s template to `to`. An existing template for `to` wins.
    pub fn rename(&mut self, from: &SupplierKey, to: &SupplierKey) {
        if let Some(mapping) = self.0.remove(from) {
            self.0.entry(to.clone()).or_insert(mapping);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn acme() -> SupplierKey {
        SupplierKey::new("Acme Imports").unwrap()
    }

    #[test]
    fn detects_a_typical_price_list() {
        let h = headers(&[
            "SKU", "Producer", "Wine", "Vintage", "Pack", "Size", "Type", "FOB", "Country",
            "Region", "Appellation", "Notes",
        ]);
        let p = map_columns(&h, &acme(), None);
        let m = &p.mapping;

        assert!(!p.from_template);
        assert_eq!(m.column(CanonicalField::ItemCode), Some(0));
        assert_eq!(m.column(CanonicalField::Producer), Some(1));
        assert_eq!(m.column(CanonicalField::ProductName), Some(2));
        assert_eq!(m.column(CanonicalField::Vintage), Some(3));
        assert_eq!(m.column(CanonicalField::PackSize), Some(4));
        assert_eq!(m.column(CanonicalField::BottleSize), Some(5));
        assert_eq!(m.column(CanonicalField::Category), Some(6));
        assert_eq!(m.column(CanonicalField::Cost), Some(7));
        assert_eq!(m.column(CanonicalField::Country), Some(8));
        assert_eq!(m.column(CanonicalField::Region), Some(9));
        assert_eq!(m.column(CanonicalField::Appellation), Some(10));
        assert_eq!(m.column(CanonicalField::ProductLink), None);
        assert_eq!(
            p.extra_headers,
            vec![ExtraHeader {
                index: 11,
                header: "Notes".into()
            }]
        );
    }

    #[test]
    fn first_matching_header_wins() {
        let h = headers(&["Wholesale", "FOB Price"]);
        let p = map_columns(&h, &acme(), None);
        assert_eq!(p.mapping.column(CanonicalField::Cost), Some(0));
    }

    #[test]
    fn fields_may_share_a_header() {
        let h = headers(&["Pack Size"]);
        let m = map_columns(&h, &acme(), None).mapping;
        assert_eq!(m.column(CanonicalField::PackSize), Some(0));
        assert_eq!(m.column(CanonicalField::BottleSize), Some(0));
    }

    #[test]
    fn a_bare_item_header_is_the_product_name() {
        let h = headers(&["Item", "Item#", "Producer"]);
        let m = map_columns(&h, &acme(), None).mapping;
        assert_eq!(m.column(CanonicalField::ProductName), Some(0));
        assert_eq!(m.column(CanonicalField::ItemCode), Some(1));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let h = headers(&["PRODUCER NAME", "btl/cs"]);
        let m = map_columns(&h, &acme(), None).mapping;
        assert_eq!(m.column(CanonicalField::Producer), Some(0));
        assert_eq!(m.column(CanonicalField::PackSize), Some(1));
    }

    #[test]
    fn saved_mapping_is_replayed_verbatim() {
        let mut saved = ColumnMapping::default();
        saved.set(CanonicalField::ProductName, Some(1));
        saved.set(CanonicalField::Cost, None);

        let h = headers(&["Wine", "Label", "FOB"]);
        let p = map_columns(&h, &acme(), Some(&saved));

        assert!(p.from_template);
        assert_eq!(p.mapping, saved);
        let extras: Vec<usize> = p.extra_headers.iter().map(|e| e.index).collect();
        assert_eq!(extras, vec![0, 2]);
    }

    #[test]
    fn validate_rejects_out_of_range_columns() {
        let mut m = ColumnMapping::default();
        m.set(CanonicalField::Producer, Some(3));
        assert!(m.validate(3).is_err());
        assert!(m.validate(4).is_ok());

        let m = ColumnMapping::default().with_extra_columns([5, 5]);
        assert_eq!(m.extra_columns, vec![5]);
        assert!(m.validate(5).is_err());
    }

    #[test]
    fn template_rename_keeps_existing_target() {
        let mut templates = MappingTemplates::default();
        let from = acme();
        let to = SupplierKey::new("Acme").unwrap();
        let mut a = ColumnMapping::default();
        a.set(CanonicalField::Producer, Some(0));
        let mut b = ColumnMapping::default();
        b.set(CanonicalField::Producer, Some(1));

        assert!(templates.save(from.clone(), a.clone()));
        assert!(!templates.save(from.clone(), a.clone()));
        templates.rename(&from, &to);
        assert_eq!(templates.get(&to), Some(&a));
        assert!(templates.get(&from).is_none());

        templates.save(from.clone(), b);
        templates.rename(&from, &to);
        assert_eq!(templates.get(&to), Some(&a));
        assert_eq!(templates.len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn detected_columns_are_in_range_and_extras_are_unclaimed(
            raw in proptest::collection::vec("[A-Za-z #/-]{0,16}", 0..12)
        ) {
            let p = map_columns(&raw, &acme(), None);
            prop_assert!(p.mapping.validate(raw.len()).is_ok());
            let claimed = p.mapping.claimed();
            for extra in &p.extra_headers {
                prop_assert!(!claimed.contains(&extra.index));
            }
        }
    }
}
