use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintrade_core::{DomainError, DomainResult, ProductId, SupplierKey};
use vintrade_pricing::{FormulaSet, PriceBreakdown, compute_price};

/// Where a product comes from, coarse to fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appellation: Option<String>,
}

/// The canonical, supplier-provided part of a product.
///
/// Missing numeric values stay `None` here; the pricing engine applies its
/// own defaults, so the catalog keeps showing what the supplier actually sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    pub producer: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vintage: Option<String>,
    pub pack_size: Option<u32>,
    pub bottle_size_ml: Option<f64>,
    /// FOB cost per case; `None` when the price list left it blank.
    pub cost_per_case: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
}

impl ProductFields {
    /// A row is only a product if it names a producer or a wine.
    pub fn is_identifiable(&self) -> bool {
        !self.producer.trim().is_empty() || !self.name.trim().is_empty()
    }

    pub fn price(&self, formulas: &FormulaSet) -> PriceBreakdown {
        compute_price(
            self.cost_per_case.unwrap_or(0.0),
            self.pack_size,
            self.bottle_size_ml,
            &self.category,
            formulas,
        )
    }
}

/// A catalog row (active or archived).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub supplier: SupplierKey,
    #[serde(flatten)]
    pub fields: ProductFields,
    pub pricing: PriceBreakdown,
    pub imported_at: DateTime<Utc>,
    /// Unmapped spreadsheet columns the operator chose to keep, keyed by the
    /// original header text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_fields: BTreeMap<String, String>,
}

impl Product {
    /// Build a product and price it under `formulas`.
    pub fn priced(
        id: ProductId,
        supplier: SupplierKey,
        fields: ProductFields,
        extra_fields: BTreeMap<String, String>,
        imported_at: DateTime<Utc>,
        formulas: &FormulaSet,
    ) -> Self {
        let pricing = fields.price(formulas);
        Self {
            id,
            supplier,
            fields,
            pricing,
            imported_at,
            extra_fields,
        }
    }

    pub fn reprice(&mut self, formulas: &FormulaSet) {
        self.pricing = self.fields.price(formulas);
    }

    /// Recompute the stored ladder if it was produced by another formula
    /// version. Returns whether anything changed.
    pub fn ensure_priced(&mut self, formulas: &FormulaSet) -> bool {
        if self.pricing.is_current(formulas) {
            return false;
        }
        self.reprice(formulas);
        true
    }

    /// Apply a manual catalog edit and reprice.
    pub fn apply_patch(&mut self, patch: ProductPatch, formulas: &FormulaSet) -> DomainResult<()> {
        let mut fields = self.fields.clone();
        let mut extra_fields = self.extra_fields.clone();
        patch.apply_to(&mut fields, &mut extra_fields)?;

        if !fields.is_identifiable() {
            return Err(DomainError::validation(
                "a product needs a producer or a name",
            ));
        }
        if let Some(cost) = fields.cost_per_case {
            if !cost.is_finite() || cost < 0.0 {
                return Err(DomainError::validation("cost per case must be a non-negative number"));
            }
        }

        self.fields = fields;
        self.extra_fields = extra_fields;
        self.reprice(formulas);
        Ok(())
    }
}

/// Manual edit of an active product. `None` leaves a field untouched; an
/// empty string clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub item_code: Option<String>,
    pub producer: Option<String>,
    pub name: Option<String>,
    pub vintage: Option<String>,
    pub pack_size: Option<u32>,
    pub bottle_size_ml: Option<f64>,
    pub cost_per_case: Option<f64>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub appellation: Option<String>,
    pub product_link: Option<String>,
    /// Extra fields to set; an empty value removes the key.
    pub extra_fields: BTreeMap<String, String>,
}

impl ProductPatch {
    fn apply_to(
        self,
        fields: &mut ProductFields,
        extra_fields: &mut BTreeMap<String, String>,
    ) -> DomainResult<()> {
        if let Some(v) = self.producer {
            fields.producer = v.trim().to_string();
        }
        if let Some(v) = self.name {
            fields.name = v.trim().to_string();
        }
        if let Some(v) = self.category {
            fields.category = v.trim().to_string();
        }
        set_optional(&mut fields.item_code, self.item_code);
        set_optional(&mut fields.vintage, self.vintage);
        set_optional(&mut fields.origin.country, self.country);
        set_optional(&mut fields.origin.region, self.region);
        set_optional(&mut fields.origin.appellation, self.appellation);
        set_optional(&mut fields.product_link, self.product_link);

        if let Some(pack) = self.pack_size {
            if pack == 0 {
                return Err(DomainError::validation("pack size must be at least 1"));
            }
            fields.pack_size = Some(pack);
        }
        if let Some(ml) = self.bottle_size_ml {
            if !ml.is_finite() || ml <= 0.0 {
                return Err(DomainError::validation("bottle size must be a positive number of ml"));
            }
            fields.bottle_size_ml = Some(ml);
        }
        if let Some(cost) = self.cost_per_case {
            fields.cost_per_case = Some(cost);
        }

        for (key, value) in self.extra_fields {
            if value.trim().is_empty() {
                extra_fields.remove(&key);
            } else {
                extra_fields.insert(key, value);
            }
        }
        Ok(())
    }
}

fn set_optional(slot: &mut Option<String>, update: Option<String>) {
    if let Some(v) = update {
        let v = v.trim();
        *slot = if v.is_empty() { None } else { Some(v.to_string()) };
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn product(supplier: &str, name: &str) -> Product {
        Product::priced(
            ProductId::new(),
            SupplierKey::new(supplier).unwrap(),
            ProductFields {
                producer: "Domaine Test".to_string(),
                name: name.to_string(),
                pack_size: Some(12),
                bottle_size_ml: Some(750.0),
                cost_per_case: Some(120.0),
                category: "Red".to_string(),
                ..ProductFields::default()
            },
            BTreeMap::new(),
            Utc::now(),
            &FormulaSet::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::product;
    use super::*;
    use vintrade_pricing::{FormulaParams, FormulaProfile};

    #[test]
    fn priced_products_carry_the_formula_version() {
        let p = product("acme", "Cuvée A");
        assert_eq!(p.pricing.formula_version, 1);
        assert_eq!(p.pricing.frontline, 17.68);
    }

    #[test]
    fn ensure_priced_only_recomputes_stale_rows() {
        let mut p = product("acme", "Cuvée A");
        let formulas = FormulaSet::default();
        assert!(!p.ensure_priced(&formulas));

        let mut wine = FormulaParams::WINE;
        wine.shipping_per_case = 20.0;
        let next = formulas.with_params(FormulaProfile::Wine, wine).unwrap();
        assert!(p.ensure_priced(&next));
        assert_eq!(p.pricing.formula_version, 2);
        assert!(p.pricing.laid_in > 136.03);
    }

    #[test]
    fn patch_reprices_and_clears_optional_fields() {
        let mut p = product("acme", "Cuvée A");
        p.fields.vintage = Some("2019".to_string());
        let before = p.pricing.frontline;

        let patch = ProductPatch {
            cost_per_case: Some(240.0),
            vintage: Some(String::new()),
            extra_fields: BTreeMap::from([("Score".to_string(), "94".to_string())]),
            ..ProductPatch::default()
        };
        p.apply_patch(patch, &FormulaSet::default()).unwrap();

        assert!(p.pricing.frontline > before);
        assert_eq!(p.fields.vintage, None);
        assert_eq!(p.extra_fields.get("Score").map(String::as_str), Some("94"));
    }

    #[test]
    fn patch_cannot_erase_identity() {
        let mut p = product("acme", "Cuvée A");
        let original = p.clone();
        let patch = ProductPatch {
            producer: Some(" ".to_string()),
            name: Some(String::new()),
            ..ProductPatch::default()
        };
        let err = p.apply_patch(patch, &FormulaSet::default()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(p, original);
    }

    #[test]
    fn serialized_shape_is_flat() {
        let p = product("acme", "Cuvée A");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["supplier"], "acme");
        assert_eq!(json["name"], "Cuvée A");
        assert!(json.get("extra_fields").is_none());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
