use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use vintrade_catalog::{Origin, ProductFields};
use vintrade_pricing::{parse_bottle_size_ml, parse_cost, parse_pack_size};

use crate::mapping::{CanonicalField, ColumnMapping};
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingCost,
    MissingPackSize,
    MissingCategory,
}

/// Non-blocking problem with an imported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub row_number: usize,
    pub kind: WarningKind,
    pub product: String,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::MissingCost => "FOB price",
            WarningKind::MissingPackSize => "pack size",
            WarningKind::MissingCategory => "product type",
        };
        write!(f, "Row {}: Missing {what} for {}", self.row_number, self.product)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row_number: usize,
    pub fields: ProductFields,
    pub extra_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<ParsedRow>,
    /// Blank rows and rows with neither producer nor name.
    pub skipped_rows: usize,
    pub warnings: Vec<DataQualityWarning>,
}

/// Turn data rows into canonical fields.
///
/// Every non-blank row is checked for missing cost, pack size and category
/// before rows with neither a producer nor a name are skipped, so a dropped
/// row can still contribute warnings.
pub fn parse_rows(table: &Table, mapping: &ColumnMapping) -> ParsedRows {
    let headers = table.headers();
    let mut parsed = ParsedRows::default();

    for (row_number, cells) in table.data_rows() {
        if cells.iter().all(Cell::is_empty) {
            parsed.skipped_rows += 1;
            continue;
        }
        let fields = read_fields(cells, mapping);

        let label = if fields.name.is_empty() {
            "unknown product".to_string()
        } else {
            fields.name.clone()
        };
        let mut warn = |kind| {
            parsed.warnings.push(DataQualityWarning {
                row_number,
                kind,
                product: label.clone(),
            })
        };
        if fields.cost_per_case.is_none() {
            warn(WarningKind::MissingCost);
        }
        if fields.pack_size.is_none() {
            warn(WarningKind::MissingPackSize);
        }
        if fields.category.is_empty() {
            warn(WarningKind::MissingCategory);
        }

        if !fields.is_identifiable() {
            parsed.skipped_rows += 1;
            continue;
        }

        let extra_fields = mapping
            .extra_columns
            .iter()
            .filter_map(|&idx| {
                let header = headers.get(idx).filter(|h| !h.is_empty())?;
                let value = cells.get(idx)?.as_text()?;
                Some((header.clone(), value))
            })
            .collect();

        parsed.rows.push(ParsedRow {
            row_number,
            fields,
            extra_fields,
        });
    }
    parsed
}

fn read_fields(cells: &[Cell], mapping: &ColumnMapping) -> ProductFields {
    let cell = |field| mapping.column(field).and_then(|i| cells.get(i));
    let text = |field| cell(field).and_then(Cell::as_text);

    ProductFields {
        item_code: text(CanonicalField::ItemCode),
        producer: text(CanonicalField::Producer).unwrap_or_default(),
        name: text(CanonicalField::ProductName).unwrap_or_default(),
        vintage: text(CanonicalField::Vintage),
        pack_size: cell(CanonicalField::PackSize).and_then(|c| match c {
            Cell::Number(n) if *n >= 1.0 && *n <= f64::from(u32::MAX) => Some(n.trunc() as u32),
            other => other.as_text().as_deref().and_then(parse_pack_size),
        }),
        bottle_size_ml: text(CanonicalField::BottleSize)
            .as_deref()
            .and_then(parse_bottle_size_ml),
        cost_per_case: cell(CanonicalField::Cost).and_then(|c| match c {
            Cell::Number(n) => Some(*n).filter(|v| v.is_finite() && *v > 0.0),
            other => other.as_text().as_deref().and_then(parse_cost),
        }),
        category: text(CanonicalField::Category).unwrap_or_default(),
        origin: Origin {
            country: text(CanonicalField::Country),
            region: text(CanonicalField::Region),
            appellation: text(CanonicalField::Appellation),
        },
        product_link: text(CanonicalField::ProductLink),
    }
}
