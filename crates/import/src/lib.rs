//! Supplier price-list intake: tabular source, column mapping, row parsing.
//!
//! Pure transformations from a raw table to canonical product fields. Pricing,
//! reconciliation and persistence happen downstream.

pub mod mapping;
pub mod rows;
pub mod summary;
pub mod supplier_name;
pub mod table;

pub use mapping::{
    CanonicalField, ColumnMapping, ExtraHeader, MappingProposal, MappingTemplates, map_columns,
};
pub use rows::{DataQualityWarning, ParsedRow, ParsedRows, WarningKind, parse_rows};
pub use summary::ImportSummary;
pub use supplier_name::supplier_from_filename;
pub use table::{Cell, Table, TableError};
