use thiserror::Error;

use vintrade_core::DomainError;
use vintrade_import::TableError;
use vintrade_pricing::FormulaError;

use crate::external::ConversionError;
use crate::store::StoreError;

/// Failure of an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unreadable price list: {0}")]
    Table(#[from] TableError),

    #[error("{file}: unreadable price list: {source}")]
    Unreadable {
        file: String,
        #[source]
        source: TableError,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The reconciliation was computed but could not be saved.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("import lock poisoned")]
    Poisoned,
}

/// Failure of a catalog, pricing or ordering operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid formula: {0}")]
    Formula(#[from] FormulaError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("write lock poisoned")]
    Poisoned,
}
