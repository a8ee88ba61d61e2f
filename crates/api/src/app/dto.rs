use serde::{Deserialize, Serialize};

use vintrade_catalog::{RenameOutcome, RetentionPolicy, Withdrawal};
use vintrade_import::{ColumnMapping, ExtraHeader, ImportSummary, MappingProposal, Table};
use vintrade_pricing::FormulaParams;
use vintrade_sales::{OrderStatus, SpecialOrderStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ProposeMappingRequest {
    /// Operator-confirmed supplier name; suggested from `source_name` if absent.
    pub supplier: Option<String>,
    pub source_name: Option<String>,
    pub headers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequestBody {
    pub supplier: String,
    pub source_name: String,
    pub mapping: ColumnMapping,
    /// Pre-parsed rows (row 0 = headers).
    pub table: Option<Table>,
    /// Raw CSV text, used when `table` is absent.
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Query half of a raw-body upload (`/imports/pdf`, `/imports/xlsx`).
pub struct UploadQuery {
    pub file_name: String,
    pub supplier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequestBody {
    pub cost: f64,
    pub pack_size: Option<u32>,
    pub bottle_size_ml: Option<f64>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceFormulasRequest {
    pub wine: FormulaParams,
    pub spirits: FormulaParams,
    pub non_alcoholic: FormulaParams,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub supplier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PruneRequest {
    pub policy: Option<RetentionPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSupplierRequest {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: String,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub customer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct SpecialOrderStatusRequest {
    pub status: SpecialOrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct SpecialOrderItemRequest {
    pub quantity: u32,
    #[serde(default)]
    pub status: SpecialOrderStatus,
    pub note: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MappingProposalResponse {
    pub supplier_name: String,
    pub supplier_key: String,
    pub mapping: ColumnMapping,
    pub extra_headers: Vec<ExtraHeader>,
    pub from_template: bool,
}

impl MappingProposalResponse {
    pub fn new(supplier_name: String, proposal: MappingProposal) -> Self {
        Self {
            supplier_name,
            supplier_key: proposal.supplier.to_string(),
            mapping: proposal.mapping,
            extra_headers: proposal.extra_headers,
            from_template: proposal.from_template,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadedTableResponse {
    pub table: Table,
    pub proposal: MappingProposalResponse,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    #[serde(flatten)]
    pub summary: ImportSummary,
    pub message: String,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        let message = summary.message();
        Self { summary, message }
    }
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub id: String,
    pub outcome: &'static str,
}

impl WithdrawResponse {
    pub fn new(id: String, outcome: Withdrawal) -> Self {
        let outcome = match outcome {
            Withdrawal::Deleted => "deleted",
            Withdrawal::Archived => "archived",
        };
        Self { id, outcome }
    }
}

#[derive(Debug, Serialize)]
pub struct RenameResponse {
    pub from: String,
    pub to: String,
    pub active_moved: usize,
    pub archive_retagged: usize,
    pub merged: bool,
}

impl RenameResponse {
    pub fn new(from: String, to: String, outcome: RenameOutcome) -> Self {
        Self {
            from,
            to,
            active_moved: outcome.active_moved,
            archive_retagged: outcome.archive_retagged,
            merged: outcome.merged,
        }
    }
}
