//! Import orchestration: mapping, parsing, pricing, reconciliation, persistence.
//!
//! ```text
//! table + mapping
//!   ↓ parse rows (warn on every non-blank row, then skip unidentifiable)
//!   ↓ price every row under the current formula set
//!   ↓ live ids from orders + special-order lists
//!   ↓ reconcile against active catalog + archive
//!   ↓ commit active, archive, templates (one versioned batch)
//! ImportSummary
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{error, info, instrument};

use vintrade_catalog::{Product, reconcile};
use vintrade_core::{DomainError, ProductId, SupplierKey};
use vintrade_import::{
    ColumnMapping, ImportSummary, MappingProposal, Table, map_columns, parse_rows,
    supplier_from_filename,
};
use vintrade_sales::live_referenced_ids;

use crate::error::ImportError;
use crate::external::{ConversionError, PdfTableConverter, UploadGuard};
use crate::repository::Repository;

/// An operator-confirmed import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Supplier name as confirmed by the operator; slugged into the key.
    pub supplier: String,
    pub table: Table,
    pub mapping: ColumnMapping,
    /// Uploaded file name, for the summary.
    pub source_name: String,
}

#[derive(Debug, Clone)]
pub struct ImportService {
    repo: Repository,
    write_lock: Arc<Mutex<()>>,
    converter: Option<PdfTableConverter>,
    upload_dir: PathBuf,
}

impl ImportService {
    pub fn new(
        repo: Repository,
        write_lock: Arc<Mutex<()>>,
        converter: Option<PdfTableConverter>,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            repo,
            write_lock,
            converter,
            upload_dir,
        }
    }

    /// Supplier name suggested for an uploaded file.
    pub fn suggest_supplier(&self, source_name: &str) -> String {
        supplier_from_filename(source_name)
    }

    /// Replay the supplier's saved mapping, or detect one from `headers`.
    pub fn propose_mapping(
        &self,
        supplier: &str,
        headers: &[String],
    ) -> Result<MappingProposal, ImportError> {
        let key = SupplierKey::new(supplier)?;
        let templates = self.repo.templates()?;
        Ok(map_columns(headers, &key, templates.value.get(&key)))
    }

    /// Stage the uploaded PDF, run the converter, and always remove the file.
    pub fn convert_pdf(&self, file_name: &str, bytes: &[u8]) -> Result<Table, ImportError> {
        let converter = self
            .converter
            .as_ref()
            .ok_or(ConversionError::NotConfigured)?;
        let upload = UploadGuard::write(&self.upload_dir, file_name, bytes).map_err(|e| {
            ConversionError::Upload {
                file: file_name.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(converter.convert(upload.path(), file_name)?)
    }

    /// Read the first sheet of an uploaded `.xlsx`/`.xls` workbook.
    pub fn read_workbook(&self, file_name: &str, bytes: &[u8]) -> Result<Table, ImportError> {
        Table::from_workbook(bytes).map_err(|source| {
            error!(file = file_name, error = %source, "unreadable workbook");
            ImportError::Unreadable {
                file: file_name.to_string(),
                source,
            }
        })
    }

    #[instrument(skip_all, fields(supplier = %request.supplier, source = %request.source_name))]
    pub fn run_import(&self, request: ImportRequest) -> Result<ImportSummary, ImportError> {
        let ImportRequest {
            supplier,
            table,
            mapping,
            source_name,
        } = request;

        let supplier = SupplierKey::new(&supplier)?;
        if table.rows.is_empty() {
            return Err(DomainError::validation("price list has no header row").into());
        }
        mapping.validate(table.headers().len())?;

        let _guard = self.write_lock.lock().map_err(|_| ImportError::Poisoned)?;
        let now = Utc::now();

        let formulas = self.repo.formulas()?.value;
        let mut active = self.repo.active()?;
        let mut discontinued = self.repo.discontinued()?;
        let mut templates = self.repo.templates()?;
        let orders = self.repo.orders()?.value;
        let special_orders = self.repo.special_orders()?.value;

        let parsed = parse_rows(&table, &mapping);
        let batch: Vec<Product> = parsed
            .rows
            .into_iter()
            .map(|row| {
                Product::priced(
                    ProductId::new(),
                    supplier.clone(),
                    row.fields,
                    row.extra_fields,
                    now,
                    &formulas,
                )
            })
            .collect();

        let live = live_referenced_ids(&orders, &special_orders);
        let reconciled = reconcile(
            std::mem::take(&mut active.value),
            std::mem::take(&mut discontinued.value),
            batch,
            &supplier,
            &live,
            now,
        );
        active.value = reconciled.active;
        discontinued.value = reconciled.discontinued;
        let mapping_saved = templates.value.save(supplier.clone(), mapping);

        let writes = vec![
            active.to_write()?,
            discontinued.to_write()?,
            templates.to_write()?,
        ];
        if let Err(e) = self.repo.commit(writes) {
            error!(error = %e, "import computed but not persisted");
            return Err(e.into());
        }

        let summary = ImportSummary::new(
            supplier,
            source_name,
            &reconciled.outcome,
            parsed.skipped_rows,
            &parsed.warnings,
            mapping_saved,
        );
        info!(
            imported = summary.imported,
            replaced = summary.replaced,
            archived = summary.archived,
            dropped = summary.dropped,
            skipped_rows = summary.skipped_rows,
            warnings = summary.warning_count,
            "price list imported"
        );
        Ok(summary)
    }
}
