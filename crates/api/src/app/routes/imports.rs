use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use vintrade_import::Table;
use vintrade_infra::{ImportError, ImportRequest};

use super::blocking;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Suggest a supplier name and column mapping for an uploaded header row.
pub async fn propose_mapping(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProposeMappingRequest>,
) -> axum::response::Response {
    let supplier = match (body.supplier, body.source_name) {
        (Some(s), _) if !s.trim().is_empty() => s,
        (_, Some(source)) => services.imports().suggest_supplier(&source),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "either supplier or source_name is required",
            );
        }
    };

    match services.imports().propose_mapping(&supplier, &body.headers) {
        Ok(proposal) => Json(dto::MappingProposalResponse::new(supplier, proposal)).into_response(),
        Err(e) => errors::import_error_to_response(e),
    }
}

/// Run a confirmed import.
pub async fn run_import(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ImportRequestBody>,
) -> axum::response::Response {
    let table = match (body.table, body.csv) {
        (Some(table), _) => table,
        (None, Some(csv)) => match Table::from_csv_reader(csv.as_bytes()) {
            Ok(t) => t,
            Err(e) => return errors::import_error_to_response(ImportError::Table(e)),
        },
        (None, None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "either table or csv is required",
            );
        }
    };

    let request = ImportRequest {
        supplier: body.supplier,
        table,
        mapping: body.mapping,
        source_name: body.source_name,
    };
    match blocking(&services, move |s| s.imports().run_import(request)).await {
        Ok(Ok(summary)) => (StatusCode::CREATED, Json(dto::ImportResponse::from(summary))).into_response(),
        Ok(Err(e)) => errors::import_error_to_response(e),
        Err(response) => response,
    }
}

/// Convert an uploaded PDF (raw request body) to a table and propose a mapping.
pub async fn convert_pdf(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UploadQuery>,
    body: Bytes,
) -> axum::response::Response {
    let file_name = query.file_name.clone();
    let converted = blocking(&services, move |s| s.imports().convert_pdf(&file_name, &body)).await;
    uploaded_table(&services, query, converted)
}

/// Read the first sheet of an uploaded workbook (raw request body) and
/// propose a mapping.
pub async fn read_workbook(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UploadQuery>,
    body: Bytes,
) -> axum::response::Response {
    let file_name = query.file_name.clone();
    let read = blocking(&services, move |s| s.imports().read_workbook(&file_name, &body)).await;
    uploaded_table(&services, query, read)
}

fn uploaded_table(
    services: &AppServices,
    query: dto::UploadQuery,
    table: Result<Result<Table, ImportError>, axum::response::Response>,
) -> axum::response::Response {
    let table = match table {
        Ok(Ok(table)) => table,
        Ok(Err(e)) => return errors::import_error_to_response(e),
        Err(response) => return response,
    };

    let supplier = query
        .supplier
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| services.imports().suggest_supplier(&query.file_name));
    match services.imports().propose_mapping(&supplier, &table.headers()) {
        Ok(proposal) => Json(dto::UploadedTableResponse {
            table,
            proposal: dto::MappingProposalResponse::new(supplier, proposal),
        })
        .into_response(),
        Err(e) => errors::import_error_to_response(e),
    }
}
