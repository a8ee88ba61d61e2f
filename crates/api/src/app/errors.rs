use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use vintrade_core::DomainError;
use vintrade_infra::{ConversionError, ImportError, ServiceError, StoreError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found")),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        other => {
            error!(error = %other, "persistence failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "persistence_error",
                other.to_string(),
            )
        }
    }
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Formula(e) => json_error(StatusCode::BAD_REQUEST, "invalid_formula", e.to_string()),
        ServiceError::Persistence(e) => store_error_to_response(e),
        ServiceError::Poisoned => internal_error(),
    }
}

pub fn import_error_to_response(err: ImportError) -> axum::response::Response {
    match err {
        ImportError::Domain(e) => domain_error_to_response(e),
        e @ (ImportError::Table(_) | ImportError::Unreadable { .. }) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_table", e.to_string())
        }
        ImportError::Conversion(ConversionError::NotConfigured) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "converter_unavailable",
            ConversionError::NotConfigured.to_string(),
        ),
        ImportError::Conversion(e) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "conversion_failed", e.to_string())
        }
        ImportError::Persistence(e) => store_error_to_response(e),
        ImportError::Poisoned => internal_error(),
    }
}

fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "a previous request panicked while holding the write lock",
    )
}

pub fn invalid_id(what: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
