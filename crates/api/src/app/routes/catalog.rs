use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    response::IntoResponse,
};

use vintrade_catalog::ProductPatch;
use vintrade_core::{ProductId, SupplierKey};

use super::blocking;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::CatalogQuery>,
) -> axum::response::Response {
    let supplier = match query.supplier.as_deref().map(SupplierKey::new).transpose() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match blocking(&services, move |s| s.catalog().catalog(supplier.as_ref())).await {
        Ok(Ok(products)) => Json(products).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    match blocking(&services, move |s| s.catalog().product(id)).await {
        Ok(Ok(product)) => Json(product).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

/// Manual edit; the response carries the recomputed prices.
pub async fn edit_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    match blocking(&services, move |s| s.catalog().edit_product(id, patch)).await {
        Ok(Ok(product)) => Json(product).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn withdraw_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(product_id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    match blocking(&services, move |s| s.catalog().withdraw_product(product_id)).await {
        Ok(Ok(outcome)) => Json(dto::WithdrawResponse::new(id, outcome)).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn list_discontinued(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match blocking(&services, move |s| s.catalog().discontinued()).await {
        Ok(Ok(entries)) => Json(entries).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn prune_discontinued(
    Extension(services): Extension<Arc<AppServices>>,
    body: Option<Json<dto::PruneRequest>>,
) -> axum::response::Response {
    let policy = body.and_then(|Json(b)| b.policy);
    match blocking(&services, move |s| s.catalog().prune_discontinued(policy)).await {
        Ok(Ok(pruned)) => Json(serde_json::json!({
            "pruned": pruned.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }))
        .into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn rename_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RenameSupplierRequest>,
) -> axum::response::Response {
    let dto::RenameSupplierRequest { from, to } = body;
    let (old, new) = (from.clone(), to.clone());
    match blocking(&services, move |s| s.catalog().rename_supplier(&old, &new)).await {
        Ok(Ok(outcome)) => Json(dto::RenameResponse::new(from, to, outcome)).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}
