use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::app::errors;
use crate::app::services::AppServices;

pub mod catalog;
pub mod imports;
pub mod orders;
pub mod pricing;
pub mod system;

/// Router for all API endpoints except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/imports", post(imports::run_import))
        .route("/imports/columns", post(imports::propose_mapping))
        .route("/imports/pdf", post(imports::convert_pdf))
        .route("/imports/xlsx", post(imports::read_workbook))
        .route("/pricing/quote", post(pricing::quote))
        .route("/formulas", get(pricing::get_formulas).put(pricing::replace_formulas))
        .route("/formulas/:profile", put(pricing::update_profile))
        .route("/catalog", get(catalog::list_catalog))
        .route(
            "/catalog/:id",
            get(catalog::get_product)
                .patch(catalog::edit_product)
                .delete(catalog::withdraw_product),
        )
        .route("/discontinued", get(catalog::list_discontinued))
        .route("/discontinued/prune", post(catalog::prune_discontinued))
        .route("/suppliers/rename", post(catalog::rename_supplier))
        .route("/orders", post(orders::place_order).get(orders::list_orders))
        .route("/orders/:id/status", post(orders::set_order_status))
        .route("/special-orders/:customer", get(orders::get_special_orders))
        .route(
            "/special-orders/:customer/items/:product_id",
            put(orders::upsert_special_item).delete(orders::remove_special_item),
        )
        .route(
            "/special-orders/:customer/items/:product_id/status",
            post(orders::set_special_item_status),
        )
}

/// Run store or converter work on the blocking pool.
///
/// The services hold a `std::sync::Mutex` across file I/O and subprocess
/// calls, so none of it may run on an async worker.
pub(crate) async fn blocking<T, F>(
    services: &Arc<AppServices>,
    work: F,
) -> Result<T, axum::response::Response>
where
    F: FnOnce(&AppServices) -> T + Send + 'static,
    T: Send + 'static,
{
    let worker = services.clone();
    tokio::task::spawn_blocking(move || work(&worker))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "blocking task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "request task failed",
            )
        })
}
