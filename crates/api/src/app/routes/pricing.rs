use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    response::IntoResponse,
};

use vintrade_infra::QuoteRequest;
use vintrade_pricing::{FormulaParams, FormulaProfile};

use super::blocking;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn quote(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::QuoteRequestBody>,
) -> axum::response::Response {
    let request = QuoteRequest {
        cost: body.cost,
        pack_size: body.pack_size,
        bottle_size_ml: body.bottle_size_ml,
        category: body.category,
    };
    match blocking(&services, move |s| s.catalog().quote(&request)).await {
        Ok(Ok(breakdown)) => Json(breakdown).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn get_formulas(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match blocking(&services, move |s| s.catalog().formulas()).await {
        Ok(Ok(set)) => Json(set).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn replace_formulas(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReplaceFormulasRequest>,
) -> axum::response::Response {
    let replaced = blocking(&services, move |s| {
        s.catalog()
            .replace_formulas(body.wine, body.spirits, body.non_alcoholic)
    })
    .await;
    match replaced {
        Ok(Ok(set)) => Json(set).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Path(profile): Path<FormulaProfile>,
    Json(params): Json<FormulaParams>,
) -> axum::response::Response {
    match blocking(&services, move |s| s.catalog().update_profile(profile, params)).await {
        Ok(Ok(set)) => Json(set).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}
