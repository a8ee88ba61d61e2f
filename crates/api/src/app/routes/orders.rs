use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use vintrade_core::{CustomerId, OrderId, ProductId};

use super::blocking;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let customer = match CustomerId::new(body.customer) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let mut items = Vec::with_capacity(body.lines.len());
    for line in body.lines {
        let Ok(product_id) = line.product_id.parse::<ProductId>() else {
            return errors::invalid_id("product");
        };
        items.push((product_id, line.quantity));
    }

    match blocking(&services, move |s| s.catalog().place_order(customer, &items)).await {
        Ok(Ok(order)) => (StatusCode::CREATED, Json(order)).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::OrdersQuery>,
) -> axum::response::Response {
    let customer = match query.customer.map(CustomerId::new).transpose() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match blocking(&services, move |s| s.catalog().orders(customer.as_ref())).await {
        Ok(Ok(orders)) => Json(orders).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn set_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::OrderStatusRequest>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<OrderId>() else {
        return errors::invalid_id("order");
    };
    let moved = blocking(&services, move |s| s.catalog().set_order_status(id, body.status)).await;
    match moved {
        Ok(Ok(order)) => Json(order).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn get_special_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer): Path<String>,
) -> axum::response::Response {
    let customer = match CustomerId::new(customer) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match blocking(&services, move |s| s.catalog().special_orders(&customer)).await {
        Ok(Ok(list)) => Json(list).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn upsert_special_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer, product_id)): Path<(String, String)>,
    Json(body): Json<dto::SpecialOrderItemRequest>,
) -> axum::response::Response {
    let customer = match CustomerId::new(customer) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let Ok(product_id) = product_id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    let upserted = blocking(&services, move |s| {
        s.catalog()
            .upsert_special_item(&customer, product_id, body.quantity, body.status, body.note)
    })
    .await;
    match upserted {
        Ok(Ok(list)) => Json(list).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn set_special_item_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer, product_id)): Path<(String, String)>,
    Json(body): Json<dto::SpecialOrderStatusRequest>,
) -> axum::response::Response {
    let customer = match CustomerId::new(customer) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let Ok(product_id) = product_id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    let moved = blocking(&services, move |s| {
        s.catalog()
            .set_special_item_status(&customer, product_id, body.status)
    })
    .await;
    match moved {
        Ok(Ok(list)) => Json(list).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}

pub async fn remove_special_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let customer = match CustomerId::new(customer) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let Ok(product_id) = product_id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    let removed = blocking(&services, move |s| {
        s.catalog().remove_special_item(&customer, product_id)
    })
    .await;
    match removed {
        Ok(Ok(list)) => Json(list).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(response) => response,
    }
}
