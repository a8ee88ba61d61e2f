//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router(services, config.max_body_bytes))
}

/// Router over already-built services. `max_body_bytes` replaces axum's
/// 2 MB default for extracted bodies.
pub fn router(services: Arc<services::AppServices>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_body_bytes))
                .layer(Extension(services)),
        )
}
