//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the in-memory inventory store
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with_store(config, Arc::new(services::InventoryStore::new()))
}

/// Same as [`build_app`] but serving from a caller-provided store.
pub fn build_app_with_store(config: &ApiConfig, store: Arc<services::InventoryStore>) -> Router {
    let auth_state = middleware::AuthState {
        token: config.api_token.as_deref().map(Arc::from),
    };

    let api = routes::router()
        .layer(Extension(store))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", api)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}
