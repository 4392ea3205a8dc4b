use axum::Router;

pub mod cart;
pub mod inventory;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/cart", cart::router())
}
