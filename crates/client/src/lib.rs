//! `prodtrack-client`
//!
//! **Responsibility:** Client-side access to the ProdTrack inventory API.
//!
//! This crate provides:
//! - A stock query cache with in-flight de-duplication, staleness tracking
//!   and periodic background refresh
//! - Ordering eligibility checks against cached stock
//! - Bulk submission of a cart, with per-line outcomes
//!
//! The API remains the authority on stock; everything cached here is a
//! point-in-time copy.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod stock_query;
pub mod submit;

use std::sync::Arc;

use prodtrack_inventory::{BulkSubmitResult, Cart};

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use gateway::{HttpStockGateway, StockGateway};
pub use http::ApiEndpoint;
pub use stock_query::{CachedStock, StockQueryCache, StockQueryOptions, StockSubscription};
pub use submit::{CartSubmitter, HttpCartSubmitter, submit_cart};

/// HTTP-backed stock cache and submitter sharing one connection pool.
#[derive(Debug, Clone)]
pub struct ProdtrackClient {
    stock: StockQueryCache,
    submitter: HttpCartSubmitter,
}

impl ProdtrackClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = ApiEndpoint::new(config)?;
        tracing::debug!(api_url = endpoint.base_url(), "prodtrack client configured");

        Ok(Self {
            stock: StockQueryCache::new(
                Arc::new(HttpStockGateway::new(endpoint.clone())),
                config.stock.clone(),
            ),
            submitter: HttpCartSubmitter::new(endpoint),
        })
    }

    pub fn stock(&self) -> &StockQueryCache {
        &self.stock
    }

    /// Submit `cart`, keeping failed lines and refreshing touched items.
    pub async fn submit_cart(&self, cart: &mut Cart) -> Result<BulkSubmitResult, ClientError> {
        submit_cart(cart, &self.submitter, Some(&self.stock)).await
    }
}
