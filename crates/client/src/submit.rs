//! Bulk submission of a cart.

use async_trait::async_trait;

use prodtrack_inventory::{BulkSubmitResult, Cart, CartItem};

use crate::error::ClientError;
use crate::http::{ApiEndpoint, error_from_response};
use crate::stock_query::StockQueryCache;

/// Sends cart lines to the system of record in one batch.
#[async_trait]
pub trait CartSubmitter: Send + Sync {
    async fn submit(&self, items: &[CartItem]) -> Result<BulkSubmitResult, ClientError>;
}

/// [`CartSubmitter`] backed by `POST /api/cart/bulk-submit`.
#[derive(Debug, Clone)]
pub struct HttpCartSubmitter {
    endpoint: ApiEndpoint,
}

impl HttpCartSubmitter {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl CartSubmitter for HttpCartSubmitter {
    async fn submit(&self, items: &[CartItem]) -> Result<BulkSubmitResult, ClientError> {
        let resp = self.endpoint.post("/api/cart/bulk-submit").json(items).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp, "bulk submit").await);
        }

        Ok(resp.json().await?)
    }
}

/// Submit every line in `cart` and drop the lines that were applied.
///
/// Every line is validated first; a cart restored from storage can hold lines
/// that never went through [`Cart::add`], and one invalid line stops the whole
/// submission before anything is sent.
///
/// Failed lines stay in the cart for the user to fix. When `stock` is given,
/// cached readings of the touched items are invalidated so the next lookup is
/// live.
pub async fn submit_cart(
    cart: &mut Cart,
    submitter: &dyn CartSubmitter,
    stock: Option<&StockQueryCache>,
) -> Result<BulkSubmitResult, ClientError> {
    if cart.is_empty() {
        return Err(ClientError::Validation("cart is empty".to_string()));
    }
    for line in cart.items() {
        line.validate()?;
    }

    let lines = cart.len();
    let result = submitter.submit(cart.items()).await?;
    cart.apply_submission(&result);

    if let Some(stock) = stock {
        for submitted in &result.successful_items {
            stock.invalidate(submitted.inventory_item_id).await;
        }
    }

    if result.success {
        tracing::info!(lines, "cart submitted");
    } else {
        tracing::warn!(
            lines,
            failed = result.failed_items.len(),
            message = %result.message,
            "cart submitted with failures"
        );
    }
    Ok(result)
}
