//! Shared HTTP plumbing for talking to the ProdTrack API.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Base URL plus a pooled `reqwest` client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Error body returned by the API: `{ "error": ..., "message": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

impl ApiEndpoint {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ClientError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.post(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Map a non-success response onto a [`ClientError`].
///
/// `what` names the resource for 404s. 400/422 carry the server's validation
/// message; anything else is treated as the service being unavailable.
pub(crate) async fn error_from_response(resp: Response, what: &str) -> ClientError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) if !body.message.is_empty() => body.message,
        Ok(body) if !body.error.is_empty() => body.error,
        _ => text,
    };

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(what.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
        _ => ClientError::Unavailable(format!("{what} request failed ({status}): {message}")),
    }
}
