use crate::domain::ports::{JsonFetcher, TokenProvider};
use crate::utils::error::{HydrateError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Header that, when already present, suppresses token injection.
pub const AUTH_TOKEN_HEADER: &str = "auth-token";
/// Header carrying the injected token.
pub const API_KEY_HEADER: &str = "apikey";

const UNKNOWN_ERROR: &str = "Unknown error.";

/// Thin JSON-over-HTTP client. Attaches the auth token from its provider and
/// turns non-success responses into `ApiResponse` errors.
#[derive(Clone)]
pub struct FetchClient {
    client: Client,
    token_provider: Arc<dyn TokenProvider>,
}

impl FetchClient {
    pub fn new(token_provider: impl TokenProvider + 'static) -> Self {
        Self {
            client: Client::new(),
            token_provider: Arc::new(token_provider),
        }
    }

    pub fn with_timeout(
        token_provider: impl TokenProvider + 'static,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token_provider: Arc::new(token_provider),
        })
    }

    /// Adds the `apikey` header unless `auth-token` is already set or the
    /// provider has no non-empty token.
    pub fn apply_auth(&self, mut headers: HeaderMap) -> HeaderMap {
        if headers.contains_key(AUTH_TOKEN_HEADER) {
            return headers;
        }
        let token = self.token_provider.token().unwrap_or_default();
        if token.is_empty() {
            return headers;
        }
        match HeaderValue::from_str(&token) {
            Ok(value) => {
                headers.insert(API_KEY_HEADER, value);
            }
            Err(e) => tracing::warn!("Ignoring auth token that is not a valid header value: {}", e),
        }
        headers
    }

    pub async fn get_json_with_headers(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<Value> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .headers(self.apply_auth(headers))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HydrateError::ApiResponse {
                status: status.as_u16(),
                details: error_details(&body),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl JsonFetcher for FetchClient {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.get_json_with_headers(url, query, HeaderMap::new()).await
    }
}

/// Picks the most specific message out of an error body.
fn error_details(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return UNKNOWN_ERROR.to_string();
    };
    ["error_details", "message", "Error"]
        .iter()
        .find_map(|key| match json.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}
