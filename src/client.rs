//! PagerDuty API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on resource types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::error::{PagerDutyError, Result};

const DEFAULT_API_URL: &str = "https://api.pagerduty.com";
const USER_AGENT: &str = concat!("pdapi/", env!("CARGO_PKG_VERSION"));
const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// Low-level PagerDuty API client.
///
/// Handles authentication and HTTP requests. Resource-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use pdapi::PagerDutyClient;
///
/// # fn example() -> pdapi::Result<()> {
/// // Create from environment variables
/// let client = PagerDutyClient::from_env()?;
///
/// // Or configure manually
/// let client = PagerDutyClient::new("your-api-token", "https://api.pagerduty.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PagerDutyClient {
    http: Client,
    base_url: Arc<Url>,
}

impl std::fmt::Debug for PagerDutyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerDutyClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PagerDutyClient {
    /// Create a client from environment variables.
    ///
    /// Uses `PAGERDUTY_API_TOKEN` for authentication and optionally
    /// `PAGERDUTY_API_URL` for the base URL (defaults to
    /// `https://api.pagerduty.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if `PAGERDUTY_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("PAGERDUTY_API_TOKEN").map_err(|_| {
            PagerDutyError::ConfigMissing(
                "PAGERDUTY_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let base_url =
            env::var("PAGERDUTY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the token contains
    /// characters that cannot be sent in a header.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut auth = HeaderValue::from_str(&format!("Token token={token}")).map_err(|_| {
            PagerDutyError::InvalidArgument("API token contains invalid characters".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V2));
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(PagerDutyError::Http)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL.
    ///
    /// Leading slashes are ignored so that paths stay relative to any
    /// prefix in the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let request = self.http.get(self.url(path)?);
        Self::send(request).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let request = self.http.get(self.url(path)?).query(query);
        Self::send(request).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.http.post(self.url(path)?).json(body);
        Self::send(request).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.http.put(self.url(path)?).json(body);
        Self::send(request).await
    }

    /// Make a DELETE request. The response body is not read.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let request = self.http.delete(self.url(path)?);
        Self::send(request).await
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(PagerDutyError::Http)?;
        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            tracing::warn!(status = %status, ?retry_after, "PagerDuty request rate limited");
            return Err(PagerDutyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::warn!(status = %status, message = %message, "PagerDuty request failed");
        Err(PagerDutyError::Api {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// PagerDuty reports errors as `{"error": {"message": "...", "errors": [...]}}`.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err) = json.get("error") {
                if let Some(msg) = err.get("message").and_then(|m| m.as_str()) {
                    let details: Vec<&str> = err
                        .get("errors")
                        .and_then(|e| e.as_array())
                        .map(|errors| errors.iter().filter_map(|e| e.as_str()).collect())
                        .unwrap_or_default();
                    if details.is_empty() {
                        return msg.to_string();
                    }
                    return format!("{msg}: {}", details.join("; "));
                }
                if let Some(msg) = err.as_str() {
                    return msg.to_string();
                }
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        if body.is_empty() {
            return format!("HTTP {status}");
        }
        body
    }
}
