//! HTTP utilities for Cortex REST API calls

use super::error::{ApiError, ApiResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Environment variable that turns on request/response logging
pub const HTTP_DEBUG_ENV: &str = "HTTP_DEBUG";

/// Sanitize a body for logging
/// Truncates long payloads and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// True when `HTTP_DEBUG=1` (or `true`) is set in the environment
pub fn http_debug_enabled() -> bool {
    std::env::var(HTTP_DEBUG_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Encoded request body with its media type
#[derive(Debug, Clone)]
pub struct Body {
    payload: String,
    content_type: &'static str,
}

impl Body {
    pub fn json<B: Serialize + ?Sized>(value: &B) -> ApiResult<Self> {
        let payload = serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            payload,
            content_type: "application/json",
        })
    }

    pub fn yaml(document: String, content_type: &'static str) -> Self {
        Self {
            payload: document,
            content_type,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// HTTP client wrapper for Cortex API calls
#[derive(Clone)]
pub struct CortexHttpClient {
    client: Client,
    token: String,
    debug: bool,
}

impl std::fmt::Debug for CortexHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CortexHttpClient")
            .field("token", &"<redacted>")
            .field("debug", &self.debug)
            .finish()
    }
}

impl CortexHttpClient {
    /// Create a new HTTP client
    pub fn new(token: &str, user_agent: &str, debug: bool) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            token: token.to_string(),
            debug,
        })
    }

    /// GET and decode a JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let request = self.client.get(url).query(query);
        let body = self.send(Method::GET, url, request, None).await?;
        decode_json(&body)
    }

    /// GET and decode a YAML response
    pub async fn get_yaml(&self, url: &str, query: &[(&str, &str)]) -> ApiResult<serde_yaml::Value> {
        let request = self.client.get(url).query(query);
        let body = self.send(Method::GET, url, request, None).await?;
        serde_yaml::from_str(&body).map_err(|e| ApiError::Decode {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// POST a body and decode a JSON response
    pub async fn post<T: DeserializeOwned>(&self, url: &str, body: Body) -> ApiResult<T> {
        self.write(Method::POST, url, &[], body).await
    }

    /// PUT a body and decode a JSON response
    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> ApiResult<T> {
        self.write(Method::PUT, url, query, body).await
    }

    /// DELETE, ignoring any response body
    pub async fn delete(&self, url: &str, query: &[(&str, &str)]) -> ApiResult<()> {
        let request = self.client.delete(url).query(query);
        self.send(Method::DELETE, url, request, None).await?;
        Ok(())
    }

    async fn write<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> ApiResult<T> {
        let request = self
            .client
            .request(method.clone(), url)
            .query(query)
            .header(CONTENT_TYPE, body.content_type)
            .body(body.payload.clone());

        let response_body = self.send(method, url, request, Some(&body.payload)).await?;
        decode_json(&response_body)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
        payload: Option<&str>,
    ) -> ApiResult<String> {
        tracing::debug!("{} {}", method, url);
        if self.debug {
            if let Some(payload) = payload {
                tracing::info!("request body: {}", sanitize_for_log(payload));
            }
        }

        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if self.debug {
            tracing::info!("{} {} -> {} {}", method, url, status, sanitize_for_log(&body));
        }

        if let Some(err) = ApiError::from_status(status, &body) {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            if !err.is_not_found() {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            }
            return Err(err);
        }

        Ok(body)
    }
}

/// Decode a JSON body; an empty body decodes as JSON `null`
fn decode_json<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        format: "JSON",
        message: e.to_string(),
    })
}
