//! Cortex API errors
//!
//! Every REST call funnels its status code through [`ApiError::from_status`],
//! so callers only ever see this taxonomy.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the Cortex API on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default, rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub http_status: u16,
    #[serde(default)]
    pub request_id: String,
}

impl ApiErrorBody {
    /// Decode an error body, falling back to the raw text as the message
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: body.trim().to_string(),
            ..Self::default()
        })
    }
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[type: {}] [details: {}] [message: {}] [request id: {}]",
            self.error_type, self.details, self.message, self.request_id
        )
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("unauthorized: {0}")]
    Unauthorized(ApiErrorBody),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {format} response: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    #[error("failed to encode request body: {0}")]
    Encode(String),

    #[error(transparent)]
    Descriptor(#[from] crate::catalog::descriptor::DescriptorError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Translate a non-success status code and its body into an error.
    ///
    /// Returns `None` for 2xx statuses.
    pub fn from_status(status: StatusCode, body: &str) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        match status {
            StatusCode::NOT_FOUND => Some(ApiError::NotFound),
            StatusCode::UNAUTHORIZED => Some(ApiError::Unauthorized(ApiErrorBody::parse(body))),
            _ => {
                let parsed = ApiErrorBody::parse(body);
                let body = serde_json::to_string(&parsed).unwrap_or_else(|_| body.to_string());
                Some(ApiError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}
