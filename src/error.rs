//! Error types for PagerDuty API operations.

use thiserror::Error;

/// Errors that can occur during PagerDuty API operations.
#[derive(Debug, Error)]
pub enum PagerDutyError {
    /// Configuration is missing or incomplete.
    #[error("PagerDuty configuration required: {0}")]
    ConfigMissing(String),

    /// A caller-supplied argument cannot be used to build a request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// API request returned a non-success status.
    #[error("PagerDuty API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not valid JSON for the expected shape.
    #[error("Could not decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response envelope does not carry the expected root field.
    #[error("JSON response does not have {0} field")]
    MissingField(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server kept reporting more pages but paging could not continue,
    /// either because the offset did not advance or the page cap was hit.
    #[error("Pagination stopped at offset {offset} while the server still reported more pages")]
    Pagination { offset: u32 },

    /// A paginated listing was cancelled between pages.
    #[error("Operation cancelled")]
    Cancelled,
}

impl PagerDutyError {
    /// HTTP status code carried by the error, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PagerDutyError::Api { status_code, .. } => *status_code,
            PagerDutyError::RateLimited { .. } => Some(429),
            PagerDutyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for PagerDuty operations.
pub type Result<T> = core::result::Result<T, PagerDutyError>;
