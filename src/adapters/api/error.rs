use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message { message: String },
    Text(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl ApiError {
    /// Build a status error from a non-2xx response body.
    ///
    /// The service answers `{"error": {"message": ...}}` or `{"error": "..."}`;
    /// anything else is reported verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: ErrorDetail::Message { message },
            }) => message,
            Ok(ErrorBody {
                error: ErrorDetail::Text(text),
            }) => text,
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().to_string(),
        };
        Self::Status { status, message }
    }
}
