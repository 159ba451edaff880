//! Internal error types for catalog requests.
//!
//! These errors are internal to `nxshelf-catalog` and are mapped to
//! `CatalogError` at the port boundary.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Catalog request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    /// The payload decoded but has the wrong shape.
    #[error("Invalid catalog response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let error = ClientError::Status {
            status: 503,
            url: "https://api.nlib.cc/nx/0100".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("api.nlib.cc"));
    }
}
