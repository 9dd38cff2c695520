//! Upstream error types.

use hive_core::sensebox::DecodeError;
use thiserror::Error;

/// Result type alias for upstream calls.
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors that can occur while fetching from openSenseMap.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned {status} for sense box {sense_box_id}")]
    Status { status: u16, sense_box_id: String },

    #[error("Invalid sense box payload: {0}")]
    Decode(#[from] DecodeError),
}

impl UpstreamError {
    /// Returns true if the request did not complete within the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_timeout())
    }
}
