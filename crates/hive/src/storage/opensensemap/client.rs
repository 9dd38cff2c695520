//! HTTP client for the openSenseMap API.

use std::time::Duration;

use futures_util::future::join_all;

use hive_core::sensebox::{parse_sense_box, SenseBox};

use super::error::{Result, UpstreamError};

/// HTTP client for `GET /boxes/{id}`.
#[derive(Debug, Clone)]
pub struct OpenSenseMapClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenSenseMapClient {
    /// Creates a client whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Request` if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn box_url(&self, id: &str) -> String {
        format!("{}/boxes/{}", self.base_url, id)
    }

    /// Fetches and decodes one sense box.
    pub async fn fetch_sense_box(&self, id: &str) -> Result<SenseBox> {
        let response = self.client.get(self.box_url(id)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                sense_box_id: id.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(parse_sense_box(&body)?)
    }

    /// Fetches one sense box, logging and discarding any failure.
    pub async fn fetch_one(&self, id: &str) -> Option<SenseBox> {
        match self.fetch_sense_box(id).await {
            Ok(sense_box) => Some(sense_box),
            Err(err) => {
                tracing::warn!(
                    sense_box_id = %id,
                    timeout = err.is_timeout(),
                    error = %err,
                    "Failed to fetch sense box"
                );
                None
            }
        }
    }

    /// Fetches several sense boxes concurrently, one slot per id in order.
    pub async fn fetch_many(&self, ids: &[String]) -> Vec<Option<SenseBox>> {
        join_all(ids.iter().map(|id| self.fetch_one(id))).await
    }

    /// Returns true if the upstream answers `GET /boxes/{id}` with a success
    /// status. The body is not read.
    pub async fn probe(&self, id: &str) -> bool {
        match self.client.get(self.box_url(id)).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    sense_box_id = %id,
                    status = response.status().as_u16(),
                    "Sense box probe rejected"
                );
                false
            }
            Err(err) => {
                tracing::warn!(sense_box_id = %id, error = %err, "Sense box probe failed");
                false
            }
        }
    }
}
