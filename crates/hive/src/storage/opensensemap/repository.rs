//! Uncached sense box repository backed by openSenseMap.

use async_trait::async_trait;

use hive_core::sensebox::SenseBox;
use hive_core::storage::Repository;

use super::client::OpenSenseMapClient;

/// Collection name of the configured sense boxes.
pub const COLLECTION: &str = "senseboxes";

/// Live repository over the configured sense box ids.
///
/// Every call goes to the upstream; failures surface as `None`.
#[derive(Debug, Clone)]
pub struct SenseBoxRepository {
    client: OpenSenseMapClient,
    ids: Vec<String>,
}

impl SenseBoxRepository {
    pub fn new(client: OpenSenseMapClient, ids: Vec<String>) -> Self {
        Self { client, ids }
    }

    /// Probes every configured box and logs the outcome per box.
    ///
    /// Returns the number of boxes that answered.
    pub async fn probe_all(&self) -> usize {
        let mut reachable = 0;
        for id in &self.ids {
            if self.client.probe(id).await {
                tracing::info!(sense_box_id = %id, "Sense box reachable");
                reachable += 1;
            } else {
                tracing::warn!(sense_box_id = %id, "Sense box unreachable");
            }
        }
        reachable
    }
}

#[async_trait]
impl Repository<SenseBox> for SenseBoxRepository {
    fn collection(&self) -> &str {
        COLLECTION
    }

    fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    async fn find(&self, id: &str) -> Option<SenseBox> {
        self.client.fetch_one(id).await
    }

    async fn find_all(&self) -> Vec<Option<SenseBox>> {
        self.client.fetch_many(&self.ids).await
    }
}
