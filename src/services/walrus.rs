use crate::{models::UploadResponse, services::random_id256};
use serde_json::Value;

pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";

/// Simulated Walrus blob store. Nothing is stored: the blob id is random and the
/// caller is expected to account for the reported size.
pub struct WalrusSimulator {
    aggregator_url: String,
}

impl WalrusSimulator {
    pub fn new(aggregator_url: impl Into<String>) -> Self {
        let aggregator_url = aggregator_url.into().trim_end_matches('/').to_string();
        Self { aggregator_url }
    }

    pub fn upload(&self, document: &Value) -> Result<UploadResponse, serde_json::Error> {
        let size = serde_json::to_string(document)?.len();
        let blob_id = random_id256();

        tracing::info!("Uploaded to Walrus: {} ({} bytes)", blob_id, size);

        Ok(UploadResponse {
            success: true,
            url: self.blob_url(&blob_id),
            blob_id,
            size,
        })
    }

    pub fn blob_url(&self, blob_id: &str) -> String {
        format!("{}/v1/{}", self.aggregator_url, blob_id)
    }
}

impl Default for WalrusSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_AGGREGATOR_URL)
    }
}
