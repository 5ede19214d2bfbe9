use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProofPayload;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Running dashboard totals. `storage_used` is in megabytes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_payments: u64,
    pub total_proofs: u64,
    pub storage_used: f64,
    pub active_escrows: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    pub success: bool,
    pub proof_hash: String,
    pub proof: ProofPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub blob_id: String,
    pub size: usize,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRequest {
    #[serde(default)]
    pub blob_id: Option<Value>,
    #[serde(default)]
    pub wallet_address: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    pub success: bool,
    pub attestation_id: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
