use crate::{
    models::{ProofPayload, ProofRecord, ProofRequest, ProofStatus},
    services::random_hex,
};
use chrono::Utc;
use sha2::{Digest, Sha256};

/// Stands in for zero-knowledge proof generation.
///
/// The "proof" is the SHA-256 of the payload's JSON encoding. A fresh nonce and
/// timestamp go into every payload, so two calls never share an identifier.
pub fn generate(request: ProofRequest) -> Result<ProofRecord, serde_json::Error> {
    let data = ProofPayload {
        sender: request.sender,
        recipient: request.recipient,
        amount: request.amount,
        description: request.description,
        timestamp: Utc::now().timestamp_millis(),
        nonce: random_hex(16),
        blob_id: request.blob_id,
    };

    let id = digest(&data)?;

    Ok(ProofRecord {
        id,
        data,
        status: ProofStatus::Generated,
        created_at: Utc::now(),
    })
}

pub fn digest(payload: &ProofPayload) -> Result<String, serde_json::Error> {
    let encoded = serde_json::to_vec(payload)?;
    Ok(hex::encode(Sha256::digest(&encoded)))
}
