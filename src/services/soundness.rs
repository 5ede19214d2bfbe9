use crate::{
    models::{AttestationRequest, AttestationResponse},
    services::random_id256,
};
use chrono::Utc;

pub const ATTESTED: &str = "attested";

/// Simulated Soundness Layer. The referenced blob is never checked.
#[derive(Default)]
pub struct SoundnessSimulator;

impl SoundnessSimulator {
    pub fn new() -> Self {
        Self
    }

    pub fn submit(&self, request: &AttestationRequest) -> AttestationResponse {
        let attestation_id = random_id256();

        tracing::info!(
            blob_id = ?request.blob_id,
            wallet = ?request.wallet_address,
            "Submitted to Soundness Layer: {}",
            attestation_id
        );

        AttestationResponse {
            success: true,
            attestation_id,
            status: ATTESTED.to_string(),
            timestamp: Utc::now(),
        }
    }
}
