use crate::{
    error::SoundPayError,
    handlers::AppState,
    models::{ProofRecord, ProofRequest, ProofResponse},
    services::prover,
};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn generate_proof(
    State(state): State<AppState>,
    Json(request): Json<ProofRequest>,
) -> Result<Json<ProofResponse>, SoundPayError> {
    const FAILED: &str = "Failed to generate proof";

    tracing::info!("Generating ZK proof for payment...");

    let proof = prover::generate(request).map_err(SoundPayError::internal(FAILED))?;
    let response = ProofResponse {
        success: true,
        proof_hash: proof.id.clone(),
        proof: proof.data.clone(),
    };

    state
        .ledger
        .insert_proof(proof)
        .await
        .map_err(SoundPayError::internal(FAILED))?;

    tracing::info!("ZK proof generated: {}", response.proof_hash);

    Ok(Json(response))
}

pub async fn get_proof(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ProofRecord>, SoundPayError> {
    let proof = state
        .ledger
        .find_proof(&reference)
        .await
        .map_err(SoundPayError::internal("Failed to fetch proof"))?
        .ok_or(SoundPayError::ProofNotFound)?;

    Ok(Json(proof))
}
