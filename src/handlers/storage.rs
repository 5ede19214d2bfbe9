use crate::{error::SoundPayError, handlers::AppState, models::UploadResponse};
use axum::{extract::State, Json};
use serde_json::Value;

pub async fn upload_walrus(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<UploadResponse>, SoundPayError> {
    const FAILED: &str = "Failed to upload to Walrus";

    let receipt = state
        .walrus
        .upload(&document)
        .map_err(SoundPayError::internal(FAILED))?;

    state
        .ledger
        .record_storage(receipt.size)
        .await
        .map_err(SoundPayError::internal(FAILED))?;

    Ok(Json(receipt))
}
