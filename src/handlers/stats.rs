use crate::{error::SoundPayError, handlers::AppState, models::Stats};
use axum::{extract::State, Json};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, SoundPayError> {
    let stats = state
        .ledger
        .stats()
        .await
        .map_err(SoundPayError::internal("Failed to fetch stats"))?;
    Ok(Json(stats))
}
