use crate::{
    handlers::AppState,
    models::{AttestationRequest, AttestationResponse},
};
use axum::{extract::State, Json};

pub async fn submit_soundness(
    State(state): State<AppState>,
    Json(request): Json<AttestationRequest>,
) -> Json<AttestationResponse> {
    Json(state.soundness.submit(&request))
}
