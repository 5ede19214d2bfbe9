use crate::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Routes under `/api`, open CORS, request tracing.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/generate-proof", post(generate_proof))
        .route("/upload-walrus", post(upload_walrus))
        .route("/submit-soundness", post(submit_soundness))
        .route("/proof/:id", get(get_proof))
        .route("/payments", post(create_payment))
        // GET takes a wallet address, PUT a payment id
        .route("/payments/:key", get(list_payments).put(update_payment))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
}
