use crate::{
    error::SoundPayError,
    handlers::AppState,
    models::{NewPayment, PaymentRecord, StatusUpdate},
    services::random_hex,
};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_payments(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Vec<PaymentRecord>>, SoundPayError> {
    let payments = state
        .ledger
        .payments_for(&address)
        .await
        .map_err(SoundPayError::internal("Failed to fetch payments"))?;

    tracing::debug!("{} payments for {}", payments.len(), address);

    Ok(Json(payments))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<NewPayment>,
) -> Result<Json<PaymentRecord>, SoundPayError> {
    let payment = PaymentRecord::open(random_hex(16), request);

    let payment = state
        .ledger
        .insert_payment(payment)
        .await
        .map_err(SoundPayError::internal("Failed to create payment"))?;

    tracing::info!(
        "Payment recorded: {} {} -> {}",
        payment.amount,
        payment.sender,
        payment.recipient
    );

    Ok(Json(payment))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<PaymentRecord>, SoundPayError> {
    let payment = state
        .ledger
        .update_payment_status(&id, update.status)
        .await
        .map_err(SoundPayError::internal("Failed to update payment"))?
        .ok_or(SoundPayError::PaymentNotFound)?;

    tracing::info!("Payment {} is now {}", payment.id, payment.status);

    Ok(Json(payment))
}
