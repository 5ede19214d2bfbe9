use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SoundPayError {
    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Proof not found")]
    ProofNotFound,

    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl SoundPayError {
    /// Wraps any fault into a 500 carrying a fixed, user-facing message.
    pub fn internal<E>(message: &'static str) -> impl FnOnce(E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        move |source| SoundPayError::Internal {
            message,
            source: source.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures seen by the facade client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Rejected { message: &'static str, status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No wallet provider detected")]
    NoProvider,

    #[error("Wallet {0} refused the connection")]
    PermissionDenied(String),
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl IntoResponse for SoundPayError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();

        let (status, error_code) = match &self {
            SoundPayError::PaymentNotFound => (StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND"),
            SoundPayError::ProofNotFound => (StatusCode::NOT_FOUND, "PROOF_NOT_FOUND"),
            SoundPayError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        match &self {
            SoundPayError::Internal { source, .. } => tracing::error!(
                error = ?source,
                error_code = error_code,
                request_id = %request_id,
                "{}",
                self
            ),
            _ => tracing::debug!(error_code = error_code, "{}", self),
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_hides_cause() {
        let err = SoundPayError::internal("Failed to create payment")(anyhow::anyhow!(
            "lock poisoned at ledger.rs"
        ));

        assert_eq!(err.to_string(), "Failed to create payment");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            SoundPayError::ProofNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SoundPayError::PaymentNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_error_body_carries_request_id() {
        let response = SoundPayError::PaymentNotFound.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert!(!body.success);
        assert_eq!(body.error, "Payment not found");
        assert_eq!(body.error_code, "PAYMENT_NOT_FOUND");
        assert!(Uuid::parse_str(&body.request_id).is_ok());
    }
}
