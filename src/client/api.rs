use crate::{
    error::ClientError,
    models::{
        AttestationRequest, AttestationResponse, HealthStatus, NewPayment, PaymentRecord,
        PaymentStatus, ProofRecord, ProofRequest, ProofResponse, Stats, StatusUpdate,
        UploadResponse,
    },
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// HTTP client for the SoundPay facade. `base_url` includes the `/api` prefix.
#[derive(Clone, Debug)]
pub struct FacadeClient {
    http: Client,
    base_url: String,
}

impl FacadeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response, "Health check failed").await
    }

    pub async fn stats(&self) -> Result<Stats, ClientError> {
        let response = self.http.get(self.url("/stats")).send().await?;
        decode(response, "Failed to fetch stats").await
    }

    pub async fn generate_proof(&self, request: &ProofRequest) -> Result<ProofResponse, ClientError> {
        self.post("/generate-proof", request, "Failed to generate proof")
            .await
    }

    pub async fn upload_walrus<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<UploadResponse, ClientError> {
        self.post("/upload-walrus", document, "Failed to upload to Walrus")
            .await
    }

    pub async fn submit_soundness(
        &self,
        request: &AttestationRequest,
    ) -> Result<AttestationResponse, ClientError> {
        self.post(
            "/submit-soundness",
            request,
            "Failed to submit to Soundness Layer",
        )
        .await
    }

    pub async fn payments_for(&self, address: &str) -> Result<Vec<PaymentRecord>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/payments/{}", address)))
            .send()
            .await?;
        decode(response, "Failed to fetch payments").await
    }

    /// `Ok(None)` when the facade answers 404.
    pub async fn proof(&self, reference: &str) -> Result<Option<ProofRecord>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/proof/{}", reference)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response, "Failed to fetch proof").await.map(Some)
    }

    pub async fn create_payment(&self, payment: &NewPayment) -> Result<PaymentRecord, ClientError> {
        self.post("/payments", payment, "Failed to execute payment")
            .await
    }

    pub async fn update_payment(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<PaymentRecord, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/payments/{}", id)))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        decode(response, "Failed to update payment").await
    }

    async fn post<B, T>(&self, path: &str, body: &B, message: &'static str) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response, message).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    message: &'static str,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} (HTTP {})", message, status);
        return Err(ClientError::Rejected {
            message,
            status: status.as_u16(),
        });
    }

    Ok(response.json().await?)
}
