use crate::{
    client::api::FacadeClient,
    error::ClientError,
    models::{AttestationRequest, NewPayment, PaymentRecord, ProofRequest},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Stages of a single payment submission.
///
/// The order is fixed: each step feeds the next, so there is no branching and
/// no parallelism. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    GeneratingProof,
    Uploading,
    Attesting,
    Executing,
    Succeeded,
    Failed,
}

impl PipelineStage {
    /// The stage entered once the current step's call succeeds.
    pub fn advance(self) -> Self {
        match self {
            PipelineStage::Idle => PipelineStage::GeneratingProof,
            PipelineStage::GeneratingProof => PipelineStage::Uploading,
            PipelineStage::Uploading => PipelineStage::Attesting,
            PipelineStage::Attesting => PipelineStage::Executing,
            PipelineStage::Executing => PipelineStage::Succeeded,
            terminal => terminal,
        }
    }

    /// The stage entered when the current step's call fails.
    pub fn fail(self) -> Self {
        if self.is_terminal() {
            self
        } else {
            PipelineStage::Failed
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Succeeded | PipelineStage::Failed)
    }

    /// Percent complete on entering this stage. `Failed` keeps whatever was shown.
    pub fn progress(self) -> Option<u8> {
        match self {
            PipelineStage::Idle | PipelineStage::GeneratingProof => Some(0),
            PipelineStage::Uploading => Some(25),
            PipelineStage::Attesting => Some(50),
            PipelineStage::Executing => Some(75),
            PipelineStage::Succeeded => Some(100),
            PipelineStage::Failed => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PipelineStage::Idle => "",
            PipelineStage::GeneratingProof => "Generating ZK proof...",
            PipelineStage::Uploading => "Uploading to Walrus...",
            PipelineStage::Attesting => "Submitting to Soundness Layer...",
            PipelineStage::Executing => "Executing payment...",
            PipelineStage::Succeeded => "Payment completed successfully!",
            PipelineStage::Failed => "Payment failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::GeneratingProof => "generating-proof",
            PipelineStage::Uploading => "uploading",
            PipelineStage::Attesting => "attesting",
            PipelineStage::Executing => "executing",
            PipelineStage::Succeeded => "succeeded",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub description: String,
    pub use_escrow: bool,
}

/// What gets uploaded to Walrus: the payment terms, not the proof.
#[derive(Debug, Serialize)]
struct PaymentTerms<'a> {
    recipient: &'a str,
    amount: &'a str,
    description: &'a str,
    timestamp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub proof_hash: String,
    pub blob_id: String,
    pub attestation_id: String,
    pub payment: PaymentRecord,
}

#[derive(Error, Debug)]
#[error("{source}")]
pub struct PipelineError {
    /// The stage whose call failed.
    pub stage: PipelineStage,
    #[source]
    pub source: ClientError,
}

/// Drives one payment through proof → upload → attest → execute.
///
/// Identifiers from earlier steps are dropped when a later step fails; nothing
/// is compensated.
pub struct PaymentPipeline {
    api: FacadeClient,
    stage: PipelineStage,
}

impl PaymentPipeline {
    pub fn new(api: FacadeClient) -> Self {
        Self {
            api,
            stage: PipelineStage::Idle,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Runs the four steps in order, reporting every stage change to `observe`.
    pub async fn run<F>(
        &mut self,
        request: &PaymentRequest,
        mut observe: F,
    ) -> Result<PaymentReceipt, PipelineError>
    where
        F: FnMut(PipelineStage),
    {
        self.stage = PipelineStage::Idle;

        self.advance(&mut observe);
        tracing::info!("Generating ZK proof...");
        let proof_request = ProofRequest::for_payment(
            &request.sender,
            &request.recipient,
            &request.amount,
            &request.description,
        );
        let proof = self.api.generate_proof(&proof_request).await;
        let proof = self.settle(proof, &mut observe)?;
        tracing::info!("ZK proof generated: {}", proof.proof_hash);

        let terms = PaymentTerms {
            recipient: &request.recipient,
            amount: &request.amount,
            description: &request.description,
            timestamp: Utc::now().timestamp_millis(),
        };
        let upload = self.api.upload_walrus(&terms).await;
        let blob_id = self.settle(upload, &mut observe)?.blob_id;
        tracing::info!("Uploaded to Walrus: {}", blob_id);

        let attestation_request = AttestationRequest {
            blob_id: Some(Value::from(blob_id.as_str())),
            wallet_address: Some(Value::from(request.sender.as_str())),
        };
        let attestation = self.api.submit_soundness(&attestation_request).await;
        let attestation_id = self.settle(attestation, &mut observe)?.attestation_id;
        tracing::info!("Submitted to Soundness Layer: {}", attestation_id);

        let payment = NewPayment::new(
            &request.sender,
            &request.recipient,
            &request.amount,
            &request.description,
        )
        .with("blobId", blob_id.as_str())
        .with("attestationId", attestation_id.as_str())
        .with("useEscrow", request.use_escrow);
        let executed = self.api.create_payment(&payment).await;
        let payment = self.settle(executed, &mut observe)?;
        tracing::info!("Payment executed: {}", payment.id);

        Ok(PaymentReceipt {
            proof_hash: proof.proof_hash,
            blob_id,
            attestation_id,
            payment,
        })
    }

    fn advance<F: FnMut(PipelineStage)>(&mut self, observe: &mut F) {
        self.stage = self.stage.advance();
        observe(self.stage);
    }

    /// Moves to the next stage on success, to `Failed` otherwise.
    fn settle<T, F: FnMut(PipelineStage)>(
        &mut self,
        result: Result<T, ClientError>,
        observe: &mut F,
    ) -> Result<T, PipelineError> {
        match result {
            Ok(value) => {
                self.advance(observe);
                Ok(value)
            }
            Err(source) => {
                let stage = self.stage;
                tracing::error!("Payment failed while {}: {}", stage, source);
                self.stage = stage.fail();
                observe(self.stage);
                Err(PipelineError { stage, source })
            }
        }
    }
}
