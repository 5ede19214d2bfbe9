use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form payment descriptor accepted by `POST /api/generate-proof`.
///
/// Nothing is validated: fields may be any JSON value or absent, and absent
/// fields are left out of the hashed payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_id: Option<Value>,
}

impl ProofRequest {
    pub fn for_payment(sender: &str, recipient: &str, amount: &str, description: &str) -> Self {
        Self {
            sender: Some(Value::from(sender)),
            recipient: Some(Value::from(recipient)),
            amount: Some(Value::from(amount)),
            description: Some(Value::from(description)),
            blob_id: None,
        }
    }
}

/// The hashed payload. Field order is the serialization order and therefore part of the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_id: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofStatus {
    Generated,
}

impl ProofStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStatus::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    pub id: String,
    pub data: ProofPayload,
    pub status: ProofStatus,
    pub created_at: DateTime<Utc>,
}

impl ProofRecord {
    /// Matches either the digest or the blob reference embedded in the payload.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference
            || matches!(&self.data.blob_id, Some(Value::String(blob)) if blob == reference)
    }
}
