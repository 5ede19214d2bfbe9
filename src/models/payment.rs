use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Disputed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Disputed => "disputed",
        }
    }

    /// True when moving from `previous` to `self` closes an active escrow.
    ///
    /// Only the first move into `completed` counts; repeating the update is a no-op
    /// for the escrow counter. A counter that decremented on every `completed`
    /// update would count a repeated completion twice.
    pub fn releases_escrow(&self, previous: PaymentStatus) -> bool {
        *self == PaymentStatus::Completed && previous != PaymentStatus::Completed
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "disputed" => Ok(PaymentStatus::Disputed),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// Keys the ledger assigns itself; a request body cannot set them.
const ASSIGNED_FIELDS: &[&str] = &["id", "status", "createdAt", "updatedAt"];

/// A ledger entry. Created as `pending`, only ever mutated through a status update.
///
/// Request fields are kept as sent: any JSON value is accepted for the named
/// ones, and everything else rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub sender: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub recipient: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub description: Value,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentRecord {
    pub fn open(id: String, request: NewPayment) -> Self {
        let mut extra = request.extra;
        for key in ASSIGNED_FIELDS {
            extra.remove(*key);
        }

        Self {
            id,
            sender: request.sender,
            recipient: request.recipient,
            amount: request.amount,
            description: request.description,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
            extra,
        }
    }

    /// Exact match on either side; non-string parties never match.
    pub fn involves(&self, address: &str) -> bool {
        self.sender.as_str() == Some(address) || self.recipient.as_str() == Some(address)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub fn blob_id(&self) -> Option<&str> {
        self.field("blobId").and_then(Value::as_str)
    }
}

/// Body of `POST /api/payments`. Identifier, status and timestamps are assigned by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub sender: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub recipient: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub description: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewPayment {
    pub fn new(sender: &str, recipient: &str, amount: &str, description: &str) -> Self {
        Self {
            sender: Value::from(sender),
            recipient: Value::from(recipient),
            amount: Value::from(amount),
            description: Value::from(description),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_released_only_on_first_completion() {
        assert!(PaymentStatus::Completed.releases_escrow(PaymentStatus::Pending));
        assert!(PaymentStatus::Completed.releases_escrow(PaymentStatus::Disputed));
        assert!(!PaymentStatus::Completed.releases_escrow(PaymentStatus::Completed));
        assert!(!PaymentStatus::Disputed.releases_escrow(PaymentStatus::Pending));
        assert!(!PaymentStatus::Pending.releases_escrow(PaymentStatus::Completed));
    }

    #[test]
    fn test_open_payment_is_pending() {
        let request = NewPayment::new("0xA", "0xB", "1.5", "");
        let payment = PaymentRecord::open("abc".to_string(), request);

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.updated_at.is_none());
        assert!(payment.involves("0xA"));
        assert!(payment.involves("0xB"));
        assert!(!payment.involves("0xC"));
    }

    #[test]
    fn test_request_fields_pass_through() {
        let request: NewPayment = serde_json::from_value(serde_json::json!({
            "sender": 7,
            "recipient": "0xB",
            "amount": 1,
            "txDigest": "0xdead",
            "id": "chosen-by-client",
            "status": "completed"
        }))
        .unwrap();

        let payment = PaymentRecord::open("abc".to_string(), request);
        let json = serde_json::to_value(&payment).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amount"], 1);
        assert_eq!(json["txDigest"], "0xdead");
        assert!(json.get("description").is_none());
        assert!(payment.involves("0xB"));
        assert!(!payment.involves("7"));

        let back: PaymentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, payment);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PaymentStatus::Disputed).unwrap();
        assert_eq!(json, "\"disputed\"");
        assert_eq!("Completed".parse::<PaymentStatus>(), Ok(PaymentStatus::Completed));
        assert!("settled".parse::<PaymentStatus>().is_err());
    }
}
