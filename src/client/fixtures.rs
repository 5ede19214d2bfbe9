//! Sample data shown when the facade cannot be reached.

use crate::models::{PaymentRecord, PaymentStatus, Stats};
use chrono::{Duration, Utc};
use serde_json::{Map, Value};

pub fn sample_stats() -> Stats {
    Stats {
        total_payments: 42,
        total_proofs: 38,
        storage_used: 15.7,
        active_escrows: 8,
    }
}

pub fn sample_payments() -> Vec<PaymentRecord> {
    vec![
        sample(
            "1",
            ("0.5", "0x1234...5678"),
            PaymentStatus::Completed,
            Duration::days(1),
            "0xabcd...efgh",
            "Payment for services",
        ),
        sample(
            "2",
            ("1.2", "0x9876...5432"),
            PaymentStatus::Pending,
            Duration::hours(1),
            "0xijkl...mnop",
            "Freelance work payment",
        ),
        sample(
            "3",
            ("0.8", "0x5555...7777"),
            PaymentStatus::Disputed,
            Duration::days(2),
            "0xqrst...uvwx",
            "Product purchase",
        ),
    ]
}

fn sample(
    id: &str,
    (amount, recipient): (&str, &str),
    status: PaymentStatus,
    age: Duration,
    blob_id: &str,
    description: &str,
) -> PaymentRecord {
    let mut extra = Map::new();
    extra.insert("blobId".to_string(), Value::from(blob_id));

    PaymentRecord {
        id: id.to_string(),
        sender: Value::Null,
        recipient: Value::from(recipient),
        amount: Value::from(amount),
        description: Value::from(description),
        status,
        created_at: Utc::now() - age,
        updated_at: None,
        extra,
    }
}
