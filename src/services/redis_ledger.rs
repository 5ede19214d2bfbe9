use crate::{
    error::{LedgerError, LedgerResult},
    models::{PaymentRecord, PaymentStatus, ProofRecord, Stats},
    services::ledger::{bytes_to_mb, LedgerStore},
};
use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::collections::HashMap;

pub const DEFAULT_KEY_PREFIX: &str = "soundpay";

struct Keys {
    payments: String,
    payment_order: String,
    proofs: String,
    stats: String,
}

impl Keys {
    fn new(prefix: &str) -> Self {
        Self {
            payments: format!("{}:payments", prefix),
            payment_order: format!("{}:payments:order", prefix),
            proofs: format!("{}:proofs", prefix),
            stats: format!("{}:stats", prefix),
        }
    }
}

/// Ledger kept in Redis so it survives a facade restart.
///
/// Payments live in a hash keyed by id with a list preserving insertion order;
/// proofs in a hash keyed by digest; counters in a single hash.
pub struct RedisLedger {
    conn: ConnectionManager,
    keys: Keys,
}

impl RedisLedger {
    pub async fn connect(redis_url: &str) -> LedgerResult<Self> {
        Self::connect_with_prefix(redis_url, DEFAULT_KEY_PREFIX).await
    }

    /// Keys live under `<prefix>:`, so several ledgers can share one database.
    pub async fn connect_with_prefix(redis_url: &str, prefix: &str) -> LedgerResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self {
            conn,
            keys: Keys::new(prefix),
        })
    }

    async fn all_payments(&self) -> LedgerResult<Vec<PaymentRecord>> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.lrange(&self.keys.payment_order, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(&self.keys.payments)
            .arg(&ids)
            .query_async(&mut conn)
            .await?;

        raw.into_iter()
            .flatten()
            .map(|json| serde_json::from_str::<PaymentRecord>(&json).map_err(LedgerError::from))
            .collect()
    }
}

#[async_trait]
impl LedgerStore for RedisLedger {
    async fn insert_payment(&self, payment: PaymentRecord) -> LedgerResult<PaymentRecord> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(&payment)?;

        redis::pipe()
            .atomic()
            .hset(&self.keys.payments, &payment.id, json)
            .ignore()
            .rpush(&self.keys.payment_order, &payment.id)
            .ignore()
            .hincr(&self.keys.stats, "totalPayments", 1i64)
            .ignore()
            .hincr(&self.keys.stats, "activeEscrows", 1i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(payment)
    }

    async fn payments_for(&self, address: &str) -> LedgerResult<Vec<PaymentRecord>> {
        let payments = self.all_payments().await?;
        Ok(payments.into_iter().filter(|p| p.involves(address)).collect())
    }

    // Read-modify-write without WATCH: two racing updates of the same payment
    // can both observe the old status.
    async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> LedgerResult<Option<PaymentRecord>> {
        let mut conn = self.conn.clone();
        let Some(json) = conn
            .hget::<_, _, Option<String>>(&self.keys.payments, id)
            .await?
        else {
            return Ok(None);
        };

        let mut payment: PaymentRecord = serde_json::from_str(&json)?;
        let previous = payment.status;
        payment.status = status;
        payment.updated_at = Some(Utc::now());

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset(&self.keys.payments, id, serde_json::to_string(&payment)?)
            .ignore();
        if status.releases_escrow(previous) {
            pipe.hincr(&self.keys.stats, "activeEscrows", -1i64).ignore();
        }
        pipe.query_async::<_, ()>(&mut conn).await?;

        Ok(Some(payment))
    }

    async fn insert_proof(&self, proof: ProofRecord) -> LedgerResult<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(&proof)?;

        redis::pipe()
            .atomic()
            .hset(&self.keys.proofs, &proof.id, json)
            .ignore()
            .hincr(&self.keys.stats, "totalProofs", 1i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn find_proof(&self, reference: &str) -> LedgerResult<Option<ProofRecord>> {
        let mut conn = self.conn.clone();

        if let Some(json) = conn
            .hget::<_, _, Option<String>>(&self.keys.proofs, reference)
            .await?
        {
            return Ok(Some(serde_json::from_str(&json)?));
        }

        // Fall back to scanning for an embedded blob reference
        let all: Vec<String> = conn.hvals(&self.keys.proofs).await?;
        for json in all {
            let proof: ProofRecord = serde_json::from_str(&json)?;
            if proof.matches(reference) {
                return Ok(Some(proof));
            }
        }

        tracing::debug!("Proof {} not in Redis ledger", reference);
        Ok(None)
    }

    async fn record_storage(&self, bytes: usize) -> LedgerResult<()> {
        let mut conn = self.conn.clone();
        conn.hincr::<_, _, _, f64>(&self.keys.stats, "storageUsed", bytes_to_mb(bytes))
            .await?;
        Ok(())
    }

    async fn stats(&self) -> LedgerResult<Stats> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(&self.keys.stats).await?;
        Ok(stats_from_fields(&fields))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// Missing or unparsable counters read as zero.
fn stats_from_fields(fields: &HashMap<String, String>) -> Stats {
    let count = |name: &str| {
        fields
            .get(name)
            .and_then(|v| v.parse::<i64>().ok())
            .map(|v| v.max(0) as u64)
            .unwrap_or(0)
    };

    Stats {
        total_payments: count("totalPayments"),
        total_proofs: count("totalProofs"),
        storage_used: fields
            .get("storageUsed")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0),
        active_escrows: count("activeEscrows"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_fields() {
        let fields = HashMap::from([
            ("totalPayments".to_string(), "4".to_string()),
            ("totalProofs".to_string(), "3".to_string()),
            ("storageUsed".to_string(), "0.25".to_string()),
            ("activeEscrows".to_string(), "-1".to_string()),
        ]);

        let stats = stats_from_fields(&fields);
        assert_eq!(stats.total_payments, 4);
        assert_eq!(stats.total_proofs, 3);
        assert_eq!(stats.storage_used, 0.25);
        assert_eq!(stats.active_escrows, 0);
    }

    #[test]
    fn test_stats_from_empty_hash() {
        assert_eq!(stats_from_fields(&HashMap::new()), Stats::default());
    }
}
