use crate::{
    error::LedgerResult,
    models::{PaymentRecord, PaymentStatus, ProofRecord, Stats},
    services::RedisLedger,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage for payments, proofs and the dashboard counters.
///
/// Counters are updated by the same call that mutates a collection, so an
/// implementation decides how atomic that pairing is.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_payment(&self, payment: PaymentRecord) -> LedgerResult<PaymentRecord>;
    async fn payments_for(&self, address: &str) -> LedgerResult<Vec<PaymentRecord>>;
    async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> LedgerResult<Option<PaymentRecord>>;
    async fn insert_proof(&self, proof: ProofRecord) -> LedgerResult<()>;
    async fn find_proof(&self, reference: &str) -> LedgerResult<Option<ProofRecord>>;
    async fn record_storage(&self, bytes: usize) -> LedgerResult<()>;
    async fn stats(&self) -> LedgerResult<Stats>;
    fn backend(&self) -> &'static str;
}

/// Converts a byte count to the megabyte figure shown on the dashboard.
pub fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

#[derive(Default)]
struct Ledger {
    payments: Vec<PaymentRecord>,
    proofs: Vec<ProofRecord>,
    stats: Stats,
}

/// Process-local ledger. Every mutation takes the single write lock, so
/// collections and counters never drift apart.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn insert_payment(&self, payment: PaymentRecord) -> LedgerResult<PaymentRecord> {
        let mut ledger = self.inner.write().await;
        ledger.payments.push(payment.clone());
        ledger.stats.total_payments += 1;
        ledger.stats.active_escrows += 1;
        Ok(payment)
    }

    async fn payments_for(&self, address: &str) -> LedgerResult<Vec<PaymentRecord>> {
        let ledger = self.inner.read().await;
        Ok(ledger
            .payments
            .iter()
            .filter(|p| p.involves(address))
            .cloned()
            .collect())
    }

    async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> LedgerResult<Option<PaymentRecord>> {
        let mut ledger = self.inner.write().await;

        let Some(payment) = ledger.payments.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        let previous = payment.status;
        payment.status = status;
        payment.updated_at = Some(Utc::now());
        let updated = payment.clone();

        if status.releases_escrow(previous) {
            ledger.stats.active_escrows = ledger.stats.active_escrows.saturating_sub(1);
        }

        Ok(Some(updated))
    }

    async fn insert_proof(&self, proof: ProofRecord) -> LedgerResult<()> {
        let mut ledger = self.inner.write().await;
        ledger.proofs.push(proof);
        ledger.stats.total_proofs += 1;
        Ok(())
    }

    async fn find_proof(&self, reference: &str) -> LedgerResult<Option<ProofRecord>> {
        let ledger = self.inner.read().await;
        Ok(ledger.proofs.iter().find(|p| p.matches(reference)).cloned())
    }

    async fn record_storage(&self, bytes: usize) -> LedgerResult<()> {
        let mut ledger = self.inner.write().await;
        ledger.stats.storage_used += bytes_to_mb(bytes);
        Ok(())
    }

    async fn stats(&self) -> LedgerResult<Stats> {
        Ok(self.inner.read().await.stats.clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Picks the Redis ledger when configured and reachable, the in-memory one otherwise.
pub async fn open_ledger(redis_url: Option<&str>) -> Arc<dyn LedgerStore> {
    if let Some(url) = redis_url {
        match RedisLedger::connect(url).await {
            Ok(ledger) => {
                tracing::info!("Redis ledger connected successfully");
                return Arc::new(ledger);
            }
            Err(e) => {
                tracing::warn!("Redis ledger unavailable: {}, using in-memory ledger", e);
            }
        }
    }

    Arc::new(InMemoryLedger::new())
}
