pub mod attestation;
pub mod health;
pub mod payments;
pub mod proofs;
pub mod stats;
pub mod storage;

pub use attestation::*;
pub use health::*;
pub use payments::*;
pub use proofs::*;
pub use stats::*;
pub use storage::*;

use crate::services::{LedgerStore, SoundnessSimulator, WalrusSimulator};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub walrus: Arc<WalrusSimulator>,
    pub soundness: Arc<SoundnessSimulator>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerStore>, walrus: WalrusSimulator) -> Self {
        Self {
            ledger,
            walrus: Arc::new(walrus),
            soundness: Arc::new(SoundnessSimulator::new()),
        }
    }
}
