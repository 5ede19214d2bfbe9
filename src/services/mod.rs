pub mod ledger;
pub mod prover;
pub mod redis_ledger;
pub mod soundness;
pub mod walrus;

pub use ledger::{open_ledger, InMemoryLedger, LedgerStore};
pub use redis_ledger::RedisLedger;
pub use soundness::SoundnessSimulator;
pub use walrus::WalrusSimulator;

/// `len` random bytes, lowercase hex.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    hex::encode(bytes)
}

/// A random 256-bit identifier in `0x`-prefixed hex, the shape storage and
/// attestation networks hand out.
pub fn random_id256() -> String {
    format!("0x{}", random_hex(32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_identifier_shape() {
        let id = random_id256();
        assert_eq!(id.len(), 66);
        assert!(id.starts_with("0x"));
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(random_id256(), id);
        assert_eq!(random_hex(16).len(), 32);
    }
}
