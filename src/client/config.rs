use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_SUI_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
pub const DEFAULT_WALRUS_PUBLISHER_URL: &str = "https://publisher.walrus-testnet.walrus.space";
pub const DEFAULT_WALRUS_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";

// Not deployed yet
const PLACEHOLDER_CONTRACT: &str = "0x...";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub soundpay_escrow: String,
    pub soundpay_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitArtifacts {
    pub circuit_path: String,
    pub proving_key_path: String,
    pub verification_key_path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    pub items_per_page: usize,
    pub refresh_interval_ms: u64,
    pub animation_duration_ms: u64,
}

impl UiConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

/// Static client settings. Nothing here is discovered at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub sui_network: String,
    pub sui_rpc_url: String,
    pub api_url: String,
    pub walrus_publisher_url: String,
    pub walrus_aggregator_url: String,
    pub contracts: ContractAddresses,
    pub zk_proof: CircuitArtifacts,
    pub ui: UiConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sui_network: "testnet".to_string(),
            sui_rpc_url: DEFAULT_SUI_RPC_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            walrus_publisher_url: DEFAULT_WALRUS_PUBLISHER_URL.to_string(),
            walrus_aggregator_url: DEFAULT_WALRUS_AGGREGATOR_URL.to_string(),
            contracts: ContractAddresses {
                soundpay_escrow: PLACEHOLDER_CONTRACT.to_string(),
                soundpay_token: PLACEHOLDER_CONTRACT.to_string(),
            },
            zk_proof: CircuitArtifacts {
                circuit_path: "./circuits/payment.circom".to_string(),
                proving_key_path: "./keys/payment.zkey".to_string(),
                verification_key_path: "./keys/verification_key.json".to_string(),
            },
            ui: UiConfig {
                items_per_page: 10,
                refresh_interval_ms: 30_000,
                animation_duration_ms: 300,
            },
        }
    }
}

impl ClientConfig {
    /// Defaults, with endpoints overridable from the environment (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        let overrides = [
            ("SUI_NETWORK", &mut config.sui_network),
            ("SUI_RPC_URL", &mut config.sui_rpc_url),
            ("SOUNDPAY_API_URL", &mut config.api_url),
            ("WALRUS_PUBLISHER_URL", &mut config.walrus_publisher_url),
            ("WALRUS_AGGREGATOR_URL", &mut config.walrus_aggregator_url),
        ];
        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                *field = value;
            }
        }

        config
    }
}
