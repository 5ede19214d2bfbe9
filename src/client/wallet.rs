use crate::error::WalletError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Providers probed on startup, with the variable each one reads its account from.
pub const KNOWN_WALLETS: &[(&str, &str)] = &[
    ("Sui Wallet", "SUI_WALLET_ADDRESS"),
    ("Sui", "SUI_ADDRESS"),
    ("Martian", "MARTIAN_SUI_ADDRESS"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub provider: String,
    pub address: String,
}

impl WalletAccount {
    /// `0x1234...abcd`; short addresses are returned whole.
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= 10 {
            return self.address.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn is_available(&self) -> bool;
    async fn connect(&self) -> Result<WalletAccount, WalletError>;
}

/// A provider holding a fixed account, if any.
pub struct StaticWallet {
    name: String,
    address: Option<String>,
}

impl StaticWallet {
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        Self {
            name: name.into(),
            address: address.filter(|a| !a.trim().is_empty()),
        }
    }

    pub fn from_env(name: &str, var: &str) -> Self {
        Self::new(name, std::env::var(var).ok())
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.address.is_some()
    }

    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        let address = self
            .address
            .clone()
            .ok_or_else(|| WalletError::PermissionDenied(self.name.clone()))?;

        Ok(WalletAccount {
            provider: self.name.clone(),
            address,
        })
    }
}

pub const EXTENSION_WALLET: &str = "Sui Wallet Extension";
pub const EXTENSION_ID: &str = "ppcguiplghgbkfbbdklghmhjjblefiao";
/// Where the extension bridge listens; unset means no extension.
pub const EXTENSION_URL_VAR: &str = "SUI_WALLET_EXTENSION_URL";

const EXTENSION_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionMessage<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    extension_id: &'a str,
}

#[derive(Deserialize)]
struct ExtensionAccount {
    address: String,
}

/// The browser-extension wallet, reached by message over its local bridge.
/// Any error answering a ping means the extension is not installed.
pub struct ExtensionWallet {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl ExtensionWallet {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(EXTENSION_URL_VAR).ok())
    }

    async fn send(&self, kind: &str) -> Option<reqwest::Response> {
        let endpoint = self.endpoint.as_deref()?;
        let message = ExtensionMessage {
            kind,
            extension_id: EXTENSION_ID,
        };

        match self
            .http
            .post(endpoint)
            .timeout(EXTENSION_TIMEOUT)
            .json(&message)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
        {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::debug!("Wallet extension did not answer {}: {}", kind, e);
                None
            }
        }
    }
}

#[async_trait]
impl WalletProvider for ExtensionWallet {
    fn name(&self) -> &str {
        EXTENSION_WALLET
    }

    async fn is_available(&self) -> bool {
        self.send("ping").await.is_some()
    }

    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        let denied = || WalletError::PermissionDenied(EXTENSION_WALLET.to_string());

        let response = self.send("connect").await.ok_or_else(denied)?;
        let account: ExtensionAccount = response.json().await.map_err(|_| denied())?;

        Ok(WalletAccount {
            provider: EXTENSION_WALLET.to_string(),
            address: account.address,
        })
    }
}

#[derive(Default, Clone)]
pub struct WalletRegistry {
    providers: Vec<Arc<dyn WalletProvider>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The extension first, then the known wallets in order.
    pub fn from_env() -> Self {
        KNOWN_WALLETS.iter().fold(
            Self::new().with(ExtensionWallet::from_env()),
            |registry, (name, var)| registry.with(StaticWallet::from_env(name, var)),
        )
    }

    pub fn with(mut self, provider: impl WalletProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Providers that answer, in registration order.
    pub async fn detect(&self) -> Vec<Arc<dyn WalletProvider>> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.clone());
            }
        }
        available
    }

    pub async fn connect_first(&self) -> Result<WalletAccount, WalletError> {
        let available = self.detect().await;
        let provider = available.first().ok_or(WalletError::NoProvider)?;

        tracing::info!("Connecting wallet via {}", provider.name());
        provider.connect().await
    }
}
