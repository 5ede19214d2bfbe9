//! Client side of SoundPay: a typed facade client, the payment pipeline state
//! machine, wallet discovery and the dashboard view model the agent renders.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod fixtures;
pub mod pipeline;
pub mod wallet;

pub use api::FacadeClient;
pub use config::ClientConfig;
pub use dashboard::{Dashboard, PaymentForm, Section, StatusFilter};
pub use pipeline::{PaymentPipeline, PaymentReceipt, PaymentRequest, PipelineError, PipelineStage};
pub use wallet::{ExtensionWallet, StaticWallet, WalletAccount, WalletProvider, WalletRegistry};
