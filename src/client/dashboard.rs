use crate::{
    client::{
        api::FacadeClient,
        config::ClientConfig,
        fixtures,
        pipeline::{PaymentPipeline, PaymentReceipt, PaymentRequest, PipelineStage},
        wallet::{WalletAccount, WalletRegistry},
    },
    error::{ClientError, WalletError},
    models::{PaymentRecord, PaymentStatus, ProofRecord, Stats},
};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const SHARE_INTENT_URL: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    SendPayment,
    PaymentHistory,
    ProofExplorer,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::SendPayment => "sendPayment",
            Section::PaymentHistory => "paymentHistory",
            Section::ProofExplorer => "proofExplorer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::SendPayment => "Send Payment",
            Section::PaymentHistory => "Payment History",
            Section::ProofExplorer => "Proof Explorer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Section::Dashboard),
            "sendPayment" => Ok(Section::SendPayment),
            "paymentHistory" => Ok(Section::PaymentHistory),
            "proofExplorer" => Ok(Section::ProofExplorer),
            other => Err(format!("Unknown section: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Disputed,
}

impl StatusFilter {
    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == PaymentStatus::Pending,
            StatusFilter::Completed => status == PaymentStatus::Completed,
            StatusFilter::Disputed => status == PaymentStatus::Disputed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            "disputed" => Ok(StatusFilter::Disputed),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub recipient: String,
    pub amount: String,
    pub description: String,
    pub use_escrow: bool,
}

impl PaymentForm {
    fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
        self.description.clear();
    }
}

/// Progress panel for the payment in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStatusView {
    pub visible: bool,
    pub stage: PipelineStage,
    pub message: String,
    pub progress: u8,
}

impl Default for ProofStatusView {
    fn default() -> Self {
        Self {
            visible: false,
            stage: PipelineStage::Idle,
            message: String::new(),
            progress: 0,
        }
    }
}

impl ProofStatusView {
    fn enter(&mut self, stage: PipelineStage) {
        self.visible = true;
        self.stage = stage;
        self.message = stage.message().to_string();
        if let Some(progress) = stage.progress() {
            self.progress = progress;
        }
    }
}

/// View model of the SoundPay dashboard.
///
/// Every region the user sees is a field here; `alerts` collects the messages
/// that would pop up, oldest first, until taken.
pub struct Dashboard {
    api: FacadeClient,
    config: ClientConfig,
    wallets: WalletRegistry,
    wallet: Option<WalletAccount>,
    wallet_prompt: bool,
    section: Section,
    pub form: PaymentForm,
    loading: bool,
    proof_status: ProofStatusView,
    receipt: Option<PaymentReceipt>,
    stats: Stats,
    payments: Vec<PaymentRecord>,
    filter: StatusFilter,
    proof_details: Option<ProofRecord>,
    alerts: Vec<String>,
}

impl Dashboard {
    pub fn new(config: ClientConfig, wallets: WalletRegistry) -> Self {
        Self {
            api: FacadeClient::new(config.api_url.clone()),
            config,
            wallets,
            wallet: None,
            wallet_prompt: false,
            section: Section::Dashboard,
            form: PaymentForm::default(),
            loading: false,
            proof_status: ProofStatusView::default(),
            receipt: None,
            stats: Stats::default(),
            payments: Vec::new(),
            filter: StatusFilter::All,
            proof_details: None,
            alerts: Vec::new(),
        }
    }

    pub fn api(&self) -> &FacadeClient {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn wallet(&self) -> Option<&WalletAccount> {
        self.wallet.as_ref()
    }

    pub fn wallet_prompt_visible(&self) -> bool {
        self.wallet_prompt
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn proof_status(&self) -> &ProofStatusView {
        &self.proof_status
    }

    pub fn receipt(&self) -> Option<&PaymentReceipt> {
        self.receipt.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn proof_details(&self) -> Option<&ProofRecord> {
        self.proof_details.as_ref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub async fn init(&mut self) {
        let available = self.wallets.detect().await;
        if available.is_empty() {
            self.wallet_prompt = true;
        } else {
            let names: Vec<&str> = available.iter().map(|w| w.name()).collect();
            tracing::info!("Wallet detected: {}", names.join(", "));
        }

        self.load_dashboard_data().await;
    }

    pub fn dismiss_wallet_prompt(&mut self) {
        self.wallet_prompt = false;
    }

    pub async fn connect_wallet(&mut self) {
        match self.wallets.connect_first().await {
            Ok(account) => {
                tracing::info!("Wallet connected: {}", account.address);
                self.wallet = Some(account);
                self.wallet_prompt = false;
                self.load_user_data().await;
            }
            Err(WalletError::NoProvider) => {
                self.wallet_prompt = true;
            }
            Err(e) => {
                tracing::error!("Failed to connect wallet: {}", e);
                self.alert("Failed to connect wallet. Please try again.");
            }
        }
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet = None;
        tracing::info!("Wallet disconnected");
    }

    async fn load_user_data(&mut self) {
        self.load_payment_history().await;
        self.load_dashboard_data().await;
    }

    pub async fn show_section(&mut self, section: Section) {
        self.section = section;

        match section {
            Section::Dashboard => self.load_dashboard_data().await,
            Section::PaymentHistory => self.load_payment_history().await,
            Section::ProofExplorer => tracing::debug!("Loading proof explorer..."),
            Section::SendPayment => {}
        }
    }

    pub async fn load_dashboard_data(&mut self) {
        self.stats = match self.api.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Failed to fetch stats: {}, showing sample data", e);
                fixtures::sample_stats()
            }
        };
    }

    /// Submits the form through the payment pipeline and returns the final stage.
    pub async fn send_payment(&mut self) -> PipelineStage {
        let Some(wallet) = self.wallet.clone() else {
            self.alert("Please connect your wallet first");
            return self.proof_status.stage;
        };

        if self.form.recipient.trim().is_empty() || self.form.amount.trim().is_empty() {
            self.alert("Please fill in recipient address and amount");
            return self.proof_status.stage;
        }

        let request = PaymentRequest {
            sender: wallet.address,
            recipient: self.form.recipient.clone(),
            amount: self.form.amount.clone(),
            description: self.form.description.clone(),
            use_escrow: self.form.use_escrow,
        };

        self.loading = true;
        self.receipt = None;
        self.proof_status = ProofStatusView::default();

        let mut pipeline = PaymentPipeline::new(self.api.clone());
        let status = &mut self.proof_status;
        let result = pipeline.run(&request, |stage| status.enter(stage)).await;

        match result {
            Ok(receipt) => {
                self.form.clear();
                self.receipt = Some(receipt);
                self.load_dashboard_data().await;
            }
            Err(e) => {
                self.alert(format!("Payment failed: {}", e));
            }
        }

        self.loading = false;
        pipeline.stage()
    }

    pub async fn load_payment_history(&mut self) {
        let Some(wallet) = &self.wallet else {
            return;
        };

        self.payments = match self.api.payments_for(&wallet.address).await {
            Ok(payments) => payments,
            Err(e) => {
                tracing::warn!("Failed to load payment history: {}, showing sample data", e);
                fixtures::sample_payments()
            }
        };
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn visible_payments(&self) -> Vec<&PaymentRecord> {
        self.payments
            .iter()
            .filter(|p| self.filter.matches(p.status))
            .collect()
    }

    pub fn page_count(&self) -> usize {
        let per_page = self.config.ui.items_per_page.max(1);
        self.visible_payments().len().div_ceil(per_page)
    }

    /// Zero-based page of the filtered history.
    pub fn page(&self, index: usize) -> Vec<&PaymentRecord> {
        let per_page = self.config.ui.items_per_page.max(1);
        self.visible_payments()
            .into_iter()
            .skip(index * per_page)
            .take(per_page)
            .collect()
    }

    pub async fn search_proof(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }

        match self.api.proof(term).await {
            Ok(Some(proof)) => self.proof_details = Some(proof),
            Ok(None) | Err(ClientError::Rejected { .. }) => self.alert("Proof not found"),
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                self.alert("Search failed");
            }
        }
    }

    /// Tweet intent announcing the last completed payment.
    pub fn share_url(&self) -> Option<String> {
        let receipt = self.receipt.as_ref()?;
        let text = format!(
            "Just completed a private payment using @SoundnessLabs!\n\n\
             ZK Proof verified\n\
             Data stored on @WalrusProtocol\n\
             Powered by @SuiNetwork\n\n\
             Blob ID: {}...\n\
             Attestation: {}...\n\n\
             #SoundPay #ZKProofs #Web3 #Privacy",
            prefix(&receipt.blob_id, 10),
            prefix(&receipt.attestation_id, 10),
        );

        reqwest::Url::parse_with_params(SHARE_INTENT_URL, &[("text", text)])
            .ok()
            .map(|url| url.to_string())
    }
}

fn prefix(s: &str, len: usize) -> String {
    s.chars().take(len).collect()
}

/// Strings verbatim, other JSON as written, absent values as `-`.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn render_payment(payment: &PaymentRecord) -> String {
    format!(
        "{} SUI [{}]\n  To: {}\n  Description: {}\n  Date: {}\n  Blob ID: {}",
        text(Some(&payment.amount)),
        payment.status,
        text(Some(&payment.recipient)),
        text(Some(&payment.description)),
        payment.created_at.format("%Y-%m-%d"),
        text(payment.field("blobId")),
    )
}

pub fn render_proof(proof: &ProofRecord) -> String {
    format!(
        "Proof Details\n  ID: {}\n  Status: {}\n  Created: {}\n  Sender: {}\n  Recipient: {}\n  Amount: {}\n  Description: {}\n  Blob ID: {}\n  Nonce: {}",
        proof.id,
        proof.status.as_str(),
        proof.created_at.to_rfc3339(),
        text(proof.data.sender.as_ref()),
        text(proof.data.recipient.as_ref()),
        text(proof.data.amount.as_ref()),
        text(proof.data.description.as_ref()),
        text(proof.data.blob_id.as_ref()),
        proof.data.nonce,
    )
}
