use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use soundpay::client::{
    dashboard::{render_payment, render_proof},
    ClientConfig, Dashboard, PipelineStage, Section, StatusFilter, WalletRegistry,
};

#[derive(Parser)]
#[command(author, version, about = "Drive the SoundPay payment pipeline from the terminal")]
struct Cli {
    /// Facade base URL, including the /api prefix
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a payment through proof, upload, attestation and execution
    Pay {
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Hold the funds in escrow
        #[arg(long)]
        escrow: bool,
    },
    /// List payments for the connected wallet
    History {
        #[arg(long, default_value = "all")]
        filter: StatusFilter,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Look up a proof by digest or blob id
    Proof { id: String },
    /// Show dashboard counters
    Stats,
    /// Refresh dashboard counters until interrupted
    Watch,
    /// Print the effective client configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let mut dashboard = Dashboard::new(config, WalletRegistry::from_env());
    dashboard.init().await;

    let result = run(&mut dashboard, cli.command).await;
    for alert in dashboard.take_alerts() {
        println!("[ALERT] {}", alert);
    }
    result
}

async fn run(dashboard: &mut Dashboard, command: Command) -> Result<()> {
    match command {
        Command::Pay {
            recipient,
            amount,
            description,
            escrow,
        } => {
            connect(dashboard).await?;
            open(dashboard, Section::SendPayment).await;
            dashboard.form.recipient = recipient;
            dashboard.form.amount = amount;
            dashboard.form.description = description;
            dashboard.form.use_escrow = escrow;

            let stage = dashboard.send_payment().await;
            let status = dashboard.proof_status();
            println!("{} ({}%)", status.message, status.progress);

            if stage != PipelineStage::Succeeded {
                bail!("Payment ended in state {}", stage);
            }

            if let Some(receipt) = dashboard.receipt() {
                println!("Proof hash:     {}", receipt.proof_hash);
                println!("Blob ID:        {}", receipt.blob_id);
                println!("Attestation ID: {}", receipt.attestation_id);
                println!("Payment ID:     {}", receipt.payment.id);
            }
            if let Some(url) = dashboard.share_url() {
                println!("Share: {}", url);
            }
            print_stats(dashboard);
        }
        Command::History { filter, page } => {
            connect(dashboard).await?;
            open(dashboard, Section::PaymentHistory).await;
            dashboard.set_filter(filter);

            let pages = dashboard.page_count();
            println!("Page {} of {}", page + 1, pages.max(1));
            for payment in dashboard.page(page) {
                println!("{}", render_payment(payment));
            }
        }
        Command::Proof { id } => {
            open(dashboard, Section::ProofExplorer).await;
            dashboard.search_proof(&id).await;
            if let Some(proof) = dashboard.proof_details() {
                println!("{}", render_proof(proof));
            }
        }
        Command::Stats => {
            open(dashboard, Section::Dashboard).await;
            print_stats(dashboard);
        }
        Command::Watch => {
            let mut ticker = tokio::time::interval(dashboard.config().ui.refresh_interval());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        dashboard.load_dashboard_data().await;
                        print_stats(dashboard);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(dashboard.config())?);
        }
    }

    Ok(())
}

async fn open(dashboard: &mut Dashboard, section: Section) {
    dashboard.show_section(section).await;
    println!("== {} ==", dashboard.section().title());
}

async fn connect(dashboard: &mut Dashboard) -> Result<()> {
    dashboard.connect_wallet().await;

    match dashboard.wallet() {
        Some(wallet) => {
            println!("Wallet: {} ({})", wallet.short_address(), wallet.provider);
            Ok(())
        }
        None if dashboard.wallet_prompt_visible() => {
            bail!(
                "No wallet detected. Set SUI_WALLET_EXTENSION_URL, SUI_WALLET_ADDRESS, \
                 SUI_ADDRESS or MARTIAN_SUI_ADDRESS"
            )
        }
        None => bail!("Wallet connection failed"),
    }
}

fn print_stats(dashboard: &Dashboard) {
    let stats = dashboard.stats();
    println!("Total payments: {}", stats.total_payments);
    println!("Total proofs:   {}", stats.total_proofs);
    println!("Storage used:   {} MB", stats.storage_used);
    println!("Active escrows: {}", stats.active_escrows);
}
