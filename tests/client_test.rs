use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use soundpay::{
    client::{
        fixtures, ClientConfig, Dashboard, FacadeClient, PaymentPipeline, PaymentRequest,
        PipelineStage, StaticWallet, WalletRegistry,
    },
    models::PaymentStatus,
};
use tokio_test::{assert_err, assert_ok};

const PROOF_HASH: &str = "5f2b0e9c4d1a7b3e8f6c2d9a0b1e4f7c3a6d8b2e5f9c1a4d7b0e3f6a9c2d5b8e";

const PROOF: &str = r#"{"success":true,"proofHash":"5f2b0e9c4d1a7b3e8f6c2d9a0b1e4f7c3a6d8b2e5f9c1a4d7b0e3f6a9c2d5b8e","proof":{"sender":"0xsender","recipient":"0xB","amount":"1","description":"x","timestamp":1,"nonce":"ab"}}"#;
const UPLOAD: &str = r#"{"success":true,"blobId":"0xblob","size":64,"url":"https://aggregator.test/v1/0xblob"}"#;
const ATTESTATION: &str = r#"{"success":true,"attestationId":"0xatt","status":"attested","timestamp":"2024-01-01T00:00:00Z"}"#;
const PAYMENT: &str = r#"{"id":"p1","sender":"0xsender","recipient":"0xB","amount":"1","description":"x","status":"pending","createdAt":"2024-01-01T00:00:00Z","blobId":"0xblob","attestationId":"0xatt","useEscrow":true}"#;
const STATS: &str = r#"{"totalPayments":1,"totalProofs":1,"storageUsed":0.5,"activeEscrows":1}"#;

async fn mock_json(server: &mut ServerGuard, method: &str, path: &str, body: &str) -> Mock {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn registry() -> WalletRegistry {
    WalletRegistry::new()
        .with(StaticWallet::new("Sui Wallet", None))
        .with(StaticWallet::new("Sui", Some("0xsender".to_string())))
}

fn dashboard_for(api_url: String) -> Dashboard {
    let config = ClientConfig {
        api_url,
        ..ClientConfig::default()
    };
    Dashboard::new(config, registry())
}

fn request() -> PaymentRequest {
    PaymentRequest {
        sender: "0xsender".to_string(),
        recipient: "0xB".to_string(),
        amount: "1".to_string(),
        description: "x".to_string(),
        use_escrow: true,
    }
}

fn fill_form(dashboard: &mut Dashboard) {
    dashboard.form.recipient = "0xB".to_string();
    dashboard.form.amount = "1".to_string();
    dashboard.form.description = "x".to_string();
    dashboard.form.use_escrow = true;
}

#[tokio::test]
async fn test_payment_succeeds_through_all_steps() {
    let mut server = Server::new_async().await;
    let history = mock_json(&mut server, "GET", "/api/payments/0xsender", "[]").await;
    // Once on connect, once after the payment
    let stats = server
        .mock("GET", "/api/stats")
        .with_body(STATS)
        .expect(2)
        .create_async()
        .await;
    let proof = server
        .mock("POST", "/api/generate-proof")
        .match_body(Matcher::PartialJson(json!({
            "sender": "0xsender",
            "recipient": "0xB",
            "amount": "1",
            "description": "x"
        })))
        .with_body(PROOF)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/api/upload-walrus")
        .match_body(Matcher::PartialJson(json!({"recipient": "0xB", "amount": "1"})))
        .with_body(UPLOAD)
        .create_async()
        .await;
    let attest = server
        .mock("POST", "/api/submit-soundness")
        .match_body(Matcher::PartialJson(
            json!({"blobId": "0xblob", "walletAddress": "0xsender"}),
        ))
        .with_body(ATTESTATION)
        .create_async()
        .await;
    let execute = server
        .mock("POST", "/api/payments")
        .match_body(Matcher::PartialJson(json!({
            "blobId": "0xblob",
            "attestationId": "0xatt",
            "useEscrow": true
        })))
        .with_body(PAYMENT)
        .create_async()
        .await;

    let mut dashboard = dashboard_for(format!("{}/api", server.url()));
    dashboard.connect_wallet().await;
    assert_eq!(dashboard.wallet().unwrap().provider, "Sui");
    fill_form(&mut dashboard);

    let stage = dashboard.send_payment().await;

    assert_eq!(stage, PipelineStage::Succeeded);
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.proof_status().progress, 100);
    assert_eq!(
        dashboard.proof_status().message,
        "Payment completed successfully!"
    );
    assert!(dashboard.form.recipient.is_empty());
    assert!(dashboard.form.amount.is_empty());
    assert!(dashboard.alerts().is_empty());

    let receipt = dashboard.receipt().unwrap();
    assert_eq!(receipt.proof_hash, PROOF_HASH);
    assert_eq!(receipt.blob_id, "0xblob");
    assert_eq!(receipt.attestation_id, "0xatt");
    assert_eq!(receipt.payment.status, PaymentStatus::Pending);
    assert_eq!(dashboard.stats().storage_used, 0.5);
    assert!(dashboard.share_url().is_some());

    for mock in [proof, upload, attest, execute, history, stats] {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_failed_upload_stops_pipeline() {
    let mut server = Server::new_async().await;
    mock_json(&mut server, "GET", "/api/payments/0xsender", "[]").await;
    mock_json(&mut server, "GET", "/api/stats", STATS).await;
    mock_json(&mut server, "POST", "/api/generate-proof", PROOF).await;
    server
        .mock("POST", "/api/upload-walrus")
        .with_status(500)
        .with_body(r#"{"success":false,"error":"Failed to upload to Walrus"}"#)
        .create_async()
        .await;
    let attest = server
        .mock("POST", "/api/submit-soundness")
        .expect(0)
        .create_async()
        .await;
    let execute = server
        .mock("POST", "/api/payments")
        .expect(0)
        .create_async()
        .await;

    let mut dashboard = dashboard_for(format!("{}/api", server.url()));
    dashboard.connect_wallet().await;
    fill_form(&mut dashboard);

    let stage = dashboard.send_payment().await;

    assert_eq!(stage, PipelineStage::Failed);
    assert_eq!(dashboard.proof_status().stage, PipelineStage::Failed);
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.form.recipient, "0xB");
    assert_eq!(dashboard.form.amount, "1");
    assert_eq!(dashboard.form.description, "x");
    assert!(dashboard.receipt().is_none());
    assert_eq!(
        dashboard.alerts(),
        ["Payment failed: Failed to upload to Walrus".to_string()]
    );

    attest.assert_async().await;
    execute.assert_async().await;
}

#[tokio::test]
async fn test_pipeline_reports_failing_stage() {
    let mut server = Server::new_async().await;
    mock_json(&mut server, "POST", "/api/generate-proof", PROOF).await;
    mock_json(&mut server, "POST", "/api/upload-walrus", UPLOAD).await;
    server
        .mock("POST", "/api/submit-soundness")
        .with_status(503)
        .create_async()
        .await;

    let mut pipeline = PaymentPipeline::new(FacadeClient::new(format!("{}/api/", server.url())));
    let mut seen = Vec::new();
    let err = assert_err!(pipeline.run(&request(), |stage| seen.push(stage)).await);

    assert_eq!(err.stage, PipelineStage::Attesting);
    assert_eq!(err.to_string(), "Failed to submit to Soundness Layer");
    assert_eq!(pipeline.stage(), PipelineStage::Failed);
    assert_eq!(
        seen,
        vec![
            PipelineStage::GeneratingProof,
            PipelineStage::Uploading,
            PipelineStage::Attesting,
            PipelineStage::Failed,
        ]
    );
}

#[tokio::test]
async fn test_send_requires_wallet_and_fields() {
    let mut server = Server::new_async().await;
    let proof = server
        .mock("POST", "/api/generate-proof")
        .expect(0)
        .create_async()
        .await;

    let config = ClientConfig {
        api_url: format!("{}/api", server.url()),
        ..ClientConfig::default()
    };
    let mut dashboard = Dashboard::new(config, WalletRegistry::new());
    fill_form(&mut dashboard);

    assert_eq!(dashboard.send_payment().await, PipelineStage::Idle);
    assert_eq!(dashboard.alerts(), ["Please connect your wallet first".to_string()]);

    dashboard.connect_wallet().await;
    assert!(dashboard.wallet().is_none());
    assert!(dashboard.wallet_prompt_visible());

    let mut dashboard = dashboard_for(format!("{}/api", server.url()));
    dashboard.connect_wallet().await;
    dashboard.take_alerts();
    dashboard.form.amount = "1".to_string();

    dashboard.send_payment().await;
    assert_eq!(
        dashboard.take_alerts(),
        vec!["Please fill in recipient address and amount".to_string()]
    );
    assert!(!dashboard.is_loading());

    proof.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_facade_falls_back_to_samples() {
    // Nothing listens on port 9
    let mut dashboard = dashboard_for("http://127.0.0.1:9/api".to_string());
    dashboard.init().await;
    assert_eq!(dashboard.stats(), &fixtures::sample_stats());

    dashboard.connect_wallet().await;
    assert_eq!(dashboard.payments().len(), fixtures::sample_payments().len());
    assert!(dashboard.alerts().is_empty());
}

#[tokio::test]
async fn test_stats_error_status_falls_back() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/stats")
        .with_status(500)
        .create_async()
        .await;

    let mut dashboard = dashboard_for(format!("{}/api", server.url()));
    dashboard.load_dashboard_data().await;

    assert_eq!(dashboard.stats().total_payments, 42);
    assert_eq!(dashboard.stats().active_escrows, 8);
}

#[tokio::test]
async fn test_search_proof() {
    let mut server = Server::new_async().await;
    let record = json!({
        "id": PROOF_HASH,
        "data": {"sender": "0xsender", "timestamp": 1, "nonce": "ab"},
        "status": "generated",
        "createdAt": "2024-01-01T00:00:00Z"
    });
    mock_json(
        &mut server,
        "GET",
        &format!("/api/proof/{}", PROOF_HASH),
        &record.to_string(),
    )
    .await;
    server
        .mock("GET", "/api/proof/deadbeef")
        .with_status(404)
        .with_body(r#"{"success":false,"error":"Proof not found"}"#)
        .create_async()
        .await;

    let mut dashboard = dashboard_for(format!("{}/api", server.url()));

    dashboard.search_proof("   ").await;
    assert!(dashboard.alerts().is_empty());

    dashboard.search_proof("deadbeef").await;
    assert_eq!(dashboard.take_alerts(), vec!["Proof not found".to_string()]);
    assert!(dashboard.proof_details().is_none());

    dashboard.search_proof(PROOF_HASH).await;
    assert_eq!(dashboard.proof_details().unwrap().id, PROOF_HASH);

    let mut offline = dashboard_for("http://127.0.0.1:9/api".to_string());
    offline.search_proof(PROOF_HASH).await;
    assert_eq!(offline.take_alerts(), vec!["Search failed".to_string()]);
}

#[tokio::test]
async fn test_update_payment_status() {
    let mut server = Server::new_async().await;
    let completed = PAYMENT.replace("\"pending\"", "\"completed\"");
    server
        .mock("PUT", "/api/payments/p1")
        .match_body(Matcher::Json(json!({"status": "completed"})))
        .with_body(completed)
        .create_async()
        .await;
    server
        .mock("PUT", "/api/payments/missing")
        .with_status(404)
        .create_async()
        .await;

    let client = FacadeClient::new(format!("{}/api", server.url()));

    let payment = assert_ok!(client.update_payment("p1", PaymentStatus::Completed).await);
    assert_eq!(payment.status, PaymentStatus::Completed);

    let err = assert_err!(client.update_payment("missing", PaymentStatus::Completed).await);
    assert_eq!(err.to_string(), "Failed to update payment");
}
