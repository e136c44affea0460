//! End-to-end tests against a stub prediction backend

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use spamguard::classifier::{KeywordClassifier, RemoteClassifier};
use spamguard::config::SpamGuardConfig;
use spamguard::render::Renderer;
use spamguard::store::{FileStore, KeyValueStore, HISTORY_KEY, THEME_KEY};
use spamguard::types::FallbackReason;
use spamguard::{App, Label, PredictionGateway, PredictionSource, ThemeMode};

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn predict_ok(Json(body): Json<Value>) -> Json<Value> {
    let text = body["text"].as_str().unwrap_or_default();
    let explanation: Vec<Value> = text
        .split_whitespace()
        .map(|token| {
            let score = if token.eq_ignore_ascii_case("free") { 0.72 } else { 0.02 };
            json!({ "token": token, "score": score })
        })
        .collect();

    Json(json!({
        "id": "server-side-id",
        "label": "spam",
        "probability": 0.91,
        "explanation": explanation,
        "timestamp": "2001-01-01T00:00:00Z",
        "originalText": "not what was sent",
    }))
}

fn healthy_backend() -> Router {
    Router::new()
        .route("/api/predict", post(predict_ok))
        .route(
            "/api/health",
            get(|| async { Json(json!({ "status": "healthy", "model_loaded": true })) }),
        )
}

fn failing_backend() -> Router {
    Router::new().route(
        "/api/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
    )
}

fn malformed_backend() -> Router {
    Router::new().route(
        "/api/predict",
        post(|| async { Json(json!({ "verdict": "spam" })) }),
    )
}

fn local_fallback() -> KeywordClassifier {
    KeywordClassifier::with_seed(11).with_latency(Duration::ZERO)
}

fn gateway_for(base_url: &str) -> PredictionGateway {
    PredictionGateway::new(local_fallback()).with_remote(RemoteClassifier::new(base_url))
}

fn file_app(path: &Path, gateway: PredictionGateway) -> App {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));
    App::new(gateway, store, ThemeMode::Light).unwrap()
}

#[tokio::test]
async fn test_remote_prediction_gets_local_identity() {
    let base_url = spawn_backend(healthy_backend()).await;
    let gateway = gateway_for(&base_url);

    let (result, source) = gateway
        .predict_with_source("get your FREE ringtone", false)
        .await
        .unwrap();

    assert_eq!(source, PredictionSource::Remote);
    assert_eq!(result.label, Label::Spam);
    assert!((result.probability - 0.91).abs() < 1e-9);
    assert_eq!(result.explanation.len(), 4);
    assert_eq!(result.explanation[2].token, "FREE");

    assert_ne!(result.id, "server-side-id");
    assert!(uuid::Uuid::parse_str(&result.id).is_ok());
    assert_eq!(result.original_text, "get your FREE ringtone");
    assert!(result.timestamp.timestamp() > 978_307_200);
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let base_url = spawn_backend(failing_backend()).await;
    let gateway = gateway_for(&base_url);

    let (result, source) = gateway
        .predict_with_source("URGENT cash prize waiting", false)
        .await
        .unwrap();

    assert_eq!(source, PredictionSource::Fallback(FallbackReason::Status(500)));
    assert_eq!(result.label, Label::Spam);
    assert!(result.probability >= 0.01 && result.probability <= 0.99);
    assert_eq!(result.explanation.len(), 4);
    assert_eq!(result.original_text, "URGENT cash prize waiting");
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let base_url = spawn_backend(malformed_backend()).await;
    let gateway = gateway_for(&base_url);

    let (result, source) = gateway
        .predict_with_source("see you at the station", false)
        .await
        .unwrap();

    assert_eq!(source, PredictionSource::Fallback(FallbackReason::Malformed));
    assert_eq!(result.label, Label::Ham);
    assert!(result.explanation.iter().all(|t| t.score < 0.1));
}

#[tokio::test]
async fn test_unreachable_backend_falls_back() {
    let base_url = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let gateway = gateway_for(&base_url);

    let result = gateway.predict("claim your free offer", false).await.unwrap();
    assert_eq!(result.label, Label::Spam);
}

#[tokio::test]
async fn test_force_mock_skips_backend() {
    let base_url = spawn_backend(failing_backend()).await;
    let gateway = gateway_for(&base_url);

    let (_, source) = gateway.predict_with_source("hello there", true).await.unwrap();
    assert_eq!(source, PredictionSource::Fallback(FallbackReason::Forced));
}

#[tokio::test]
async fn test_health_report() {
    let base_url = spawn_backend(healthy_backend()).await;
    let report = RemoteClassifier::new(format!("{}/", base_url))
        .health()
        .await
        .unwrap();

    assert_eq!(report.status, "healthy");
    assert!(report.model_loaded);

    let missing = spawn_backend(failing_backend()).await;
    assert!(RemoteClassifier::new(missing).health().await.is_err());
}

#[tokio::test]
async fn test_history_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state").join("spamguard.json");
    let base_url = spawn_backend(healthy_backend()).await;

    let (saved, card) = {
        let mut app = file_app(&state, gateway_for(&base_url));
        let saved = app.submit("FREE entry to win", false).await.unwrap();
        let card = Renderer::plain().prediction_card(&saved, false);
        (saved, card)
    };

    let mut app = file_app(&state, gateway_for(&base_url));
    assert_eq!(app.history().len(), 1);

    let selected = app.select_history(&saved.id).unwrap();
    assert_eq!(selected, &saved);
    assert_eq!(Renderer::plain().prediction_card(selected, false), card);
}

#[tokio::test]
async fn test_clear_history_persists_empty_list() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("spamguard.json");

    let mut app = file_app(&state, PredictionGateway::new(local_fallback()));
    app.submit("lunch?", false).await.unwrap();
    app.submit("win cash now", false).await.unwrap();
    assert_eq!(app.history().len(), 2);

    app.clear_history().unwrap();

    let store = FileStore::new(&state);
    assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    assert!(file_app(&state, PredictionGateway::new(local_fallback()))
        .history()
        .is_empty());
}

#[tokio::test]
async fn test_theme_persists_in_state_file() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("spamguard.json");

    let mut app = file_app(&state, PredictionGateway::new(local_fallback()));
    assert_eq!(app.toggle_theme().unwrap(), ThemeMode::Dark);

    let store = FileStore::new(&state);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    let app = file_app(&state, PredictionGateway::new(local_fallback()));
    assert_eq!(app.theme(), ThemeMode::Dark);
}

#[tokio::test]
async fn test_app_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let base_url = spawn_backend(healthy_backend()).await;

    let mut config = SpamGuardConfig::default();
    config.remote.base_url = Some(base_url);
    config.remote.timeout_secs = Some(5);
    config.fallback.latency_ms = 0;
    config.storage.path = temp_dir.path().join("state.json");
    config.ui.default_theme = ThemeMode::Dark;

    let mut app = App::from_config(&config).unwrap();
    assert!(app.gateway().has_remote());
    assert_eq!(app.theme(), ThemeMode::Dark);

    let source = app.predict("FREE tickets", false).await.unwrap();
    assert_eq!(source, PredictionSource::Remote);
    assert!(app.history().is_empty());
}

#[tokio::test]
async fn test_truncated_state_file_is_recovered() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");
    std::fs::write(&state, "{truncated").unwrap();

    let mut config = SpamGuardConfig::default();
    config.fallback.latency_ms = 0;
    config.storage.path = state.clone();

    let mut app = App::from_config(&config).unwrap();
    assert!(app.history().is_empty());
    assert_eq!(app.theme(), ThemeMode::Light);

    let saved = app.submit("free cash prize", false).await.unwrap();

    let reopened = App::from_config(&config).unwrap();
    assert_eq!(reopened.history(), &[saved]);
}
