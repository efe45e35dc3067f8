//! Integration tests for the train delay checker.
//!
//! The ViaggiaTreno client runs against a local axum stand-in for the
//! upstream API. Tests against the real API are ignored by default.
//! Run them with: cargo test --test integration -- --ignored

use std::time::{Duration, Instant};

use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Router};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use url::Url;

use train_delays::config::Config;
use train_delays::error::LookupError;
use train_delays::trains::{
    StatusSource, TrainChecker, TrainQuery, TrainTarget, ViaggiaTrenoClient, NOT_AVAILABLE,
};

async fn autocomplete(Path(number): Path<String>) -> impl IntoResponse {
    match number.as_str() {
        "7777" => {
            // Stalled upstream
            tokio::time::sleep(Duration::from_secs(30)).await;
            String::new()
        }
        "9638" => "9638 - MILANO CENTRALE|9638-S01700\n".to_string(),
        "9742" => "9742 - MILANO CENTRALE|9742-S01700\n".to_string(),
        "5000" => "5000 - TORINO PORTA NUOVA|5000-S00219\n".to_string(),
        _ => String::new(),
    }
}

async fn andamento(Path((code, number)): Path<(String, String)>) -> impl IntoResponse {
    match (code.as_str(), number.as_str()) {
        ("S01700", "9638") => (
            StatusCode::OK,
            r#"{"numeroTreno": 9638, "compRitardo": ["ritardo 5 min", "delay 5 min"]}"#,
        ),
        ("S01700", "9742") => (StatusCode::OK, r#"{"numeroTreno": 9742, "compRitardo": []}"#),
        ("S08409", "9336") => (StatusCode::OK, r#"{"compRitardo": ["in orario", "on time"]}"#),
        ("S09218", "9544") => (StatusCode::OK, "<html>maintenance</html>"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ""),
    }
}

/// Start the stand-in upstream and return its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route(
            "/viaggiatreno/cercaNumeroTrenoTrenoAutocomplete/:number",
            get(autocomplete),
        )
        .route("/viaggiatreno/andamentoTreno/:code/:number", get(andamento));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/viaggiatreno", addr)
}

fn client_for(base_url: &str) -> ViaggiaTrenoClient {
    let config = Config {
        viaggiatreno_base_url: base_url.to_string(),
        http_timeout_ms: 2000,
        ..Config::default()
    };
    ViaggiaTrenoClient::new(&config).unwrap()
}

#[tokio::test]
async fn resolves_train_number_then_fetches_delay() {
    let base = spawn_upstream().await;
    let client = client_for(&base);

    let code = client.resolve_train_code("9638").await.unwrap();
    assert_eq!(code, "S01700");

    let delay = client
        .train_delay(&TrainTarget::Number("9638".to_string()))
        .await
        .unwrap();
    assert_eq!(delay, "ritardo 5 min");
}

#[tokio::test]
async fn fetches_direct_url() {
    let base = spawn_upstream().await;
    let client = client_for(&base);
    let url = Url::parse(&format!("{}/andamentoTreno/S08409/9336", base)).unwrap();

    let delay = client.train_delay(&TrainTarget::Url(url)).await.unwrap();
    assert_eq!(delay, "in orario");
}

#[tokio::test]
async fn lookup_failures_are_typed() {
    let base = spawn_upstream().await;
    let client = client_for(&base);

    let unknown = client
        .train_delay(&TrainTarget::Number("1111".to_string()))
        .await;
    assert!(matches!(unknown, Err(LookupError::TrainCodeNotFound { .. })));

    let empty = client
        .train_delay(&TrainTarget::Number("9742".to_string()))
        .await;
    assert!(matches!(empty, Err(LookupError::EmptyDelay { .. })));

    let server_error = client
        .train_delay(&TrainTarget::Number("5000".to_string()))
        .await;
    assert!(matches!(
        server_error,
        Err(LookupError::HttpStatus { status: 500, .. })
    ));

    let url = Url::parse(&format!("{}/andamentoTreno/S09218/9544", base)).unwrap();
    let malformed = client.train_delay(&TrainTarget::Url(url)).await;
    assert!(matches!(malformed, Err(LookupError::ParseError(_))));
}

#[tokio::test]
async fn unreachable_upstream_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}/viaggiatreno", addr));
    let result = client
        .train_delay(&TrainTarget::Number("9638".to_string()))
        .await;
    assert!(matches!(result, Err(LookupError::HttpError(_))));
}

#[tokio::test]
async fn stalled_upstream_times_out() {
    let base = spawn_upstream().await;
    let config = Config {
        viaggiatreno_base_url: base,
        http_timeout_ms: 300,
        ..Config::default()
    };
    let client = ViaggiaTrenoClient::new(&config).unwrap();

    let direct = client
        .train_delay(&TrainTarget::Number("7777".to_string()))
        .await;
    assert!(matches!(direct, Err(LookupError::HttpError(ref e)) if e.is_timeout()));

    let checker = TrainChecker::new(client, TrainQuery::parse_table("20:00=7777").unwrap());
    let start = Instant::now();
    let report = checker.run().await;

    assert!(
        start.elapsed() < Duration::from_secs(5),
        "check took {:?}",
        start.elapsed()
    );
    assert_eq!(report.get("20:00"), Some(NOT_AVAILABLE));
}

#[tokio::test]
async fn checker_reports_every_label() {
    let base = spawn_upstream().await;
    let client = client_for(&base);
    let table = format!(
        "18:05=9638,18:10=9742,18:45={base}/andamentoTreno/S08409/9336,19:00={base}/andamentoTreno/S09218/9544,19:30=1111",
        base = base
    );
    let checker = TrainChecker::new(client, TrainQuery::parse_table(&table).unwrap());

    let report = checker.run().await;

    assert_eq!(report.len(), 5);
    assert_eq!(report.get("18:05"), Some("ritardo 5 min"));
    assert_eq!(report.get("18:10"), Some(NOT_AVAILABLE));
    assert_eq!(report.get("18:45"), Some("in orario"));
    assert_eq!(report.get("19:00"), Some(NOT_AVAILABLE));
    assert_eq!(report.get("19:30"), Some(NOT_AVAILABLE));

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 5);
}

/// Test against the live ViaggiaTreno API with the default train table.
#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_default_trains() {
    let config = Config::default();
    let client = ViaggiaTrenoClient::new(&config).unwrap();
    let checker = TrainChecker::new(client, config.train_queries().unwrap());

    let report = checker.run().await;

    for query in checker.queries() {
        let delay = report.get(&query.label);
        assert!(delay.is_some(), "Missing label {}", query.label);
        println!("{}: {}", query.label, delay.unwrap_or_default());
    }
}
