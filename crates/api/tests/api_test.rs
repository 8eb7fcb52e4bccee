//! Router tests over a seeded memory store.

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use futures::StreamExt;
use http_body_util::BodyExt;
use koperasi_api::{AppState, create_router};
use koperasi_core::member::CreateMemberInput;
use koperasi_core::settings::CooperativeSettings;
use koperasi_db::{SettingsHandle, StoreClient, seed::seed_defaults};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> (Router, AppState) {
    let store = StoreClient::memory(5);
    seed_defaults(&store).await.unwrap();
    let state = AppState::new(store, SettingsHandle::new(CooperativeSettings::default()));
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

async fn account_id(app: &Router, code: &str) -> String {
    let (_, body) = send(app, "GET", "/api/v1/accounts", None).await;
    body["accounts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["kode"] == code)
        .map(|a| a["id"].as_str().unwrap().to_string())
        .unwrap()
}

async fn register(app: &Router, number: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/members",
        Some(json!({
            "name": "Ani",
            "member_number": number,
            "unit": "Produksi",
            "join_date": "2023-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[rstest]
#[case("/api/v1/accounts/tree")]
#[case("/api/v1/reports/balances")]
#[case("/api/v1/reports/trial-balance")]
#[case("/api/v1/reports/balance-sheet")]
#[case("/api/v1/reports/shu")]
#[case("/api/v1/reports/drift")]
#[case("/api/v1/batch/runs")]
#[case("/api/v1/archives")]
#[case("/api/v1/settings")]
#[tokio::test]
async fn test_read_endpoints_serve_fresh_store(#[case] uri: &str) {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
}

#[tokio::test]
async fn test_posted_entry_shows_in_reports() {
    let (app, _) = test_app().await;
    let kas = account_id(&app, "1-1100").await;
    let sukarela = account_id(&app, "2-1100").await;

    let (status, entry) = send(
        &app,
        "POST",
        "/api/v1/journal",
        Some(json!({
            "description": "Setoran sukarela",
            "lines": [
                { "account_id": kas, "debit": "500000" },
                { "account_id": sukarela, "credit": "500000" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["lines"].as_array().unwrap().len(), 2);

    let (_, kas_account) = send(&app, "GET", &format!("/api/v1/accounts/{kas}"), None).await;
    assert_eq!(decimal(&kas_account["saldo"]), dec!(500000));

    let (_, trial) = send(&app, "GET", "/api/v1/reports/trial-balance", None).await;
    assert_eq!(trial["totals"]["is_balanced"], true);
    assert_eq!(decimal(&trial["totals"]["total_debit"]), dec!(500000));

    let (_, drift) = send(&app, "GET", "/api/v1/reports/drift", None).await;
    assert_eq!(drift["is_consistent"], true);

    let (_, page) = send(&app, "GET", "/api/v1/journal?per_page=10", None).await;
    assert_eq!(page["meta"]["total"], 1);
}

#[tokio::test]
async fn test_unbalanced_entry_is_rejected() {
    let (app, _) = test_app().await;
    let kas = account_id(&app, "1-1100").await;
    let sukarela = account_id(&app, "2-1100").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/journal",
        Some(json!({
            "description": "Salah input",
            "lines": [
                { "account_id": kas, "debit": "500000" },
                { "account_id": sukarela, "credit": "400000" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNBALANCED_TRANSACTION");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_member_savings_and_quote() {
    let (app, _) = test_app().await;
    let member = register(&app, "A-001").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/members/{member}/savings"),
        Some(json!({ "kind": "pokok", "direction": "setor", "amount": "1000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&body["transaction"]["saldoSetelah"]), dec!(1000000));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/members/{member}/savings"),
        Some(json!({ "kind": "pokok", "direction": "tarik", "amount": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "POKOK_WITHDRAWAL");

    let (status, quote) = send(
        &app,
        "POST",
        "/api/v1/contracts/quote",
        Some(json!({ "principal": "10000000", "tenor": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&quote["installment"]), dec!(958333.33));
    assert_eq!(decimal(&quote["sale_price"]), dec!(11500000));

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/members/{member}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "MEMBER_HAS_OBLIGATIONS");
}

#[tokio::test]
async fn test_unknown_member_is_not_found() {
    let (app, _) = test_app().await;
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/members/0190a7c4-0000-7000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "MEMBER_NOT_FOUND");
}

#[tokio::test]
async fn test_batch_runs_once_per_period() {
    let (app, _) = test_app().await;
    register(&app, "A-001").await;

    let request = json!({ "as_of": "2026-05-31" });
    let (status, run) = send(&app, "POST", "/api/v1/batch/runs", Some(request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(run["periode"], "2026-05");
    assert_eq!(decimal(&run["total"]["simpananWajib"]), dec!(100000));

    let (status, body) = send(&app, "POST", "/api/v1/batch/runs", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BATCH_ALREADY_RUN");

    let (status, _) = send(&app, "GET", "/api/v1/batch/runs/2026-05", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/v1/batch/runs/2026-06", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, archives) = send(&app, "GET", "/api/v1/archives", None).await;
    let archives = archives["archives"].as_array().unwrap();
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0]["dataLaporan"][0]["noAnggota"], "A-001");
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let (app, state) = test_app().await;
    let mut settings = serde_json::to_value(CooperativeSettings::default()).unwrap();
    settings["plafonMultiplier"] = json!("0");

    let (status, body) = send(&app, "PUT", "/api/v1/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SETTINGS");
    assert_eq!(
        state.settings.handle().current().await.ceiling_multiplier,
        dec!(3)
    );

    let mut settings = serde_json::to_value(CooperativeSettings::default()).unwrap();
    settings["simpananWajib"] = json!("125000");
    let (status, body) = send(&app, "PUT", "/api/v1/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["simpananWajib"]), dec!(125000));

    let (_, current) = send(&app, "GET", "/api/v1/settings", None).await;
    assert_eq!(decimal(&current["simpananWajib"]), dec!(125000));
}

#[tokio::test]
async fn test_event_stream_delivers_commits() {
    let (app, state) = test_app().await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "text/event-stream"
    );

    state
        .members
        .create(CreateMemberInput {
            name: "Budi".to_string(),
            member_number: "A-002".to_string(),
            unit: "Gudang".to_string(),
            join_date: chrono_date(),
        })
        .await
        .unwrap();

    let mut frames = response.into_body().into_data_stream();
    let frame = frames.next().await.unwrap().unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: change"));
    assert!(text.contains("anggota"));
    assert!(text.contains("A-002"));
}

fn chrono_date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}
