//! End-to-end tests of `GET /balance` against a mock provider.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_live_then_cached() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let provider = common::start_programmable_provider(move |head| {
        recorder.lock().unwrap().push(head);
        async { common::Reply::json(200, r#"{"amount": 1000, "currency": "USD"}"#) }
    })
    .await;
    let service = common::start_service(common::test_config(&provider)).await;
    let client = common::client();

    let res = client.get(service.url("/balance")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["amount"].as_f64(), Some(1000.0));
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["source"], "LIVE");
    let fetched_at = body["fetched_at"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let body: Value = client
            .get(service.url("/balance"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["source"], "CACHED");
        assert_eq!(body["fetched_at"], fetched_at.as_str());
    }
    assert_eq!(provider.calls(), 1);

    let requests = seen.lock().unwrap();
    let head = requests[0].to_ascii_lowercase();
    assert!(head.starts_with("get /api/v2/accounts/acc-123/balance "));
    assert!(head.contains("authorization: bearer test-token"));
    assert!(head.contains("accept: application/json"));
}

#[tokio::test]
async fn test_account_balance_document() {
    let provider = common::start_fixed_provider(
        200,
        r#"{"clearedBalance": {"currency": "GBP", "minorUnits": 123456},
            "effectiveBalance": {"currency": "GBP", "minorUnits": 100000}}"#,
    )
    .await;
    let service = common::start_service(common::test_config(&provider)).await;

    let body: Value = common::client()
        .get(service.url("/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["amount"].as_f64(), Some(1234.56));
    assert_eq!(body["currency"], "GBP");
    assert_eq!(body["minor_units"], 123456);
    assert_eq!(body["display"], "£1,234.56");
}

#[tokio::test]
async fn test_overdrawn_balance_keeps_sign() {
    let provider = common::start_fixed_provider(
        200,
        r#"{"clearedBalance": {"currency": "GBP", "minorUnits": -4200}}"#,
    )
    .await;
    let service = common::start_service(common::test_config(&provider)).await;

    let body: Value = common::client()
        .get(service.url("/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["amount"].as_f64(), Some(-42.0));
    assert_eq!(body["display"], "-£42.00");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let provider = common::start_fixed_provider(200, r#"{"amount": 1, "currency": "EUR"}"#).await;
    let service = common::start_service(common::test_config(&provider)).await;

    let res = common::client()
        .get(service.url("/balance"))
        .header("Origin", "http://dashboard.local")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert!(res.headers().contains_key("x-request-id"));
}
