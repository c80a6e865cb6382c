//! HTTP 边界集成测试
//!
//! 这些用例全部在事务打开之前短路（请求头缺失、请求体不合法、
//! 业务校验失败），因此使用惰性连接池即可运行，无需数据库。

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_payment(payload: Option<&Value>, key: Option<&str>) -> (StatusCode, Value) {
    let app = common::test_app();

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/payments")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("Idempotency-Key", key);
    }

    let body = match payload {
        Some(value) => Body::from(value.to_string()),
        None => Body::from("not-json"),
    };

    let response = app
        .oneshot(builder.body(body).expect("request build"))
        .await
        .expect("request dispatch");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Test 1: 缺少 Idempotency-Key 请求头返回 400 与固定文案
#[tokio::test]
async fn test_missing_idempotency_key_returns_400() {
    let payload = common::base_payload();
    let (status, body) = post_payment(Some(&payload), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Idempotency-Key header is required.");
}

/// Test 2: 非 JSON 请求体返回 400
#[tokio::test]
async fn test_malformed_body_returns_400() {
    let (status, body) = post_payment(None, Some("malformed-body-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

/// Test 3: 金额超过 2 位小数返回 400
#[tokio::test]
async fn test_amount_with_three_decimals_returns_400() {
    let mut payload = common::base_payload();
    payload["amount"] = json!("10.001");
    let (status, _) = post_payment(Some(&payload), Some("bad-amount-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Test 4: 负数金额返回 400，错误映射包含 amount 字段
#[tokio::test]
async fn test_negative_amount_returns_field_error() {
    let mut payload = common::base_payload();
    payload["amount"] = json!("-10.00");
    let (status, body) = post_payment(Some(&payload), Some("neg-amount-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("amount").is_some());
}

/// Test 5: 零金额返回 400
#[tokio::test]
async fn test_zero_amount_returns_field_error() {
    let mut payload = common::base_payload();
    payload["amount"] = json!("0.00");
    let (status, body) = post_payment(Some(&payload), Some("zero-amount-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("amount").is_some());
}

/// Test 6: 不支持的币种返回 400 currency 字段错误
#[tokio::test]
async fn test_invalid_currency_returns_field_error() {
    let mut payload = common::base_payload();
    payload["currency"] = json!("USD");
    let (status, body) = post_payment(Some(&payload), Some("usd-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("currency").is_some());
}

/// Test 7: PIX 多期返回 400 installments 字段错误
#[tokio::test]
async fn test_pix_with_installments_returns_field_error() {
    let mut payload = common::base_payload();
    payload["payment_method"] = json!("pix");
    payload["installments"] = json!(3);
    let (status, body) = post_payment(Some(&payload), Some("pix-inst-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("installments").is_some());
}

/// Test 8: 卡 13 期 / 0 期都返回 400
#[tokio::test]
async fn test_card_installment_bounds_return_field_error() {
    for bad in [0, 13] {
        let mut payload = common::base_payload();
        payload["installments"] = json!(bad);
        let (status, body) = post_payment(Some(&payload), Some("card-bounds-key")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "installments={}", bad);
        assert!(body.get("installments").is_some());
    }
}

/// Test 9: 六个分账条目返回 400 splits 字段错误
#[tokio::test]
async fn test_six_splits_returns_field_error() {
    let mut payload = common::base_payload();
    let splits: Vec<Value> = (0..6)
        .map(|i| json!({"recipient_id": format!("r{}", i), "role": "affiliate", "percent": 10}))
        .collect();
    payload["splits"] = json!(splits);
    let (status, body) = post_payment(Some(&payload), Some("six-splits-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("splits").is_some());
}

/// Test 10: 百分比加总 80 返回 400 splits 字段错误
#[tokio::test]
async fn test_splits_not_summing_100_returns_field_error() {
    let mut payload = common::base_payload();
    payload["splits"] = json!([
        {"recipient_id": "a", "role": "producer", "percent": 50},
        {"recipient_id": "b", "role": "affiliate", "percent": 30}
    ]);
    let (status, body) = post_payment(Some(&payload), Some("sum-80-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("splits").is_some());
}

/// Test 11: 空分账列表返回 400
#[tokio::test]
async fn test_empty_splits_returns_field_error() {
    let mut payload = common::base_payload();
    payload["splits"] = json!([]);
    let (status, body) = post_payment(Some(&payload), Some("empty-splits-key")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("splits").is_some());
}

/// Test 12: 健康检查端点可用
#[tokio::test]
async fn test_health_endpoint() {
    let app = common::test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request dispatch");

    assert_eq!(response.status(), StatusCode::OK);
}
