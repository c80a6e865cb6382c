//! 支付捕获 API
//!
//! 单一端点 POST /api/v1/payments，外加健康检查。
//! 请求头必须携带 Idempotency-Key；响应体与幂等缓存保持字节一致。

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    app_state::AppState,
    domain::PaymentRequest,
    error::{AppError, MISSING_KEY_DETAIL},
    service::CaptureResponse,
};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
const MAX_KEY_BYTES: usize = 255;

const ENDPOINT_PAYMENTS: &str = "POST /api/v1/payments";

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = PaymentRequest,
    params(
        ("Idempotency-Key" = String, Header, description = "客户端幂等键，最长 255 字节"),
    ),
    responses(
        (status = 201, description = "Payment captured", body = CaptureResponse),
        (status = 400, description = "Validation error or malformed request", body = crate::error_body::ErrorDetailDoc),
        (status = 409, description = "Idempotency conflict or in-flight duplicate", body = crate::error_body::ErrorDetailDoc),
        (status = 500, description = "Internal error", body = crate::error_body::ErrorDetailDoc)
    )
)]
pub async fn create_payment(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CaptureResponse>), AppError> {
    let idempotency_key = match extract_idempotency_key(&headers) {
        Ok(key) => key,
        Err(err) => {
            crate::metrics::count_err(ENDPOINT_PAYMENTS);
            return Err(err);
        }
    };

    let Json(input) = payload.map_err(|rejection| {
        crate::metrics::count_err(ENDPOINT_PAYMENTS);
        AppError::bad_request(rejection.body_text())
    })?;

    match st.capture.process(&input, &idempotency_key).await {
        Ok(response) => {
            crate::metrics::count_ok(ENDPOINT_PAYMENTS);
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => {
            crate::metrics::count_err(ENDPOINT_PAYMENTS);
            Err(err)
        }
    }
}

/// 请求头缺失、为空或超长都视为 400
fn extract_idempotency_key(headers: &HeaderMap) -> Result<String, AppError> {
    let key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request(MISSING_KEY_DETAIL))?;

    if key.len() > MAX_KEY_BYTES {
        return Err(AppError::bad_request(format!(
            "Idempotency-Key header must be at most {} bytes.",
            MAX_KEY_BYTES
        )));
    }

    Ok(key.to_string())
}

// -------- 健康检查 --------

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "OK", body = HealthResponse))
)]
pub async fn api_health() -> Json<HealthResponse> {
    crate::metrics::count_ok("GET /health");
    Json(HealthResponse {
        status: "ok".into(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Healthz {
    pub status: String,
    pub db_ok: bool,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "OK", body = Healthz))
)]
pub async fn healthz(State(st): State<Arc<AppState>>) -> Json<Healthz> {
    crate::metrics::count_ok("GET /healthz");
    let db_ok = crate::infrastructure::db::health_check(&st.pool)
        .await
        .is_ok();
    let status = if db_ok { "ok" } else { "degraded" };
    Json(Healthz {
        status: status.into(),
        db_ok,
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
