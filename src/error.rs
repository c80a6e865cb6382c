//! 领域错误到 HTTP 响应的统一映射
//!
//! 错误以带标签的枚举表达，HTTP 状态码和响应体形态只在这里决定：
//! - 业务校验错误返回 `{field: message}` 映射
//! - 其余错误返回 `{"detail": "..."}`

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::money::MoneyError;

pub const CONFLICT_DETAIL: &str = "Idempotency-Key already used with a different payload.";
pub const IN_FLIGHT_DETAIL: &str =
    "A concurrent request with this Idempotency-Key is still being processed.";
pub const MISSING_KEY_DETAIL: &str = "Idempotency-Key header is required.";
const INTERNAL_DETAIL: &str = "Internal server error.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// 业务规则校验失败，携带 字段→消息 映射
    BusinessValidation(BTreeMap<String, String>),
    /// 相同幂等键携带了不同的请求体
    IdempotencyConflict,
    /// 相同幂等键的并发请求仍在处理中
    DuplicateInFlight,
    /// 请求本身不合法（缺少请求头、JSON 解析失败、金额格式错误等）
    BadRequest(String),
    /// 其他内部失败，细节只进日志不出网
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BusinessValidation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::IdempotencyConflict | AppError::DuplicateInFlight => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::BusinessValidation(errors) => {
                tracing::info!(?errors, "business_validation_failed");
                (status, Json(errors)).into_response()
            }
            AppError::IdempotencyConflict => {
                (status, Json(json!({ "detail": CONFLICT_DETAIL }))).into_response()
            }
            AppError::DuplicateInFlight => {
                (status, Json(json!({ "detail": IN_FLIGHT_DETAIL }))).into_response()
            }
            AppError::BadRequest(msg) => {
                (status, Json(json!({ "detail": msg }))).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal_error");
                (status, Json(json!({ "detail": INTERNAL_DETAIL }))).into_response()
            }
        }
    }
}

// 从 SQLx 错误转换
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) => {
                // 23505: PostgreSQL unique_violation。
                // 本服务的唯一约束都在幂等键上（idempotency_records.key /
                // payments.idempotency_key），约束冲突即幂等冲突。
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::IdempotencyConflict;
                }
                AppError::internal(format!("Database error: {}", db_err))
            }
            _ => AppError::internal(format!("Database operation failed: {}", err)),
        }
    }
}

// 从 serde_json 错误转换（响应缓存序列化/回放反序列化失败）
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON serialization error: {}", err))
    }
}

// 从金额错误转换
impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: 状态码映射
    #[test]
    fn test_status_mapping() {
        let mut errors = BTreeMap::new();
        errors.insert("amount".to_string(), "must be positive".to_string());

        assert_eq!(
            AppError::BusinessValidation(errors).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::IdempotencyConflict.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::DuplicateInFlight.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::bad_request("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// Test 2: 金额错误归入 400
    #[test]
    fn test_money_error_conversion() {
        let err: AppError = MoneyError::Malformed("10.001".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
