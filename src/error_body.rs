use serde::Serialize;
use utoipa::ToSchema;

/// 错误响应文档结构（仅用于 OpenAPI 展示）
#[derive(Serialize, ToSchema)]
pub struct ErrorDetailDoc {
    #[schema(example = "Idempotency-Key header is required.")]
    pub detail: String,
}
