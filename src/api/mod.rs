//! API 路由与 OpenAPI 文档

use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::app_state::AppState;

pub mod payment_api;

#[derive(OpenApi)]
#[openapi(
    paths(
        payment_api::create_payment,
        payment_api::api_health,
        payment_api::healthz,
    ),
    components(
        schemas(
            crate::domain::payment::PaymentRequest,
            crate::domain::payment::SplitInput,
            crate::domain::payment::PaymentMethod,
            crate::domain::payment::Receivable,
            crate::service::capture::CaptureResponse,
            crate::service::capture::OutboxEventSummary,
            payment_api::HealthResponse,
            payment_api::Healthz,
            crate::error_body::ErrorDetailDoc,
        )
    ),
    tags(
        (name = "Paycore API", description = "Payment capture with split and idempotency")
    )
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    crate::metrics::count_ok("GET /openapi.json");
    Json(ApiDoc::openapi())
}

async fn metrics_text() -> impl IntoResponse {
    crate::metrics::render_prometheus()
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/payments", post(payment_api::create_payment))
        .route("/health", get(payment_api::api_health))
        .route("/healthz", get(payment_api::healthz))
        .route("/metrics", get(metrics_text))
        .route("/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
