//! 集成测试共享辅助
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use paycore::{api, app_state::AppState, config::Config, infrastructure};
use serde_json::{json, Value};

/// 构建不触发真实数据库连接的应用（惰性连接池）
///
/// 校验失败、请求头缺失等在事务打开前短路的路径可以直接跑通。
pub fn test_app() -> Router {
    let config = Config::from_env().expect("Failed to load config");
    let pool = infrastructure::db::init_pool_lazy(&config.database)
        .expect("Failed to build lazy pool");
    let state = Arc::new(AppState::new(pool, Arc::new(config)));
    api::routes(state)
}

/// 连接真实测试数据库并跑迁移（需要 TEST_DATABASE_URL）
pub async fn test_state() -> Arc<AppState> {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/paycore_test".into());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create test database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let mut config = Config::from_env().expect("Failed to load config");
    config.database.url = database_url;
    Arc::new(AppState::new(pool, Arc::new(config)))
}

/// 基准合法请求体，字段可在调用处覆盖
pub fn base_payload() -> Value {
    json!({
        "amount": "297.00",
        "currency": "BRL",
        "payment_method": "card",
        "installments": 3,
        "splits": [
            {"recipient_id": "producer_1", "role": "producer", "percent": 70},
            {"recipient_id": "affiliate_9", "role": "affiliate", "percent": 30}
        ]
    })
}

/// 每次调用生成一个新的幂等键，保证测试可重复执行
pub fn fresh_key(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
