//! SQLx Postgres 连接池初始化与健康检查
//!
//! 用法：
//! let pool = init_pool(&config.database).await?;
//! health_check(&pool).await?;

use std::time::Duration;

use crate::config::DatabaseConfig;

pub type PgPool = sqlx::Pool<sqlx::Postgres>;

/// 按配置初始化连接池；取用前验证连接有效性
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool_opts = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .test_before_acquire(true);

    let pool = pool_opts.connect(&config.url).await.map_err(|e| {
        tracing::error!("Failed to connect to Postgres: {}", e);
        e
    })?;

    health_check(&pool).await?;

    Ok(pool)
}

/// 惰性连接池：不在启动时触发实际连接，便于无数据库环境联调
pub fn init_pool_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_lazy(&config.url)?;
    Ok(pool)
}

/// 使用 SELECT CURRENT_TIMESTAMP 验证连接与数据库响应
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let _: (chrono::DateTime<chrono::Utc>,) = sqlx::query_as("SELECT CURRENT_TIMESTAMP")
        .fetch_one(pool)
        .await?;
    Ok(())
}
