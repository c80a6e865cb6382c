//! Paycore 主入口
//! 支付捕获与分账服务

use std::sync::Arc;

use anyhow::{Context, Result};
use paycore::{api, app_state::AppState, config::Config, infrastructure};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    // 2. 加载并验证配置（CONFIG_PATH 指向 TOML 文件时优先）
    let config = Config::from_env_and_file(std::env::var("CONFIG_PATH").ok().as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志
    infrastructure::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Starting Paycore payment capture service");

    // 4. 连接数据库
    let pool = infrastructure::db::init_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // 5. 运行数据库迁移（可通过 SKIP_MIGRATIONS=1 跳过）
    if std::env::var("SKIP_MIGRATIONS").ok().as_deref() == Some("1") {
        tracing::info!("SKIP_MIGRATIONS=1, skipping database migrations");
    } else {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Database migrations failed")?;
        tracing::info!("Database migrations completed");
    }

    // 6. 组装应用状态与路由
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(pool, config.clone()));
    let app = api::routes(state);

    // 7. 启动服务
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
