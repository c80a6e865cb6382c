//! 日志系统配置模块
//! 支持结构化 JSON 与文本两种输出格式

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::LoggingConfig;

/// 初始化日志系统；RUST_LOG 存在时优先于配置级别
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "paycore={},tower_http=debug,sqlx=warn",
            config.level
        ))
    });

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// 简化初始化（使用默认配置）
pub fn init_default_logging() {
    let config = LoggingConfig::default();
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
    });
}
