//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rates: RatesConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 平台费率配置
///
/// TOML 文件中以字符串表示（如 pix_rate = "0"），避免浮点解析。
/// 启动后注入 PlatformRates，测试可以整体替换。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    pub pix_rate: Decimal,
    pub card_base: Decimal,
    pub card_installment_base: Decimal,
    pub card_installment_extra: Decimal,
}

fn env_decimal(key: &str, default: Decimal) -> Decimal {
    std::env::var(key)
        .ok()
        .and_then(|s| Decimal::from_str_exact(s.trim()).ok())
        .filter(|v| *v >= Decimal::ZERO && *v <= Decimal::ONE)
        .unwrap_or(default)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://postgres@localhost:5432/paycore".into()),
            max_connections: std::env::var("DB_MAX_CONNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            min_connections: std::env::var("DB_MIN_CONNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            acquire_timeout_secs: std::env::var("DB_ACQ_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            // PIX 零费率；卡 1x 3.99%；分期基础 4.99% + 每期额外 2%
            pix_rate: env_decimal("PIX_RATE", Decimal::ZERO),
            card_base: env_decimal("CARD_BASE_RATE", Decimal::new(399, 4)),
            card_installment_base: env_decimal("CARD_INSTALLMENT_BASE_RATE", Decimal::new(499, 4)),
            card_installment_extra: env_decimal("CARD_INSTALLMENT_EXTRA_RATE", Decimal::new(2, 2)),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            rates: RatesConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            anyhow::bail!("DATABASE_URL must start with postgres:// or postgresql://");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        for (name, rate) in [
            ("pix_rate", self.rates.pix_rate),
            ("card_base", self.rates.card_base),
            ("card_installment_base", self.rates.card_installment_base),
            ("card_installment_extra", self.rates.card_installment_extra),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                anyhow::bail!("rate {} must be within [0, 1], got {}", name, rate);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_config_from_env() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.database.max_connections, 16);
        assert_eq!(config.rates.card_base, Decimal::new(399, 4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgres://test@localhost/test"
max_connections = 20
min_connections = 5
acquire_timeout_secs = 30
idle_timeout_secs = 600

[server]
bind_addr = "0.0.0.0:9090"

[logging]
level = "info"
format = "text"

[rates]
pix_rate = "0"
card_base = "0.0450"
card_installment_base = "0.0499"
card_installment_extra = "0.02"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.server.bind_addr, "0.0.0.0:9090");
        assert_eq!(config.rates.card_base, Decimal::new(450, 4));
    }

    #[test]
    fn test_config_rejects_bad_rate() {
        let mut config = Config::from_env().unwrap();
        config.rates.card_base = Decimal::new(15, 1); // 1.5 超出 [0, 1]
        assert!(config.validate().is_err());
    }
}
