use std::sync::Arc;

use crate::{
    config::Config,
    infrastructure::db::PgPool,
    service::{CaptureCoordinator, PlatformRates},
};

/// 应用状态
/// 启动时用具体服务句柄显式组装，无全局注册表
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub capture: Arc<CaptureCoordinator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Arc<Config>) -> Self {
        let rates = PlatformRates::new(&config.rates);
        let capture = Arc::new(CaptureCoordinator::new(pool.clone(), rates));
        Self {
            pool,
            capture,
            config,
        }
    }
}
