//! Paycore - 支付捕获与分账服务后端
//!
//! 幂等写入、精确分账、事务内 outbox

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod error_body;
pub mod infrastructure;
pub mod metrics;
pub mod repository;
pub mod service;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::AppError;

pub mod prelude {
    pub use crate::{
        app_state::AppState,
        domain::{Money, PaymentMethod, PaymentRequest, Receivable, SplitInput},
        error::AppError,
        service::{CaptureCoordinator, CaptureResponse},
    };
}
