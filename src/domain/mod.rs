//! Domain 模块
//!
//! 包含核心业务类型：金额、支付方式、分账输入与结果

pub mod money;
pub mod payment;

// 重新导出常用类型
pub use money::{Money, MoneyError};
pub use payment::{PaymentMethod, PaymentRequest, PaymentStatus, Receivable, SplitInput};
