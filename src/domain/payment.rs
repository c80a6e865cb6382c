//! 支付领域模型：请求输入、支付方式与分账结果

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::money::Money;

/// 支付方式，线上取值为小写 "pix" / "card"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Card => "card",
        }
    }
}

/// 支付状态：当前版本只有单一终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Captured,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Captured => "captured",
        }
    }
}

/// 单个分账条目输入
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SplitInput {
    #[schema(example = "producer_1")]
    pub recipient_id: String,
    #[schema(example = "producer")]
    pub role: String,
    /// 分账百分比，列表整体必须恰好加总为 100
    #[schema(value_type = f64, example = 70)]
    pub percent: Decimal,
}

/// 捕获请求输入（HTTP 请求体反序列化的目标）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// 毛金额，字符串或数字均可，最多 2 位小数
    #[schema(value_type = String, example = "297.00")]
    pub amount: Money,
    #[schema(example = "BRL")]
    pub currency: String,
    pub payment_method: PaymentMethod,
    #[serde(default = "default_installments")]
    #[schema(example = 3)]
    pub installments: i32,
    pub splits: Vec<SplitInput>,
}

fn default_installments() -> i32 {
    1
}

/// 分账计算结果：每个收款人应得的净额份额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Receivable {
    pub recipient_id: String,
    pub role: String,
    #[schema(value_type = String, example = "189.21")]
    pub amount: Money,
}
