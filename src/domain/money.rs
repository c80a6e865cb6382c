//! 货币金额类型：以“分”（minor units）为单位的定点数
//!
//! 所有货币运算都在整数分上进行，费率乘法通过 rust_decimal 精确计算，
//! 任何环节都不经过 IEEE-754 浮点数。

use std::fmt;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// NUMERIC(12,2) 上限：整数部分最多 10 位，即分值绝对值 < 10^12
const MAX_ABS_CENTS: i64 = 1_000_000_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("malformed amount: {0}")]
    Malformed(String),
    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// 以分为单位的金额，标度固定为 2
///
/// 内部为有符号整数；请求金额必须为正由业务校验保证，
/// 类型本身允许中间运算出现负值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// 从十进制值构造，超过 2 位小数或超出 NUMERIC(12,2) 范围时报错
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let normalized = value.normalize();
        if normalized.scale() > 2 {
            return Err(MoneyError::Malformed(format!(
                "at most 2 fractional digits allowed, got {}",
                value
            )));
        }
        let cents = normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.normalize().to_i64())
            .ok_or_else(|| MoneyError::OutOfRange(value.to_string()))?;
        if cents.abs() >= MAX_ABS_CENTS {
            return Err(MoneyError::OutOfRange(value.to_string()));
        }
        Ok(Money(cents))
    }

    /// 从十进制字符串构造（如 "297.00"）
    pub fn from_decimal_str(s: &str) -> Result<Self, MoneyError> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|e| MoneyError::Malformed(format!("{}: {}", s, e)))?;
        Self::from_decimal(value)
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// 金额 × 费率，精确十进制乘积后按“四舍五入远离零”规整到 2 位小数
    pub fn mul_rate(&self, rate: Decimal) -> Result<Money, MoneyError> {
        let product = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or_else(|| MoneyError::OutOfRange(format!("{} * {}", self, rate)))?;
        let rounded = product.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self::from_decimal(rounded)
    }
}

/// 始终输出恰好 2 位小数，例如 "270.30"、"0.04"、"-0.50"
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// 反序列化接受字符串或 JSON 数字（客户端两种写法都存在）
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
