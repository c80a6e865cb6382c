//! 平台服务费计算
//!
//! 毛金额 × 费率，精确十进制乘积后四舍五入（远离零）到 2 位小数。
//! 费率为零时直接短路返回零。

use crate::{
    domain::{Money, MoneyError, PaymentMethod},
    service::rates::PlatformRates,
};

#[derive(Debug, Clone)]
pub struct FeeCalculator {
    rates: PlatformRates,
}

impl FeeCalculator {
    pub fn new(rates: PlatformRates) -> Self {
        Self { rates }
    }

    pub fn calculate(
        &self,
        gross_amount: Money,
        payment_method: PaymentMethod,
        installments: i32,
    ) -> Result<Money, MoneyError> {
        let rate = self.rates.get_rate(payment_method, installments);

        if rate.is_zero() {
            return Ok(Money::ZERO);
        }

        gross_amount.mul_rate(rate)
    }
}
