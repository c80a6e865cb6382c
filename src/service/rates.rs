//! 平台费率表
//!
//! (支付方式, 分期数) → 费率 的纯函数映射。费率取值固定于启动时，
//! 但通过配置注入，测试可以整体替换。

use rust_decimal::Decimal;

use crate::{config::RatesConfig, domain::PaymentMethod};

#[derive(Debug, Clone)]
pub struct PlatformRates {
    pix_rate: Decimal,
    card_base: Decimal,
    card_installment_base: Decimal,
    card_installment_extra: Decimal,
}

impl PlatformRates {
    pub fn new(config: &RatesConfig) -> Self {
        Self {
            pix_rate: config.pix_rate,
            card_base: config.card_base,
            card_installment_base: config.card_installment_base,
            card_installment_extra: config.card_installment_extra,
        }
    }

    /// PIX → 0；卡 1x → 基础费率；卡 2-12x → 分期基础 + 每多一期的额外费率
    pub fn get_rate(&self, payment_method: PaymentMethod, installments: i32) -> Decimal {
        match payment_method {
            PaymentMethod::Pix => self.pix_rate,
            PaymentMethod::Card => {
                if installments == 1 {
                    self.card_base
                } else {
                    let extra_installments = Decimal::from(installments - 1);
                    self.card_installment_base + self.card_installment_extra * extra_installments
                }
            }
        }
    }
}

impl Default for PlatformRates {
    fn default() -> Self {
        Self::new(&RatesConfig::default())
    }
}
