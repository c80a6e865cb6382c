//! 请求业务规则校验
//!
//! 所有规则都会执行，错误按字段累积为映射；同一字段只保留最先命中的规则。
//! 校验发生在事务打开之前，失败时不会触碰数据库。

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    domain::{PaymentMethod, PaymentRequest},
    error::AppError,
};

const SUPPORTED_CURRENCIES: &[&str] = &["BRL"];
const MAX_INSTALLMENTS: i32 = 12;
const MIN_SPLITS: usize = 1;
const MAX_SPLITS: usize = 5;

pub fn validate(input: &PaymentRequest) -> Result<(), AppError> {
    let mut errors: BTreeMap<String, String> = BTreeMap::new();

    if !input.amount.is_positive() {
        insert_once(
            &mut errors,
            "amount",
            "amount must be greater than zero".into(),
        );
    }

    if !SUPPORTED_CURRENCIES.contains(&input.currency.to_uppercase().as_str()) {
        insert_once(
            &mut errors,
            "currency",
            format!("currency must be one of: {}", SUPPORTED_CURRENCIES.join(", ")),
        );
    }

    match input.payment_method {
        PaymentMethod::Pix => {
            if input.installments != 1 {
                insert_once(
                    &mut errors,
                    "installments",
                    "pix payments accept a single installment only".into(),
                );
            }
        }
        PaymentMethod::Card => {
            if input.installments < 1 || input.installments > MAX_INSTALLMENTS {
                insert_once(
                    &mut errors,
                    "installments",
                    format!("installments must be between 1 and {}", MAX_INSTALLMENTS),
                );
            }
        }
    }

    if input.splits.len() < MIN_SPLITS || input.splits.len() > MAX_SPLITS {
        insert_once(
            &mut errors,
            "splits",
            format!(
                "splits must contain between {} and {} entries",
                MIN_SPLITS, MAX_SPLITS
            ),
        );
    }

    if input
        .splits
        .iter()
        .any(|s| s.percent <= Decimal::ZERO || s.percent > Decimal::ONE_HUNDRED)
    {
        insert_once(
            &mut errors,
            "splits",
            "each split percent must be greater than 0 and at most 100".into(),
        );
    }

    let percent_sum: Decimal = input.splits.iter().map(|s| s.percent).sum();
    if percent_sum != Decimal::ONE_HUNDRED {
        insert_once(
            &mut errors,
            "splits",
            format!("split percents must sum to exactly 100, got {}", percent_sum),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::BusinessValidation(errors))
    }
}

fn insert_once(errors: &mut BTreeMap<String, String>, field: &str, message: String) {
    errors.entry(field.to_string()).or_insert(message);
}
