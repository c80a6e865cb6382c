//! 净额分账：最大余数法（Largest Remainder / Hamilton method）
//!
//! 全程以整数分计算。先给每个收款人分配精确份额的向下取整部分，
//! 再把截断损失的分（cent）逐一补给小数余量最大的收款人；
//! 余量相同时按输入顺序优先。结果顺序与输入一致，总和精确等于净额。

use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::domain::{Money, Receivable, SplitInput};

struct Allocation {
    floored: i64,
    remainder: Decimal,
}

pub fn calculate(net_amount: Money, splits: &[SplitInput]) -> Vec<Receivable> {
    let total_cents = net_amount.cents();

    let mut allocations = compute_base_allocations(total_cents, splits);
    distribute_leftover(total_cents, &mut allocations);

    splits
        .iter()
        .zip(allocations)
        .map(|(split, allocation)| Receivable {
            recipient_id: split.recipient_id.clone(),
            role: split.role.clone(),
            amount: Money::from_cents(allocation.floored),
        })
        .collect()
}

/// 每个收款人的基础份额（floor）与小数余量
fn compute_base_allocations(total_cents: i64, splits: &[SplitInput]) -> Vec<Allocation> {
    splits
        .iter()
        .map(|split| {
            let exact = Decimal::from(total_cents) * split.percent / Decimal::ONE_HUNDRED;
            let floored_dec = exact.floor();
            Allocation {
                floored: floored_dec.to_i64().unwrap_or(0),
                remainder: exact - floored_dec,
            }
        })
        .collect()
}

/// 把剩余的分补给小数余量最大者；平局时较小的输入下标优先
fn distribute_leftover(total_cents: i64, allocations: &mut [Allocation]) {
    let distributed: i64 = allocations.iter().map(|a| a.floored).sum();
    let leftover = total_cents - distributed;
    debug_assert!(
        leftover >= 0 && (leftover as usize) < allocations.len().max(1),
        "leftover {} outside [0, {})",
        leftover,
        allocations.len()
    );

    let mut order: Vec<usize> = (0..allocations.len()).collect();
    order.sort_by(|&a, &b| {
        allocations[b]
            .remainder
            .cmp(&allocations[a].remainder)
            .then(a.cmp(&b))
    });

    for &index in order.iter().take(leftover.max(0) as usize) {
        allocations[index].floored += 1;
    }
}
