//! 幂等控制：payload 的 SHA-256 规范哈希 + 三路握手
//!
//! 流程：
//! - 新键：创建 processing 记录，正常处理，提交前回写响应
//! - 已有键 + 相同哈希 + completed：返回缓存响应
//! - 已有键 + 相同哈希 + processing：并发重复请求，调用方拒绝执行
//! - 已有键 + 不同哈希：冲突

use serde_json::json;
use sha2::{Digest, Sha256};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    domain::PaymentRequest,
    repository::{self, idempotency::STATUS_COMPLETED, IdempotencyRecord},
};

/// check 的三路（加在途共四路）结果
#[derive(Debug)]
pub enum IdempotencyOutcome {
    /// 首次出现，已写入 processing 记录
    FirstTime(IdempotencyRecord),
    /// 相同键相同 payload，返回已缓存的响应体
    Replay(serde_json::Value),
    /// 相同键相同 payload，但前一个请求尚未提交
    InFlight,
    /// 相同键携带了不同的 payload
    Conflict,
}

/// 对已校验输入做规范化 JSON 序列化后取 SHA-256
///
/// 规范化规则：对象键按字典序排列、金额固定 2 位小数字符串、
/// 百分比去除末尾零、无多余空白。结构相同的输入哈希必然一致，
/// 任一字段不同则哈希不同。
pub fn hash_payload(input: &PaymentRequest) -> String {
    let splits: Vec<serde_json::Value> = input
        .splits
        .iter()
        .map(|s| {
            json!({
                "percent": s.percent.normalize().to_string(),
                "recipient_id": s.recipient_id,
                "role": s.role,
            })
        })
        .collect();

    // serde_json 的 Map 底层是 BTreeMap，键序列化时天然按字典序输出
    let canonical = json!({
        "amount": input.amount.to_string(),
        "currency": input.currency.to_uppercase(),
        "installments": input.installments,
        "payment_method": input.payment_method.as_str(),
        "splits": splits,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// 在调用方事务内执行握手；行锁由 get_by_key_for_update 获取
pub async fn check(
    conn: &mut PgConnection,
    key: &str,
    payload_hash: &str,
) -> Result<IdempotencyOutcome, sqlx::Error> {
    let existing = repository::idempotency::get_by_key_for_update(conn, key).await?;

    let record = match existing {
        None => {
            let new_record = repository::idempotency::create(conn, key, payload_hash).await?;
            return Ok(IdempotencyOutcome::FirstTime(new_record));
        }
        Some(record) => record,
    };

    if record.payload_hash != payload_hash {
        return Ok(IdempotencyOutcome::Conflict);
    }

    if record.status == STATUS_COMPLETED {
        if let Some(cached) = record.response_data {
            return Ok(IdempotencyOutcome::Replay(cached));
        }
    }

    // 相同键相同哈希但仍是 processing：并发请求还没提交
    Ok(IdempotencyOutcome::InFlight)
}

/// 在提交前把响应体回写到幂等记录（FirstTime 路径必经）
pub async fn save_response(
    conn: &mut PgConnection,
    record_id: Uuid,
    response_data: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    repository::idempotency::mark_completed(conn, record_id, response_data).await
}
