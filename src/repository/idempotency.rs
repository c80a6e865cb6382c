//! 幂等记录存取
//!
//! 所有函数都要求运行在调用方已打开的事务连接上；
//! `get_by_key_for_update` 获取的行级排它锁持续到事务结束。

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, FromRow)]
pub struct IdempotencyRecord {
    pub id: Uuid,
    pub key: String,
    pub payload_hash: String,
    pub status: String,
    pub response_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// 悲观锁读取（SELECT ... FOR UPDATE），锁持续到事务提交或回滚
pub async fn get_by_key_for_update(
    conn: &mut PgConnection,
    key: &str,
) -> Result<Option<IdempotencyRecord>, sqlx::Error> {
    let rec = sqlx::query_as::<_, IdempotencyRecord>(
        r#"
        SELECT id, key, payload_hash, status, response_data, created_at
        FROM idempotency_records
        WHERE key = $1
        FOR UPDATE
        "#,
    )
    .bind(key)
    .fetch_optional(conn)
    .await?;
    Ok(rec)
}

pub async fn create(
    conn: &mut PgConnection,
    key: &str,
    payload_hash: &str,
) -> Result<IdempotencyRecord, sqlx::Error> {
    let rec = sqlx::query_as::<_, IdempotencyRecord>(
        r#"
        INSERT INTO idempotency_records (id, key, payload_hash, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, key, payload_hash, status, response_data, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(key)
    .bind(payload_hash)
    .bind(STATUS_PROCESSING)
    .fetch_one(conn)
    .await?;
    Ok(rec)
}

pub async fn mark_completed(
    conn: &mut PgConnection,
    id: Uuid,
    response_data: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE idempotency_records
        SET status = $2, response_data = $3
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(STATUS_COMPLETED)
    .bind(response_data)
    .execute(conn)
    .await?;
    Ok(())
}
