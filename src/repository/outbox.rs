//! Outbox 事件写入
//!
//! 事件行与支付在同一事务内提交，这是 outbox 模式的全部意义；
//! 状态推进到 published 属于外部发布器，这里只会写入 pending。

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, FromRow)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

pub async fn enqueue(
    conn: &mut PgConnection,
    event_type: &str,
    payload: &serde_json::Value,
) -> Result<OutboxEvent, sqlx::Error> {
    let rec = sqlx::query_as::<_, OutboxEvent>(
        r#"
        INSERT INTO outbox_events (id, event_type, payload, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, event_type, payload, status, created_at, published_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event_type)
    .bind(payload)
    .bind(STATUS_PENDING)
    .fetch_one(conn)
    .await?;
    Ok(rec)
}
