//! 支付与分账台账持久化

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::domain::{Money, PaymentMethod, PaymentStatus, Receivable};

#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub status: String,
    pub gross_amount: Decimal,
    pub platform_fee_amount: Decimal,
    pub net_amount: Decimal,
    pub payment_method: String,
    pub installments: i32,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreatePaymentInput {
    pub gross_amount: Money,
    pub platform_fee_amount: Money,
    pub net_amount: Money,
    pub payment_method: PaymentMethod,
    pub installments: i32,
    pub idempotency_key: String,
}

/// 创建支付头记录，状态固定为 captured
pub async fn create(
    conn: &mut PgConnection,
    input: CreatePaymentInput,
) -> Result<Payment, sqlx::Error> {
    let rec = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments
            (id, status, gross_amount, platform_fee_amount, net_amount,
             payment_method, installments, idempotency_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, status, gross_amount, platform_fee_amount, net_amount,
                  payment_method, installments, idempotency_key, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(PaymentStatus::Captured.as_str())
    .bind(input.gross_amount.to_decimal())
    .bind(input.platform_fee_amount.to_decimal())
    .bind(input.net_amount.to_decimal())
    .bind(input.payment_method.as_str())
    .bind(input.installments)
    .bind(&input.idempotency_key)
    .fetch_one(conn)
    .await?;
    Ok(rec)
}

/// 批量写入台账，一次往返（UNNEST 展开多行）
pub async fn create_ledger_entries(
    conn: &mut PgConnection,
    payment_id: Uuid,
    receivables: &[Receivable],
) -> Result<u64, sqlx::Error> {
    if receivables.is_empty() {
        return Ok(0);
    }

    let ids: Vec<Uuid> = receivables.iter().map(|_| Uuid::new_v4()).collect();
    let recipient_ids: Vec<String> = receivables.iter().map(|r| r.recipient_id.clone()).collect();
    let roles: Vec<String> = receivables.iter().map(|r| r.role.clone()).collect();
    let amounts: Vec<Decimal> = receivables.iter().map(|r| r.amount.to_decimal()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO ledger_entries (id, payment_id, recipient_id, role, amount)
        SELECT entry_id, $1, recipient_id, role, amount
        FROM UNNEST($2::uuid[], $3::text[], $4::text[], $5::numeric[])
            AS t(entry_id, recipient_id, role, amount)
        "#,
    )
    .bind(payment_id)
    .bind(&ids)
    .bind(&recipient_ids)
    .bind(&roles)
    .bind(&amounts)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
