//! 支付捕获协调器
//!
//! 单一公共操作 process：校验 → 幂等握手 → 费用/分账计算 →
//! 支付与台账落库 → outbox 入队 → 响应缓存回写，全部在一个
//! 数据库事务内完成。事务内任何失败都会整体回滚（包括
//! processing 幂等记录），同一 (key, payload) 的重试可以干净重来。

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{Money, PaymentRequest, Receivable},
    error::AppError,
    metrics,
    repository::{self, CreatePaymentInput},
    service::{
        fee_calculator::FeeCalculator,
        idempotency::{self, IdempotencyOutcome},
        rates::PlatformRates,
        split_calculator, validator,
    },
};

pub const EVENT_PAYMENT_CAPTURED: &str = "payment_captured";

/// 捕获成功的响应体；同一份 JSON 会被缓存到幂等记录，
/// 重放时原样返回
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptureResponse {
    pub payment_id: Uuid,
    #[schema(example = "captured")]
    pub status: String,
    #[schema(value_type = String, example = "297.00")]
    pub gross_amount: Money,
    #[schema(value_type = String, example = "26.70")]
    pub platform_fee_amount: Money,
    #[schema(value_type = String, example = "270.30")]
    pub net_amount: Money,
    pub receivables: Vec<Receivable>,
    pub outbox_event: OutboxEventSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutboxEventSummary {
    #[serde(rename = "type")]
    #[schema(example = "payment_captured")]
    pub event_type: String,
    #[schema(example = "pending")]
    pub status: String,
}

/// 费用与分账的纯计算结果（不触碰数据库，可独立测试）
#[derive(Debug, Clone)]
pub struct CaptureAmounts {
    pub platform_fee_amount: Money,
    pub net_amount: Money,
    pub receivables: Vec<Receivable>,
}

/// 毛额 → (费用, 净额, 分账) 的纯组合
pub fn compute_amounts(
    fee_calculator: &FeeCalculator,
    input: &PaymentRequest,
) -> Result<CaptureAmounts, AppError> {
    let platform_fee_amount =
        fee_calculator.calculate(input.amount, input.payment_method, input.installments)?;
    let net_amount = input
        .amount
        .checked_sub(platform_fee_amount)
        .ok_or_else(|| AppError::internal("net amount underflow"))?;
    let receivables = split_calculator::calculate(net_amount, &input.splits);

    Ok(CaptureAmounts {
        platform_fee_amount,
        net_amount,
        receivables,
    })
}

pub struct CaptureCoordinator {
    pool: PgPool,
    fee_calculator: FeeCalculator,
}

impl CaptureCoordinator {
    pub fn new(pool: PgPool, rates: PlatformRates) -> Self {
        Self {
            pool,
            fee_calculator: FeeCalculator::new(rates),
        }
    }

    pub async fn process(
        &self,
        input: &PaymentRequest,
        idempotency_key: &str,
    ) -> Result<CaptureResponse, AppError> {
        // 1. 业务校验在事务之外短路
        validator::validate(input)?;

        // 2. 规范哈希
        let payload_hash = idempotency::hash_payload(input);

        // 3-5. 事务 + 幂等握手（行锁在 check 内获取）
        let mut tx = self.pool.begin().await?;
        let record = match idempotency::check(&mut *tx, idempotency_key, &payload_hash).await? {
            IdempotencyOutcome::Conflict => {
                metrics::inc_idempotency_conflict();
                tracing::warn!(key = %idempotency_key, "idempotency_conflict");
                return Err(AppError::IdempotencyConflict);
            }
            IdempotencyOutcome::InFlight => {
                tracing::warn!(key = %idempotency_key, "idempotency_in_flight");
                return Err(AppError::DuplicateInFlight);
            }
            IdempotencyOutcome::Replay(cached) => {
                // 空操作，但提交以释放行锁
                tx.commit().await?;
                metrics::inc_idempotent_replay();
                tracing::info!(key = %idempotency_key, "idempotent_replay");
                let response: CaptureResponse = serde_json::from_value(cached)?;
                return Ok(response);
            }
            IdempotencyOutcome::FirstTime(record) => record,
        };

        // 6. 费用与分账
        let amounts = compute_amounts(&self.fee_calculator, input)?;

        // 7-8. 支付头 + 台账
        let payment = repository::payments::create(
            &mut *tx,
            CreatePaymentInput {
                gross_amount: input.amount,
                platform_fee_amount: amounts.platform_fee_amount,
                net_amount: amounts.net_amount,
                payment_method: input.payment_method,
                installments: input.installments,
                idempotency_key: idempotency_key.to_string(),
            },
        )
        .await?;
        repository::payments::create_ledger_entries(&mut *tx, payment.id, &amounts.receivables)
            .await?;

        // 9. outbox 事件与支付同事务提交
        let event_payload = json!({
            "payment_id": payment.id,
            "gross_amount": input.amount.to_string(),
            "net_amount": amounts.net_amount.to_string(),
        });
        let event =
            repository::outbox::enqueue(&mut *tx, EVENT_PAYMENT_CAPTURED, &event_payload).await?;

        // 10-11. 构造响应并回写幂等缓存
        let response = CaptureResponse {
            payment_id: payment.id,
            status: payment.status.clone(),
            gross_amount: input.amount,
            platform_fee_amount: amounts.platform_fee_amount,
            net_amount: amounts.net_amount,
            receivables: amounts.receivables,
            outbox_event: OutboxEventSummary {
                event_type: event.event_type.clone(),
                status: event.status.clone(),
            },
        };
        let cached = serde_json::to_value(&response)?;
        idempotency::save_response(&mut *tx, record.id, &cached).await?;

        // 12. 提交
        tx.commit().await?;
        metrics::inc_payment_captured();
        tracing::info!(
            payment_id = %payment.id,
            gross = %input.amount,
            fee = %response.platform_fee_amount,
            net = %response.net_amount,
            method = input.payment_method.as_str(),
            "payment_captured"
        );

        Ok(response)
    }
}
