//! 进程内指标计数与 Prometheus 文本输出

use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

struct MetricsState {
    total: u64,
    errors: u64,
    per_endpoint: HashMap<&'static str, u64>,
    per_endpoint_err: HashMap<&'static str, u64>,
    // 支付相关
    payments_captured: u64,
    idempotent_replays: u64,
    idempotency_conflicts: u64,
}

fn state() -> &'static Mutex<MetricsState> {
    METRICS.get_or_init(|| {
        Mutex::new(MetricsState {
            total: 0,
            errors: 0,
            per_endpoint: HashMap::new(),
            per_endpoint_err: HashMap::new(),
            payments_captured: 0,
            idempotent_replays: 0,
            idempotency_conflicts: 0,
        })
    })
}

fn lock() -> std::sync::MutexGuard<'static, MetricsState> {
    match state().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

pub fn count_ok(endpoint: &'static str) {
    let mut s = lock();
    s.total += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
}

pub fn count_err(endpoint: &'static str) {
    let mut s = lock();
    s.total += 1;
    s.errors += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
    *s.per_endpoint_err.entry(endpoint).or_insert(0) += 1;
}

pub fn inc_payment_captured() {
    lock().payments_captured += 1;
}

pub fn inc_idempotent_replay() {
    lock().idempotent_replays += 1;
}

pub fn inc_idempotency_conflict() {
    lock().idempotency_conflicts += 1;
}

pub fn render_prometheus() -> String {
    let s = lock();
    let mut out = String::new();
    out.push_str("# HELP paycore_requests_total Total requests\n");
    out.push_str("# TYPE paycore_requests_total counter\n");
    out.push_str(&format!("paycore_requests_total {}\n", s.total));

    out.push_str("# HELP paycore_errors_total Total error responses\n");
    out.push_str("# TYPE paycore_errors_total counter\n");
    out.push_str(&format!("paycore_errors_total {}\n", s.errors));

    out.push_str("# HELP paycore_payments_captured_total Captured payments\n");
    out.push_str("# TYPE paycore_payments_captured_total counter\n");
    out.push_str(&format!(
        "paycore_payments_captured_total {}\n",
        s.payments_captured
    ));

    out.push_str("# HELP paycore_idempotent_replays_total Replayed responses from idempotency cache\n");
    out.push_str("# TYPE paycore_idempotent_replays_total counter\n");
    out.push_str(&format!(
        "paycore_idempotent_replays_total {}\n",
        s.idempotent_replays
    ));

    out.push_str("# HELP paycore_idempotency_conflicts_total Idempotency key conflicts\n");
    out.push_str("# TYPE paycore_idempotency_conflicts_total counter\n");
    out.push_str(&format!(
        "paycore_idempotency_conflicts_total {}\n",
        s.idempotency_conflicts
    ));

    for (endpoint, count) in s.per_endpoint.iter() {
        out.push_str(&format!(
            "paycore_endpoint_requests_total{{endpoint=\"{}\"}} {}\n",
            endpoint, count
        ));
    }
    for (endpoint, count) in s.per_endpoint_err.iter() {
        out.push_str(&format!(
            "paycore_endpoint_errors_total{{endpoint=\"{}\"}} {}\n",
            endpoint, count
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_render() {
        count_ok("POST /api/v1/payments");
        count_err("POST /api/v1/payments");
        inc_payment_captured();

        let rendered = render_prometheus();
        assert!(rendered.contains("paycore_requests_total"));
        assert!(rendered.contains("paycore_payments_captured_total"));
        assert!(rendered.contains("endpoint=\"POST /api/v1/payments\""));
    }
}
