use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use clearance_models::ClearanceStatus;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
/// Returns `Ok(None)` if observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

pub fn track_clearance_request_submitted(records: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("clearance_requests_submitted_total").increment(1);
    histogram!("clearance_request_records").record(records as f64);
}

pub fn track_clearance_record_updated(status: ClearanceStatus) {
    if !is_observability_enabled() {
        return;
    }
    counter!("clearance_records_updated_total", "status" => status.as_str()).increment(1);
}

pub fn track_notification_dropped() {
    if !is_observability_enabled() {
        return;
    }
    counter!("clearance_notifications_dropped_total").increment(1);
}

pub fn track_staff_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("staff_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_staff_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("staff_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_jwt_validation(success: bool) {
    if !is_observability_enabled() {
        return;
    }
    let status = if success { "valid" } else { "invalid" };
    counter!("jwt_validations_total", "status" => status).increment(1);
}

pub fn track_authorization_check(allowed: bool, role: &str) {
    if !is_observability_enabled() {
        return;
    }
    let status = if allowed { "allowed" } else { "denied" };
    counter!("authorization_checks_total", "role" => role.to_string(), "status" => status)
        .increment(1);
}
