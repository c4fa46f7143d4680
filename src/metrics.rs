use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use quill_core::AppError;

use crate::state::AppState;

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
/// Returns `None` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
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

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Prometheus exposition for `GET /metrics`.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Metrics are disabled")))
}

// Business metrics helpers

pub fn track_blog_created(status: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("blogs_created_total", "status" => status.to_string()).increment(1);
}

pub fn track_blog_operation(operation: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("blog_operations_total", "operation" => operation.to_string()).increment(1);
}

/// Counts list queries the translator rejected, by kind.
pub fn track_query_rejected(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("blog_queries_rejected_total", "kind" => kind.to_string()).increment(1);
}

pub fn track_user_registered() {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total").increment(1);
}

pub fn track_user_login_success() {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "failure", "reason" => reason.to_string())
        .increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}
