use std::fs;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Logs every request inside an `http_request` span.
///
/// The request id is taken from `x-request-id` when the client sends one and
/// is echoed back on the response. The raw query string is recorded because
/// list filters travel there.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
        query = req.uri().query().unwrap_or_default(),
    );

    let mut response = next.run(req).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    span.in_scope(|| match status {
        400..=499 => warn!(status, latency_ms, "Request rejected"),
        500..=599 => error!(status, latency_ms, "Request failed"),
        _ => info!(status, latency_ms, "Request completed"),
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID.clone(), value);
    }

    response
}

/// Installs the global subscriber: a compact console layer filtered by
/// `RUST_LOG`, a daily error log, and a daily JSON log for ingestion.
///
/// Log files are written under `LOG_DIR` (default `storage/logs`).
pub fn init_tracing() -> std::io::Result<()> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string());
    fs::create_dir_all(&log_dir)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,quill_db=info,tower_http=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "quill.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "quill.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .init();

    info!(log_dir = %log_dir, "Tracing initialized");
    Ok(())
}
