use std::net::SocketAddr;

use crate::engine::EngineError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings admitted. Labels: none.
pub const BOOKINGS_CREATED_TOTAL: &str = "crewplan_bookings_created_total";

/// Counter: bookings replaced in place.
pub const BOOKINGS_UPDATED_TOTAL: &str = "crewplan_bookings_updated_total";

/// Counter: bookings removed.
pub const BOOKINGS_DELETED_TOTAL: &str = "crewplan_bookings_deleted_total";

/// Counter: admissions rejected. Labels: reason.
pub const ADMISSION_REJECTED_TOTAL: &str = "crewplan_admission_rejected_total";

/// Histogram: full admission latency (validate + check + commit) in seconds.
pub const ADMISSION_DURATION_SECONDS: &str = "crewplan_admission_duration_seconds";

// ── USE metrics (state) ─────────────────────────────────────────

/// Gauge: bookings currently committed across all resources.
pub const BOOKINGS_ACTIVE: &str = "crewplan_bookings_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map an error class to a short label for metrics.
pub fn error_label(err: &EngineError) -> &'static str {
    match err {
        EngineError::Validation(_) => "validation",
        EngineError::ResourceNotFound(_) => "resource_not_found",
        EngineError::ProjectNotFound(_) => "project_not_found",
        EngineError::BookingNotFound(_) => "booking_not_found",
        EngineError::Conflict { .. } => "conflict",
        EngineError::LimitExceeded(_) => "limit",
        EngineError::Internal(_) => "internal",
    }
}
