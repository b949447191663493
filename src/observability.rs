use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: availability lookups served (open and closed days alike).
pub const AVAILABILITY_QUERIES_TOTAL: &str = "bookable_availability_queries_total";

/// Histogram: availability lookup latency in seconds.
pub const AVAILABILITY_DURATION_SECONDS: &str = "bookable_availability_duration_seconds";

/// Counter: appointments booked.
pub const BOOKINGS_TOTAL: &str = "bookable_bookings_total";

/// Counter: writes rejected by the conflict gate.
pub const BOOKING_CONFLICTS_TOTAL: &str = "bookable_booking_conflicts_total";

/// Counter: appointments cancelled.
pub const CANCELLATIONS_TOTAL: &str = "bookable_cancellations_total";

/// Counter: blocked-time records created.
pub const BLOCKS_TOTAL: &str = "bookable_blocked_times_total";

/// Install the Prometheus metrics exporter on the given port. No-op if port
/// is None. Must run inside a tokio runtime.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Convenience for embedders without their own subscriber setup.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
