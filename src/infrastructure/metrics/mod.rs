//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active WebSocket connections gauge
//! - Inbound gateway events by event name and outcome
//! - Outbound deliveries by event name and result
//! - Active rooms gauge
//! - Appended chat messages counter

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "order_chat_relay";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WEBSOCKET_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace(NAMESPACE),
    )
    .expect("Failed to create WEBSOCKET_CONNECTIONS_ACTIVE metric")
});

/// Inbound gateway events - by event name and outcome ("ok", "rejected")
pub static GATEWAY_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("gateway_events_total", "Total number of inbound gateway events")
            .namespace(NAMESPACE),
        &["event", "outcome"],
    )
    .expect("Failed to create GATEWAY_EVENTS_TOTAL metric")
});

/// Outbound deliveries - by event name and result ("delivered", "dropped")
pub static DELIVERIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("deliveries_total", "Total number of per-recipient deliveries")
            .namespace(NAMESPACE),
        &["event", "result"],
    )
    .expect("Failed to create DELIVERIES_TOTAL metric")
});

/// Rooms with at least one member
pub static ROOMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("rooms_active", "Number of rooms with at least one member").namespace(NAMESPACE),
    )
    .expect("Failed to create ROOMS_ACTIVE metric")
});

/// Chat messages appended to the conversation store
pub static MESSAGES_APPENDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("messages_appended_total", "Total number of chat messages stored")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create MESSAGES_APPENDED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WEBSOCKET_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WEBSOCKET_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(GATEWAY_EVENTS_TOTAL.clone()))
        .expect("Failed to register GATEWAY_EVENTS_TOTAL");
    registry
        .register(Box::new(DELIVERIES_TOTAL.clone()))
        .expect("Failed to register DELIVERIES_TOTAL");
    registry
        .register(Box::new(ROOMS_ACTIVE.clone()))
        .expect("Failed to register ROOMS_ACTIVE");
    registry
        .register(Box::new(MESSAGES_APPENDED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_APPENDED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record an inbound gateway event
pub fn record_gateway_event(event: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "rejected" };
    GATEWAY_EVENTS_TOTAL
        .with_label_values(&[event, outcome])
        .inc();
}

/// Helper to record one delivery attempt to one recipient
pub fn record_delivery(event: &str, delivered: bool) {
    let result = if delivered { "delivered" } else { "dropped" };
    DELIVERIES_TOTAL.with_label_values(&[event, result]).inc();
}

pub fn record_message_appended() {
    MESSAGES_APPENDED_TOTAL.inc();
}

/// Helper to update connection and room gauges
pub fn set_gateway_gauges(connections: usize, rooms: usize) {
    WEBSOCKET_CONNECTIONS_ACTIVE.set(connections as i64);
    ROOMS_ACTIVE.set(rooms as i64);
}
