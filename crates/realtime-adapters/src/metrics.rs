//! Transport gauges and counters, exposed through the /metrics endpoint.

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Cloneable handles; all clones update the same underlying series.
#[derive(Clone, Default)]
pub struct TransportMetrics {
    /// Live websocket sessions currently subscribed to a room.
    pub sessions: Gauge,
    /// Notifications handed to the transport for fan-out.
    pub events_published: Counter,
    /// Per-session deliveries (one publish to a room with three sessions
    /// counts three).
    pub events_delivered: Counter,
}

impl TransportMetrics {
    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "realtime_sessions",
            "Live websocket sessions subscribed to a room",
            self.sessions.clone(),
        );
        registry.register(
            "realtime_events_published",
            "Notifications handed to the transport for fan-out",
            self.events_published.clone(),
        );
        registry.register(
            "realtime_events_delivered",
            "Per-session notification deliveries",
            self.events_delivered.clone(),
        );
    }
}
