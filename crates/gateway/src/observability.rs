use axum::http::StatusCode;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Gateway metrics, kept in their own registry so each gateway instance
/// (and each test) counts independently.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    pub forwarded_total: IntCounterVec,
    pub upstream_errors_total: IntCounter,
    pub validation_rejections_total: IntCounter,
    pub upstream_duration: Histogram,
}

impl GatewayMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let forwarded_total = IntCounterVec::new(
            Opts::new("shareit_gateway_forwarded_total", "Requests forwarded to the server"),
            &["method", "status"],
        )?;
        let upstream_errors_total = IntCounter::new(
            "shareit_gateway_upstream_errors_total",
            "Forwarding attempts that never got a response",
        )?;
        let validation_rejections_total = IntCounter::new(
            "shareit_gateway_validation_rejections_total",
            "Requests rejected before forwarding",
        )?;
        let upstream_duration = Histogram::with_opts(
            HistogramOpts::new("shareit_gateway_upstream_duration_seconds", "Server round trip in seconds")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(forwarded_total.clone()))?;
        registry.register(Box::new(upstream_errors_total.clone()))?;
        registry.register(Box::new(validation_rejections_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self { registry, forwarded_total, upstream_errors_total, validation_rejections_total, upstream_duration })
    }

    /// Text exposition format for `GET /metrics`.
    pub fn encode(&self) -> (StatusCode, String) {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
        }
        (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.forwarded_total.with_label_values(&["GET", "200"]).inc();
        metrics.validation_rejections_total.inc();
        let (status, text) = metrics.encode();
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("shareit_gateway_forwarded_total{method=\"GET\",status=\"200\"} 1"));
        assert!(text.contains("shareit_gateway_validation_rejections_total 1"));
    }

    #[test]
    fn instances_do_not_share_counts() {
        let a = GatewayMetrics::new().unwrap();
        let b = GatewayMetrics::new().unwrap();
        a.upstream_errors_total.inc();
        assert_eq!(a.upstream_errors_total.get(), 1);
        assert_eq!(b.upstream_errors_total.get(), 0);
    }
}
