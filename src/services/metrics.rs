//! Metrics collection and Prometheus integration service.

use crate::models::VersionResponse;
use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

/// Application metrics collector
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    /// Passwords handed out, by channel ("api" or "typebot")
    pub passwords_assigned_total: CounterVec,
    pub password_resets_total: CounterVec,
    pub sheet_refreshes_total: CounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        let passwords_assigned_total = CounterVec::new(
            Opts::new("passwords_assigned_total", "Passwords handed out"),
            &["channel"],
        )?;

        let password_resets_total = CounterVec::new(
            Opts::new("password_resets_total", "Admin password resets by outcome"),
            &["outcome"],
        )?;

        let sheet_refreshes_total = CounterVec::new(
            Opts::new("sheet_refreshes_total", "Forced sheet refreshes by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(passwords_assigned_total.clone()))?;
        registry.register(Box::new(password_resets_total.clone()))?;
        registry.register(Box::new(sheet_refreshes_total.clone()))?;

        let build = VersionResponse::current();
        app_info
            .with_label_values(&[build.version.as_str(), build.commit.as_str(), build.build_time.as_str()])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            passwords_assigned_total,
            password_resets_total,
            sheet_refreshes_total,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    pub fn record_assignment(&self, channel: &str) {
        self.passwords_assigned_total.with_label_values(&[channel]).inc();
    }

    pub fn record_reset(&self, outcome: &str) {
        self.password_resets_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_refresh(&self, outcome: &str) {
        self.sheet_refreshes_total.with_label_values(&[outcome]).inc();
    }

    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_counters_render() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_assignment("typebot");
        metrics.record_reset("failure");
        metrics.record_refresh("success");
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(1));

        let output = metrics.render().unwrap();
        assert!(output.contains("passwords_assigned_total{channel=\"typebot\"} 1"));
        assert!(output.contains("password_resets_total{outcome=\"failure\"} 1"));
        assert!(output.contains("sheet_refreshes_total{outcome=\"success\"} 1"));
        assert!(!output.contains("route=\"/api/metrics\""));
    }
}
