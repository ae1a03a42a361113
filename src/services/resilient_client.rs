//! Resilient HTTP client for the outbound integrations.
//!
//! Google Sheets and Twilio calls go through this client, which provides:
//! - Exponential backoff with jitter on network errors and retryable statuses
//! - Separate timeouts for read and write operations
//! - A per-host circuit breaker
//! - Optional Prometheus metrics
//!
//! The admin panel does NOT use this client: panel requests are never retried.

use chrono::{DateTime, Utc};
use prometheus::{CounterVec, GaugeVec, HistogramVec, Opts, Registry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{error, info, warn};

/// Configuration for resilient HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilientClientConfig {
    /// Timeout for read operations (in seconds)
    pub read_timeout_seconds: u64,

    /// Timeout for write operations (in seconds)
    pub write_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    pub retry: RetryConfig,

    pub circuit_breaker: CircuitBreakerConfig,

    /// Log every attempt, not only the final outcome
    pub enable_detailed_logging: bool,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_attempts: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,

    /// Retry on these HTTP status codes
    pub retry_on_status: Vec<u16>,
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: usize,

    /// Successes in half-open state needed to close it again
    pub success_threshold: usize,

    /// Seconds an open circuit waits before probing
    pub timeout_seconds: u64,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_seconds: 5,
            write_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            enable_detailed_logging: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay_ms: 200,
            max_delay_ms: 3000,
            jitter_factor: 0.1,
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitBreakerState {
    fn gauge_value(&self) -> f64 {
        match self {
            CircuitBreakerState::Closed => 0.0,
            CircuitBreakerState::Open => 1.0,
            CircuitBreakerState::HalfOpen => 2.0,
        }
    }
}

#[derive(Debug)]
pub struct SimpleCircuitBreaker {
    state: CircuitBreakerState,
    failure_count: usize,
    success_count: usize,
    config: CircuitBreakerConfig,
    last_failure_time: Option<Instant>,
}

impl SimpleCircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: CircuitBreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            config,
            last_failure_time: None,
        }
    }

    pub fn call_allowed(&mut self) -> bool {
        match self.state {
            CircuitBreakerState::Closed | CircuitBreakerState::HalfOpen => true,
            CircuitBreakerState::Open => {
                let cooled_down = self.last_failure_time.is_some_and(|last| {
                    last.elapsed() >= Duration::from_secs(self.config.timeout_seconds)
                });
                if cooled_down {
                    self.state = CircuitBreakerState::HalfOpen;
                    self.success_count = 0;
                }
                cooled_down
            }
        }
    }

    pub fn on_success(&mut self) {
        self.failure_count = 0;

        if self.state == CircuitBreakerState::HalfOpen {
            self.success_count += 1;
            if self.success_count >= self.config.success_threshold {
                self.state = CircuitBreakerState::Closed;
            }
        }
    }

    pub fn on_failure(&mut self) {
        self.failure_count += 1;
        self.last_failure_time = Some(Instant::now());

        // A failed probe reopens the circuit immediately.
        if self.state == CircuitBreakerState::HalfOpen
            || self.failure_count >= self.config.failure_threshold
        {
            self.state = CircuitBreakerState::Open;
        }
    }

    pub fn state(&self) -> &CircuitBreakerState {
        &self.state
    }
}

/// Metrics for outbound HTTP calls
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// Requests by destination, method, and outcome
    pub http_requests_total: CounterVec,

    /// Request duration by destination and method
    pub http_request_duration_seconds: HistogramVec,

    /// Retry attempts by destination and reason
    pub retry_attempts_total: CounterVec,

    /// Circuit breaker state by destination
    pub circuit_breaker_state: GaugeVec,
}

impl ResilientClientMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let http_requests_total = CounterVec::new(
            Opts::new(
                "outbound_http_requests_total",
                "Outbound HTTP requests by destination, method, and outcome",
            ),
            &["destination", "method", "outcome"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "outbound_http_request_duration_seconds",
                "Duration of outbound HTTP requests including retries",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["destination", "method"],
        )?;

        let retry_attempts_total = CounterVec::new(
            Opts::new(
                "outbound_http_retry_attempts_total",
                "Outbound retry attempts by destination and reason",
            ),
            &["destination", "reason"],
        )?;

        let circuit_breaker_state = GaugeVec::new(
            Opts::new(
                "outbound_http_circuit_breaker_state",
                "Circuit breaker state (0=closed, 1=open, 2=half-open)",
            ),
            &["destination"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(retry_attempts_total.clone()))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            retry_attempts_total,
            circuit_breaker_state,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    fn operation_type(&self) -> OperationType {
        match self {
            HttpMethod::Get => OperationType::Read,
            HttpMethod::Post | HttpMethod::Put => OperationType::Write,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

#[derive(Clone)]
pub enum Credentials {
    Bearer(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// A request description that can be replayed on every retry attempt
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
    pub credentials: Option<Credentials>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: RequestBody::Empty,
            credentials: None,
        }
    }

    pub fn post_json<T: Serialize>(
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, ResilientClientError> {
        Self::with_json(HttpMethod::Post, url, body)
    }

    pub fn put_json<T: Serialize>(
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, ResilientClientError> {
        Self::with_json(HttpMethod::Put, url, body)
    }

    pub fn post_form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: RequestBody::Form(fields),
            credentials: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    fn with_json<T: Serialize>(
        method: HttpMethod,
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, ResilientClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ResilientClientError::SerializationError(e.to_string()))?;
        Ok(Self {
            method,
            url: url.into(),
            body: RequestBody::Json(value),
            credentials: None,
        })
    }

    fn build(&self, client: &Client) -> reqwest::RequestBuilder {
        let builder = match self.method {
            HttpMethod::Get => client.get(&self.url),
            HttpMethod::Post => client.post(&self.url),
            HttpMethod::Put => client.put(&self.url),
        };

        let builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        match &self.credentials {
            None => builder,
            Some(Credentials::Bearer(token)) => builder.bearer_auth(token),
            Some(Credentials::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
        }
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub destination: String,
    pub method: &'static str,
    pub url: String,
    pub start_time: DateTime<Utc>,
}

/// HTTP client with retries, timeouts, and circuit breakers
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
    circuit_breakers: HashMap<String, SimpleCircuitBreaker>,
}

impl ResilientClient {
    pub fn new(
        config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(std::cmp::max(
                config.read_timeout_seconds,
                config.write_timeout_seconds,
            )))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
            circuit_breakers: HashMap::new(),
        })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response, ResilientClientError> {
        self.send(OutboundRequest::get(url)).await
    }

    pub async fn post<T: Serialize>(
        &mut self,
        url: &str,
        json: &T,
    ) -> Result<reqwest::Response, ResilientClientError> {
        self.send(OutboundRequest::post_json(url, json)?).await
    }

    /// Host part of the URL, used to group metrics and circuit breakers
    fn extract_destination(&self, url: &str) -> String {
        url::Url::parse(url)
            .map(|u| u.host_str().unwrap_or("unknown").to_string())
            .unwrap_or_else(|_| "invalid_url".to_string())
    }

    /// Execute a request with retries, timeout, and circuit breaking
    pub async fn send(
        &mut self,
        request: OutboundRequest,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let context = RequestContext {
            destination: self.extract_destination(&request.url),
            method: request.method.as_str(),
            url: request.url.clone(),
            start_time: Utc::now(),
        };
        let destination = context.destination.clone();

        let breaker_config = self.config.circuit_breaker.clone();
        let circuit_breaker = self
            .circuit_breakers
            .entry(destination.clone())
            .or_insert_with(|| SimpleCircuitBreaker::new(breaker_config));

        if !circuit_breaker.call_allowed() {
            self.record_circuit_breaker_state(&destination, CircuitBreakerState::Open.gauge_value());
            warn!(
                destination = %destination,
                url = %context.url,
                "Circuit breaker is open, rejecting request"
            );
            return Err(ResilientClientError::CircuitBreakerOpen);
        }
        let state_value = circuit_breaker.state().gauge_value();
        self.record_circuit_breaker_state(&destination, state_value);

        let timeout = match request.method.operation_type() {
            OperationType::Read => Duration::from_secs(self.config.read_timeout_seconds),
            OperationType::Write => Duration::from_secs(self.config.write_timeout_seconds),
        };

        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
            .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.retry.max_attempts);

        let client = self.client.clone();
        let config = self.config.clone();
        let started = Instant::now();

        let result = Retry::spawn(retry_strategy, || {
            let client = client.clone();
            let request = request.clone();
            let context = context.clone();
            let config = config.clone();

            async move {
                let attempt_start = Instant::now();

                match tokio::time::timeout(timeout, request.build(&client).send()).await {
                    Ok(Ok(response)) => {
                        let status = response.status().as_u16();
                        if config.retry.retry_on_status.contains(&status) {
                            if config.enable_detailed_logging {
                                warn!(
                                    destination = %context.destination,
                                    method = context.method,
                                    status,
                                    duration_ms = attempt_start.elapsed().as_millis(),
                                    "Outbound request failed with retryable status"
                                );
                            }
                            Err(ResilientClientError::RetryableStatus(status))
                        } else {
                            if config.enable_detailed_logging {
                                info!(
                                    destination = %context.destination,
                                    method = context.method,
                                    status,
                                    duration_ms = attempt_start.elapsed().as_millis(),
                                    "Outbound request completed"
                                );
                            }
                            Ok(response)
                        }
                    }
                    Ok(Err(e)) => {
                        if config.enable_detailed_logging {
                            error!(
                                destination = %context.destination,
                                method = context.method,
                                error = %e,
                                "Outbound request failed with network error"
                            );
                        }
                        Err(ResilientClientError::NetworkError(e))
                    }
                    Err(_) => {
                        if config.enable_detailed_logging {
                            warn!(
                                destination = %context.destination,
                                method = context.method,
                                timeout_seconds = timeout.as_secs(),
                                "Outbound request timed out"
                            );
                        }
                        Err(ResilientClientError::Timeout)
                    }
                }
            }
        })
        .await;

        let duration = started.elapsed();
        match &result {
            Ok(_) => {
                self.record_request_metrics(&context, "success", duration);
                if let Some(cb) = self.circuit_breakers.get_mut(&destination) {
                    cb.on_success();
                }
            }
            Err(err) => {
                let outcome = err.outcome_label();
                self.record_request_metrics(&context, outcome, duration);
                self.record_retry_attempt(&context, outcome);
                error!(
                    destination = %context.destination,
                    method = context.method,
                    url = %context.url,
                    error = %err,
                    duration_ms = duration.as_millis(),
                    "Outbound request gave up"
                );
                if let Some(cb) = self.circuit_breakers.get_mut(&destination) {
                    cb.on_failure();
                }
            }
        }

        result
    }

    fn record_request_metrics(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .http_requests_total
                .with_label_values(&[context.destination.as_str(), context.method, outcome])
                .inc();
            metrics
                .http_request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_retry_attempt(&self, context: &RequestContext, reason: &str) {
        if let Some(metrics) = &self.metrics {
            metrics
                .retry_attempts_total
                .with_label_values(&[context.destination.as_str(), reason])
                .inc();
        }
    }

    fn record_circuit_breaker_state(&self, destination: &str, state: f64) {
        if let Some(metrics) = &self.metrics {
            metrics
                .circuit_breaker_state
                .with_label_values(&[destination])
                .set(state);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OperationType {
    Read,
    Write,
}

#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Circuit breaker is open")]
    CircuitBreakerOpen,

    #[error("Retryable status code: {0}")]
    RetryableStatus(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ResilientClientError {
    fn outcome_label(&self) -> &'static str {
        match self {
            ResilientClientError::NetworkError(_) => "network_error",
            ResilientClientError::Timeout => "timeout",
            ResilientClientError::CircuitBreakerOpen => "circuit_open",
            ResilientClientError::RetryableStatus(_) => "retry_exhausted",
            ResilientClientError::SerializationError(_) => "error",
        }
    }

    /// Message safe to return to API callers
    pub fn user_message(&self) -> String {
        match self {
            ResilientClientError::NetworkError(_) => {
                "Upstream service unavailable due to network issues".to_string()
            }
            ResilientClientError::Timeout => "Upstream service unavailable due to timeout".to_string(),
            ResilientClientError::CircuitBreakerOpen => {
                "Upstream service unavailable, please try again later".to_string()
            }
            ResilientClientError::RetryableStatus(status) => {
                format!("Upstream service returned error status {status}")
            }
            ResilientClientError::SerializationError(_) => "Invalid request data".to_string(),
        }
    }
}
