// Signed HTTP transport
// Dispatches one logical call: limiter wait, signing, exchange, error
// classification, retry with backoff, all under a single deadline.

use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::config::{ClientConfig, RateLimitConfig, RetryConfig};
use crate::errors::{decode_error, ApiError, ClientError};
use crate::signing::{build_headers, Credentials};

/// Types that render themselves as URL query parameters. Unset fields are
/// left out.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Method, path, query and body of one logical call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        Self::new(Method::POST, path).with_json(body)
    }

    pub fn put<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        Self::new(Method::PUT, path).with_json(body)
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let encoded =
            serde_json::to_vec(body).map_err(|e| ApiError::EncodeError(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn with_query<Q: QueryParams + ?Sized>(mut self, params: &Q) -> Self {
        self.query.extend(params.query_pairs());
        self
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket shared by every concurrent call of one client.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = f64::from(config.burst.max(1));
        let refill_per_sec = f64::from(config.limit) / config.per.as_secs_f64();
        Self {
            capacity,
            refill_per_sec,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes a token, or reports how long until one is available.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut bucket = self.bucket.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_per_sec))
        }
    }

    /// Waits until a token is available.
    pub async fn acquire(&self) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            match self.try_acquire() {
                Ok(()) => return waited,
                Err(wait) => {
                    trace!(wait_ms = wait.as_millis() as u64, "rate limiter wait");
                    waited += wait;
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

/// Point-in-time copy of the transport counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub requests_retried: usize,
    pub requests_throttled: usize,
    pub requests_timeout: usize,
    pub upstream_errors: usize,
}

#[derive(Debug, Default)]
struct StatsCounters {
    sent: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    retried: AtomicUsize,
    throttled: AtomicUsize,
    timeout: AtomicUsize,
    upstream_errors: AtomicUsize,
}

impl StatsCounters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ClientStats {
        ClientStats {
            requests_sent: self.sent.load(Ordering::Relaxed),
            requests_succeeded: self.succeeded.load(Ordering::Relaxed),
            requests_failed: self.failed.load(Ordering::Relaxed),
            requests_retried: self.retried.load(Ordering::Relaxed),
            requests_throttled: self.throttled.load(Ordering::Relaxed),
            requests_timeout: self.timeout.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
        }
    }
}

pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    default_headers: HeaderMap,
    timeout: Duration,
    retry: Option<RetryConfig>,
    limiter: Option<RateLimiter>,
    stats: StatsCounters,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(&config.api_key, &config.api_secret),
            default_headers: config.default_headers.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            retry: config.retry.clone(),
            limiter: config.rate_limit.map(RateLimiter::new),
            stats: StatsCounters::default(),
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.snapshot()
    }

    /// Runs the call to completion and decodes a successful body into `R`.
    pub async fn execute<R: DeserializeOwned>(&self, spec: RequestSpec) -> Result<R, ApiError> {
        let body = match tokio::time::timeout(self.timeout, self.execute_with_retry(&spec)).await
        {
            Ok(result) => result?,
            Err(_) => {
                StatsCounters::bump(&self.stats.timeout);
                warn!(
                    method = %spec.method,
                    path = %spec.path,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "request deadline exceeded"
                );
                return Err(ApiError::Timeout(self.timeout.as_millis() as u64));
            }
        };

        serde_json::from_slice(&body).map_err(|e| {
            warn!(path = %spec.path, error = %e, "failed to decode response body");
            ApiError::DecodeError(e.to_string())
        })
    }

    async fn execute_with_retry(&self, spec: &RequestSpec) -> Result<Bytes, ApiError> {
        let max_attempts = self.retry.as_ref().map_or(1, |r| r.max_attempts.max(1));
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let err = match self.send_once(spec, attempt).await {
                Ok(body) => {
                    StatsCounters::bump(&self.stats.succeeded);
                    return Ok(body);
                }
                Err(err) => err,
            };

            let retry = match &self.retry {
                Some(retry)
                    if !err.is_local()
                        && attempt < max_attempts
                        && resendable(&spec.method, &err)
                        && retry.should_retry(&err) =>
                {
                    retry
                }
                _ => {
                    StatsCounters::bump(&self.stats.failed);
                    return Err(err);
                }
            };

            let delay = retry.calculate_backoff(attempt - 1);
            StatsCounters::bump(&self.stats.retried);
            warn!(
                method = %spec.method,
                path = %spec.path,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = %err,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(&self, spec: &RequestSpec, attempt: u32) -> Result<Bytes, ApiError> {
        if let Some(limiter) = &self.limiter {
            if !limiter.acquire().await.is_zero() {
                StatsCounters::bump(&self.stats.throttled);
            }
        }

        // Signature is per attempt, it embeds the current unix time
        let headers = build_headers(
            &self.credentials,
            &self.default_headers,
            Utc::now().timestamp(),
        )?;

        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self
            .http
            .request(spec.method.clone(), url)
            .headers(headers);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }

        debug!(method = %spec.method, path = %spec.path, attempt, "dispatching request");
        StatsCounters::bump(&self.stats.sent);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        if status > 399 {
            StatsCounters::bump(&self.stats.upstream_errors);
            let err = decode_error(status, &body);
            debug!(
                status,
                condition = ?err.condition(),
                retryable = err.is_retryable(),
                "upstream error"
            );
            return Err(err);
        }

        trace!(status, len = body.len(), "response received");
        Ok(body)
    }
}

// A dropped connection may already have delivered the request, so only
// idempotent methods are re-sent after one.
fn resendable(method: &Method, err: &ApiError) -> bool {
    !matches!(err, ApiError::NetworkError(_)) || method.is_idempotent()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Paging {
        from: Option<u32>,
        language: String,
    }

    impl QueryParams for Paging {
        fn query_pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs = Vec::new();
            if let Some(from) = self.from {
                pairs.push(("from", from.to_string()));
            }
            if !self.language.is_empty() {
                pairs.push(("language", self.language.clone()));
            }
            pairs
        }
    }

    #[test]
    fn test_request_spec_builders() {
        let spec = RequestSpec::get("/hotels").with_query(&Paging {
            from: Some(1),
            language: String::new(),
        });
        assert_eq!(spec.method, Method::GET);
        assert_eq!(spec.query, vec![("from", "1".to_string())]);
        assert!(spec.body.is_none());

        let spec = RequestSpec::post("/hotels", &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.body.as_deref(), Some(&br#"{"a":1}"#[..]));
    }

    #[test]
    fn test_rate_limiter_burst_then_wait() {
        let limiter = RateLimiter::new(RateLimitConfig::new(10, 2, Duration::from_secs(1)));
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        let wait = limiter.try_acquire().unwrap_err();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire_waits_for_refill() {
        let limiter = RateLimiter::new(RateLimitConfig::new(20, 1, Duration::from_secs(1)));
        limiter.acquire().await;
        let started = Instant::now();
        let waited = limiter.acquire().await;
        assert!(waited > Duration::ZERO);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_rate_limiter_burst_does_not_wait() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(5));
        let waited = tokio_test::block_on(limiter.acquire());
        assert_eq!(waited, Duration::ZERO);
    }

    #[test]
    fn test_network_errors_resend_only_idempotent_methods() {
        let dropped = ApiError::NetworkError("connection reset".to_string());
        assert!(resendable(&Method::GET, &dropped));
        assert!(resendable(&Method::PUT, &dropped));
        assert!(resendable(&Method::DELETE, &dropped));
        assert!(!resendable(&Method::POST, &dropped));

        let throttled = crate::errors::decode_error(429, br#"{"error":"Rate limit exceeded"}"#);
        assert!(resendable(&Method::POST, &throttled));
    }

    #[test]
    fn test_transport_rejects_invalid_config() {
        let err = Transport::new(&ClientConfig::default()).err().unwrap();
        assert!(matches!(err, ClientError::ConfigError(_)));
    }

    #[test]
    fn test_stats_start_at_zero() {
        let transport = Transport::new(&ClientConfig::new("k", "s")).unwrap();
        assert_eq!(transport.stats(), ClientStats::default());
    }
}
