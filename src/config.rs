// Client configuration: endpoint, credentials, deadline, retry and rate-limit policies

use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ApiError, ClientError};

pub const DEFAULT_BASE_URL: &str = "https://api.test.hotelbeds.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_API_KEY: &str = "HOTELBEDS_API_KEY";
pub const ENV_API_SECRET: &str = "HOTELBEDS_API_SECRET";
pub const ENV_BASE_URL: &str = "HOTELBEDS_BASE_URL";

/// Extra predicate deciding whether a failed attempt should be retried.
pub type RetryCondition = Arc<dyn Fn(&ApiError) -> bool + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    /// Deadline for one logical call, covering every attempt and retry sleep.
    pub timeout_ms: u64,
    pub retry: Option<RetryConfig>,
    pub rate_limit: Option<RateLimitConfig>,
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: None,
            rate_limit: None,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Default::default()
        }
    }

    /// Reads credentials and an optional base URL from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| ClientError::ConfigError(format!("{} is not set", ENV_API_KEY)))?;
        let api_secret = std::env::var(ENV_API_SECRET)
            .map_err(|_| ClientError::ConfigError(format!("{} is not set", ENV_API_SECRET)))?;

        let mut config = Self::new(api_key, api_secret);
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.is_empty() {
            return Err(ClientError::ConfigError("api_key is empty".to_string()));
        }
        if self.api_secret.is_empty() {
            return Err(ClientError::ConfigError("api_secret is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError("timeout_ms must be > 0".to_string()));
        }
        if let Some(retry) = &self.retry {
            retry.validate()?;
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub min_wait_ms: u64,
    pub max_wait_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
    pub conditions: Vec<RetryCondition>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_wait_ms: 100,
            max_wait_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            conditions: Vec::new(),
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_attempts", &self.max_attempts)
            .field("min_wait_ms", &self.min_wait_ms)
            .field("max_wait_ms", &self.max_wait_ms)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("jitter_factor", &self.jitter_factor)
            .field("conditions", &self.conditions.len())
            .finish()
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts,
            min_wait_ms: min_wait.as_millis() as u64,
            max_wait_ms: max_wait.as_millis() as u64,
            ..Default::default()
        }
    }

    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&ApiError) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Arc::new(condition));
        self
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }

    /// Whether a failed attempt qualifies for another try, attempt budget aside.
    pub fn should_retry(&self, err: &ApiError) -> bool {
        err.is_retryable() || self.conditions.iter().any(|condition| condition(err))
    }

    // Exponential backoff with jitter, clamped to [min_wait, max_wait]
    pub fn calculate_backoff(&self, retry_attempt: u32) -> Duration {
        let base_backoff_ms = (self.min_wait_ms as f64
            * self.backoff_multiplier.powf(retry_attempt as f64))
        .min(self.max_wait_ms as f64);

        // Apply jitter to prevent thundering herd
        let jitter = rand::random::<f64>() * self.jitter_factor * base_backoff_ms;
        let backoff_ms = base_backoff_ms * (1.0 - self.jitter_factor / 2.0) + jitter;

        let clamped = backoff_ms.clamp(self.min_wait_ms as f64, self.max_wait_ms as f64);
        Duration::from_millis(clamped as u64)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.max_attempts == 0 {
            return Err(ClientError::ConfigError(
                "retry.max_attempts must be >= 1".to_string(),
            ));
        }
        if self.min_wait_ms > self.max_wait_ms {
            return Err(ClientError::ConfigError(format!(
                "retry.min_wait_ms ({}) exceeds retry.max_wait_ms ({})",
                self.min_wait_ms, self.max_wait_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(ClientError::ConfigError(
                "retry.jitter_factor must be within [0, 1]".to_string(),
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(ClientError::ConfigError(
                "retry.backoff_multiplier must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token bucket: `limit` tokens refill every `per`, at most `burst` stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub burst: u32,
    pub per: Duration,
}

impl RateLimitConfig {
    pub fn new(limit: u32, burst: u32, per: Duration) -> Self {
        Self { limit, burst, per }
    }

    pub fn per_second(limit: u32) -> Self {
        Self::new(limit, limit, Duration::from_secs(1))
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.limit == 0 || self.burst == 0 {
            return Err(ClientError::ConfigError(
                "rate_limit.limit and rate_limit.burst must be >= 1".to_string(),
            ));
        }
        if self.per.is_zero() {
            return Err(ClientError::ConfigError(
                "rate_limit.per must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
