// Error classification layer
// Decodes upstream failure bodies and classifies them against a fixed,
// ordered catalog of known conditions to derive retryability.

use crate::audit::AuditData;
use crate::validation::ValidationFault;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use thiserror::Error;

/// Category reported in the `code` field of a long-form error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "CONFIGURATION_ERROR")]
    Configuration,
    #[serde(rename = "SYSTEM_ERROR")]
    System,
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[serde(rename = "INVALID_DATA")]
    InvalidData,
    #[serde(rename = "PRODUCT_ERROR")]
    Product,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Configuration => "CONFIGURATION_ERROR",
            ErrorCode::System => "SYSTEM_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidData => "INVALID_DATA",
            ErrorCode::Product => "PRODUCT_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error conditions recognised from free-text upstream messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownCondition {
    DoNotRetry,
    RateLimitExceeded,
    QuotaExceeded,
    ReservationUnreachable,
    CheckInInPast,
    CancellationAfterCheckIn,
    CancellationNotAllowed,
    BookingCannotBeAmended,
    BookingNotFound,
    BookingConfirmation,
    InsufficientAllotment,
    AllotmentExceeded,
    PriceHasIncreased,
    PriceHasChanged,
    StopSales,
    MinimumStayViolated,
    InvalidCode,
    NoHealthyUpstream,
    Configuration,
    System,
    InvalidRequest,
    InvalidData,
    External,
    Undefined,
}

/// One catalog entry: a condition, the lower-case phrases identifying it, and
/// whether re-issuing the identical request is expected to succeed.
#[derive(Debug, Clone, Copy)]
pub struct ConditionRule {
    pub condition: KnownCondition,
    pub patterns: &'static [&'static str],
    pub retryable: bool,
}

const fn rule(
    condition: KnownCondition,
    patterns: &'static [&'static str],
    retryable: bool,
) -> ConditionRule {
    ConditionRule {
        condition,
        patterns,
        retryable,
    }
}

/// Evaluated top to bottom; the first rule with a matching phrase wins.
/// Explicit instructions and transient conditions come first, specific
/// product failures next, broad categories last.
pub const CONDITION_CATALOG: &[ConditionRule] = &[
    rule(
        KnownCondition::DoNotRetry,
        &["please do not retry again", "please do not try again"],
        false,
    ),
    rule(
        KnownCondition::RateLimitExceeded,
        &["rate limit exceeded", "rate limits exceeded", "too many requests"],
        true,
    ),
    rule(KnownCondition::QuotaExceeded, &["quota exceeded"], true),
    rule(
        KnownCondition::ReservationUnreachable,
        &["reservation does not exist or the agency does not access"],
        false,
    ),
    rule(
        KnownCondition::CheckInInPast,
        &["cannot cancel/modify a booking which has a check-in date in the past"],
        false,
    ),
    rule(
        KnownCondition::CancellationAfterCheckIn,
        &["cannot cancel a booking after the check-in"],
        false,
    ),
    rule(
        KnownCondition::CancellationNotAllowed,
        &["hotel does not allow cancellations"],
        false,
    ),
    rule(
        KnownCondition::BookingCannotBeAmended,
        &["this booking cannot be amended"],
        false,
    ),
    rule(
        KnownCondition::BookingNotFound,
        &["booking does not exist"],
        false,
    ),
    rule(
        KnownCondition::BookingConfirmation,
        &["booking confirmation error"],
        false,
    ),
    rule(
        KnownCondition::InsufficientAllotment,
        &["insufficient allotment"],
        false,
    ),
    rule(
        KnownCondition::AllotmentExceeded,
        &["allotment exceeded"],
        false,
    ),
    rule(
        KnownCondition::PriceHasIncreased,
        &["price has increased"],
        false,
    ),
    rule(KnownCondition::PriceHasChanged, &["price has changed"], false),
    rule(KnownCondition::StopSales, &["stop sales"], false),
    rule(
        KnownCondition::MinimumStayViolated,
        &["minimum stay violated"],
        false,
    ),
    rule(KnownCondition::InvalidCode, &["code is invalid"], false),
    rule(
        KnownCondition::NoHealthyUpstream,
        &["no healthy upstream"],
        false,
    ),
    rule(
        KnownCondition::Configuration,
        &["configuration error"],
        false,
    ),
    rule(KnownCondition::System, &["system error"], false),
    rule(KnownCondition::InvalidRequest, &["invalid request"], false),
    rule(KnownCondition::InvalidData, &["invalid data"], false),
    rule(KnownCondition::External, &["external error"], false),
];

impl KnownCondition {
    pub fn is_retryable(self) -> bool {
        CONDITION_CATALOG
            .iter()
            .find(|rule| rule.condition == self)
            .map_or(false, |rule| rule.retryable)
    }

    pub fn description(self) -> &'static str {
        match self {
            KnownCondition::DoNotRetry => "please do not retry again",
            KnownCondition::RateLimitExceeded => "rate limits exceeded",
            KnownCondition::QuotaExceeded => "quota exceeded",
            KnownCondition::ReservationUnreachable => {
                "reservation does not exist or the agency does not access"
            }
            KnownCondition::CheckInInPast => {
                "cannot cancel/modify a booking which has a check-in date in the past"
            }
            KnownCondition::CancellationAfterCheckIn => {
                "cannot cancel a booking after the check-in"
            }
            KnownCondition::CancellationNotAllowed => "hotel does not allow cancellations",
            KnownCondition::BookingCannotBeAmended => "this booking cannot be amended",
            KnownCondition::BookingNotFound => "booking does not exist",
            KnownCondition::BookingConfirmation => "booking confirmation error",
            KnownCondition::InsufficientAllotment => "insufficient allotment",
            KnownCondition::AllotmentExceeded => "allotment exceeded",
            KnownCondition::PriceHasIncreased => "price has increased",
            KnownCondition::PriceHasChanged => "price has changed",
            KnownCondition::StopSales => "stop sales",
            KnownCondition::MinimumStayViolated => "minimum stay violated",
            KnownCondition::InvalidCode => "code is invalid",
            KnownCondition::NoHealthyUpstream => "no healthy upstream",
            KnownCondition::Configuration => "configuration error",
            KnownCondition::System => "system error",
            KnownCondition::InvalidRequest => "invalid request",
            KnownCondition::InvalidData => "invalid data",
            KnownCondition::External => "external error",
            KnownCondition::Undefined => "undefined error",
        }
    }
}

/// Match a free-text upstream message against the catalog.
pub fn classify_message(message: &str) -> KnownCondition {
    let lowered = message.to_lowercase();
    CONDITION_CATALOG
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lowered.contains(p)))
        .map_or(KnownCondition::Undefined, |rule| rule.condition)
}

/// A decoded upstream failure. Built once per failed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    /// Absent for the short `{"error": ...}` body shape.
    pub code: Option<ErrorCode>,
    pub message: String,
    pub status_code: u16,
    pub condition: KnownCondition,
    pub is_retryable: bool,
    pub audit: Option<AuditData>,
}

impl ErrorEnvelope {
    fn new(
        code: Option<ErrorCode>,
        message: String,
        status_code: u16,
        audit: Option<AuditData>,
    ) -> Self {
        let condition = classify_message(&message);
        ErrorEnvelope {
            code,
            message,
            status_code,
            condition,
            is_retryable: condition.is_retryable(),
            audit,
        }
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code.map_or("", |c| c.as_str());
        write!(
            f,
            "code={},statusCode={},message={}",
            code, self.status_code, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {}

#[derive(Deserialize)]
struct ShortEnvelope {
    error: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LongEnvelope {
    #[serde(default)]
    audit_data: Option<Box<RawValue>>,
    code: ErrorCode,
    message: String,
}

/// Decode the body of a response whose status is above 399.
///
/// Tries the short `{"error": ...}` shape first, then the long
/// `{"auditData", "code", "message"}` shape. Bodies matching neither become
/// `ApiError::Undefined`. Unreadable audit metadata is dropped rather than
/// failing the decode.
pub fn decode_error(status_code: u16, body: &[u8]) -> ApiError {
    if let Ok(short) = serde_json::from_slice::<ShortEnvelope>(body) {
        return ApiError::Upstream(ErrorEnvelope::new(None, short.error, status_code, None));
    }

    if let Ok(long) = serde_json::from_slice::<LongEnvelope>(body) {
        let audit = long
            .audit_data
            .and_then(|raw| serde_json::from_str::<AuditData>(raw.get()).ok());
        return ApiError::Upstream(ErrorEnvelope::new(
            Some(long.code),
            long.message,
            status_code,
            audit,
        ));
    }

    ApiError::Undefined {
        status_code,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

// Top-level error returned by every client operation
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFault),

    #[error("Upstream error: {0}")]
    Upstream(ErrorEnvelope),

    #[error("Undefined error: status {status_code}")]
    Undefined { status_code: u16, body: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Client error: {0}")]
    ClientError(String),
}

impl ApiError {
    /// Transient failures: classified upstream conditions and lost connections.
    ///
    /// A lost connection may still have reached the upstream, so the transport
    /// only acts on a retryable `NetworkError` for idempotent methods. A
    /// dropped POST such as a booking confirmation is never re-sent.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Upstream(envelope) => envelope.is_retryable,
            ApiError::NetworkError(_) => true,
            _ => false,
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Upstream(envelope) => envelope.code,
            _ => None,
        }
    }

    pub fn is_error_code(&self, code: ErrorCode) -> bool {
        self.error_code() == Some(code)
    }

    pub fn condition(&self) -> Option<KnownCondition> {
        match self {
            ApiError::Upstream(envelope) => Some(envelope.condition),
            ApiError::Undefined { .. } => Some(KnownCondition::Undefined),
            _ => None,
        }
    }

    /// Failures raised before or after the exchange that must never be retried.
    pub(crate) fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_)
                | ApiError::DecodeError(_)
                | ApiError::EncodeError(_)
                | ApiError::ClientError(_)
        )
    }
}

// Errors raised while building a client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}
