// Typed client for the Hotelbeds hotel distribution APIs

pub mod audit;
pub mod booking;
pub mod client;
pub mod codec;
pub mod config;
pub mod content;
pub mod encoding;
pub mod errors;
pub mod phone;
pub mod signing;
pub mod transport;
pub mod validation;

// Re-export key types for convenience
pub use audit::AuditData;
pub use client::{BookingApi, ContentApi, HotelbedsApi, HotelbedsClient};
pub use codec::{CodecError, ScalarKind, ScalarValue};
pub use config::{ClientConfig, RateLimitConfig, RetryConfig};
pub use encoding::{
    CommaList, Coordinate, Date, Distance, FloatRate, Money, Order, Radius, Timestamp,
    TimestampTz, Unit,
};
pub use errors::{ApiError, ClientError, ErrorCode, ErrorEnvelope, KnownCondition};
pub use phone::parse_e164;
pub use transport::ClientStats;
pub use validation::{Validate, ValidationFault};
