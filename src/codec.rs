// Scalar codec layer
// Converts between the raw JSON tokens the upstream API emits and typed values.
// Every wire quirk is one `ScalarKind`, and each kind owns an explicit
// decode/encode pair. The serde newtypes in `encoding` only delegate here.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// chrono layout for date-only fields (`2024-04-02`).
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
/// chrono layout for millisecond timestamps (`2024-04-02 10:15:30.125`).
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// Fraction digits emitted for money amounts.
pub const MONEY_SCALE: u32 = 2;

const DATE_LAYOUT_HINT: &str = "YYYY-MM-DD";
const TIMESTAMP_LAYOUT_HINT: &str = "YYYY-MM-DD HH:MM:SS.mmm";
const RFC3339_LAYOUT_HINT: &str = "RFC 3339";

// Error types for scalar decoding/encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed {kind} literal {token:?}: {reason}")]
    Malformed {
        kind: &'static str,
        token: String,
        reason: String,
    },

    #[error("Malformed {kind} literal {token:?}: expected layout {layout}")]
    Layout {
        kind: &'static str,
        token: String,
        layout: &'static str,
    },

    #[error("Cannot encode {value} value as {kind}")]
    KindMismatch {
        kind: &'static str,
        value: &'static str,
    },
}

impl CodecError {
    fn malformed(kind: ScalarKind, token: &str, reason: impl ToString) -> Self {
        CodecError::Malformed {
            kind: kind.name(),
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    fn layout(kind: ScalarKind, token: &str, layout: &'static str) -> Self {
        CodecError::Layout {
            kind: kind.name(),
            token: token.to_string(),
            layout,
        }
    }
}

/// The closed set of non-native wire encodings used by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Decimal amount, bare token, always two fraction digits on output.
    Money,
    /// Quoted `YYYY-MM-DD`.
    DateOnly,
    /// Quoted `YYYY-MM-DD HH:MM:SS.mmm`.
    DateTimeMillis,
    /// Quoted RFC 3339 timestamp.
    DateTimeOffset,
    /// Quoted comma-joined integers.
    CommaListInt,
    /// Quoted comma-joined strings.
    CommaListString,
    /// Float sent as a quoted string. `decimals` fixes the output precision.
    QuotedFloat { decimals: Option<usize> },
    /// Integer sent as a quoted string.
    QuotedInt,
}

/// A decoded scalar. Each `ScalarKind` produces exactly one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Money(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Ints(Vec<i64>),
    Strings(Vec<String>),
    Float(f64),
    Int(i64),
}

impl ScalarValue {
    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            ScalarValue::Money(_) => "money",
            ScalarValue::Date(_) => "date",
            ScalarValue::DateTime(_) => "datetime",
            ScalarValue::DateTimeOffset(_) => "datetime-offset",
            ScalarValue::Ints(_) => "integer-list",
            ScalarValue::Strings(_) => "string-list",
            ScalarValue::Float(_) => "float",
            ScalarValue::Int(_) => "integer",
        }
    }
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Money => "Money",
            ScalarKind::DateOnly => "DateOnly",
            ScalarKind::DateTimeMillis => "DateTimeMillis",
            ScalarKind::DateTimeOffset => "DateTimeOffset",
            ScalarKind::CommaListInt => "CommaList<int>",
            ScalarKind::CommaListString => "CommaList<string>",
            ScalarKind::QuotedFloat { .. } => "QuotedFloat",
            ScalarKind::QuotedInt => "QuotedInt",
        }
    }

    /// Whether the wire token is a JSON string. Only money travels bare.
    pub fn is_quoted(&self) -> bool {
        !matches!(self, ScalarKind::Money)
    }

    /// Decode a raw JSON token (quoted or bare) into a typed value.
    pub fn decode(&self, raw: &[u8]) -> Result<ScalarValue, CodecError> {
        let token = unquote(raw).map_err(|reason| {
            CodecError::malformed(*self, &String::from_utf8_lossy(raw), reason)
        })?;

        match *self {
            ScalarKind::Money => {
                let amount =
                    parse_decimal(&token).map_err(|e| CodecError::malformed(*self, &token, e))?;
                format_money(amount)?;
                Ok(ScalarValue::Money(amount))
            }
            // chrono accepts unpadded fields, signed years and a missing
            // fraction, so the token must also be exactly what we would print.
            ScalarKind::DateOnly => NaiveDate::parse_from_str(&token, DATE_LAYOUT)
                .ok()
                .filter(|date| date.format(DATE_LAYOUT).to_string() == token)
                .map(ScalarValue::Date)
                .ok_or_else(|| CodecError::layout(*self, &token, DATE_LAYOUT_HINT)),
            ScalarKind::DateTimeMillis => NaiveDateTime::parse_from_str(&token, TIMESTAMP_LAYOUT)
                .ok()
                .filter(|ts| ts.format(TIMESTAMP_LAYOUT).to_string() == token)
                .map(ScalarValue::DateTime)
                .ok_or_else(|| CodecError::layout(*self, &token, TIMESTAMP_LAYOUT_HINT)),
            ScalarKind::DateTimeOffset => DateTime::parse_from_rfc3339(&token)
                .map(ScalarValue::DateTimeOffset)
                .map_err(|_| CodecError::layout(*self, &token, RFC3339_LAYOUT_HINT)),
            ScalarKind::CommaListInt => {
                let mut values = Vec::new();
                for segment in split_segments(&token) {
                    let n = segment.parse::<i64>().map_err(|e| {
                        CodecError::malformed(*self, &token, format!("segment {segment:?}: {e}"))
                    })?;
                    values.push(n);
                }
                Ok(ScalarValue::Ints(values))
            }
            ScalarKind::CommaListString => Ok(ScalarValue::Strings(
                split_segments(&token)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            )),
            ScalarKind::QuotedFloat { .. } => {
                let value = token
                    .parse::<f64>()
                    .map_err(|e| CodecError::malformed(*self, &token, e))?;
                if !value.is_finite() {
                    return Err(CodecError::malformed(*self, &token, "not a finite number"));
                }
                Ok(ScalarValue::Float(value))
            }
            ScalarKind::QuotedInt => token
                .parse::<i64>()
                .map(ScalarValue::Int)
                .map_err(|e| CodecError::malformed(*self, &token, e)),
        }
    }

    /// Render the textual form of a value, without the surrounding quotes.
    pub fn format(&self, value: &ScalarValue) -> Result<String, CodecError> {
        let text = match (*self, value) {
            (ScalarKind::Money, ScalarValue::Money(amount)) => format_money(*amount)?,
            (ScalarKind::DateOnly, ScalarValue::Date(date)) => {
                date.format(DATE_LAYOUT).to_string()
            }
            (ScalarKind::DateTimeMillis, ScalarValue::DateTime(ts)) => {
                ts.format(TIMESTAMP_LAYOUT).to_string()
            }
            (ScalarKind::DateTimeOffset, ScalarValue::DateTimeOffset(ts)) => {
                ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }
            (ScalarKind::CommaListInt, ScalarValue::Ints(values)) => values
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(","),
            (ScalarKind::CommaListString, ScalarValue::Strings(values)) => values.join(","),
            (ScalarKind::QuotedFloat { decimals }, ScalarValue::Float(value)) => match decimals {
                Some(precision) => format!("{value:.precision$}"),
                None => value.to_string(),
            },
            (ScalarKind::QuotedInt, ScalarValue::Int(value)) => value.to_string(),
            (kind, value) => {
                return Err(CodecError::KindMismatch {
                    kind: kind.name(),
                    value: value.variant_name(),
                })
            }
        };
        Ok(text)
    }

    /// Encode a value as the exact JSON token sent on the wire.
    pub fn encode(&self, value: &ScalarValue) -> Result<String, CodecError> {
        let text = self.format(value)?;
        if self.is_quoted() {
            Ok(quote(&text))
        } else {
            Ok(text)
        }
    }
}

/// Fixed two-place rendering of a money amount.
///
/// Rounds half away from zero, and never prints a negative zero. Amounts
/// whose magnitude leaves no room for two fraction digits in the 96-bit
/// mantissa (about 7.9e26 and above) are rejected.
pub fn format_money(amount: Decimal) -> Result<String, CodecError> {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(MONEY_SCALE);
    if rounded.scale() != MONEY_SCALE {
        return Err(CodecError::malformed(
            ScalarKind::Money,
            &amount.to_string(),
            "too large to carry two fraction digits",
        ));
    }
    Ok(rounded.to_string())
}

// Only JSON number literals are money; `Decimal::from_str` alone would also
// take forms like `1_000.50`.
fn parse_decimal(token: &str) -> Result<Decimal, String> {
    serde_json::Number::from_str(token).map_err(|e| e.to_string())?;
    let parsed = if token.contains(['e', 'E']) {
        Decimal::from_scientific(token)
    } else {
        Decimal::from_str(token)
    };
    parsed.map_err(|e| e.to_string())
}

// Empty text is the empty list; anything else splits on every comma.
fn split_segments(token: &str) -> Vec<&str> {
    if token.trim().is_empty() {
        return Vec::new();
    }
    token.split(',').map(str::trim).collect()
}

/// Strip the JSON string wrapping from a raw token, unescaping its content.
/// Bare tokens are returned as-is. A doubly quoted payload loses both layers.
pub(crate) fn unquote(raw: &[u8]) -> Result<String, String> {
    let text = std::str::from_utf8(raw).map_err(|e| e.to_string())?.trim();
    if !text.starts_with('"') {
        return Ok(text.to_string());
    }
    let inner: String = serde_json::from_str(text).map_err(|e| e.to_string())?;
    match inner
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(inner),
    }
}

fn quote(text: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}
