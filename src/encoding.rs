// Typed wrappers for the upstream's non-native JSON fields.
// Each wrapper names its `ScalarKind` and forwards to its decode/encode pair.

use crate::codec::{format_money, CodecError, ScalarKind, ScalarValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use std::str::FromStr;

fn serialize_scalar<S: Serializer>(
    kind: ScalarKind,
    value: &ScalarValue,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let text = kind.format(value).map_err(ser::Error::custom)?;
    if kind.is_quoted() {
        serializer.serialize_str(&text)
    } else {
        // Bare numeric token, emitted verbatim so the fixed scale survives.
        let raw = RawValue::from_string(text).map_err(ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

fn deserialize_scalar<'de, D: Deserializer<'de>>(
    kind: ScalarKind,
    deserializer: D,
) -> Result<ScalarValue, D::Error> {
    let raw: Box<RawValue> = Deserialize::deserialize(deserializer)?;
    kind.decode(raw.get().as_bytes()).map_err(de::Error::custom)
}

fn mismatch<E: de::Error>(kind: ScalarKind, value: &ScalarValue) -> E {
    // decode() only yields the variant belonging to its kind; kept for exhaustiveness.
    E::custom(format!("{} decoder produced {value:?}", kind.name()))
}

macro_rules! scalar_serde {
    ($ty:ty, $kind:expr, |$this:ident| $to:expr, $variant:ident($v:ident) => $from:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let $this = self;
                serialize_scalar($kind, &$to, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match deserialize_scalar($kind, deserializer)? {
                    ScalarValue::$variant($v) => $from,
                    other => Err(mismatch($kind, &other)),
                }
            }
        }
    };
}

/// Decimal currency amount, sent as a bare token with two fraction digits.
///
/// The fixed scale only survives textual serialization (`serde_json::to_string`
/// or `to_vec`). `serde_json::to_value` re-reads the token as an `f64`, so
/// `123.40` becomes `123.4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_money(self.0) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Money {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ScalarKind::Money.decode(s.as_bytes())? {
            ScalarValue::Money(amount) => Ok(Money(amount)),
            other => Err(CodecError::KindMismatch {
                kind: ScalarKind::Money.name(),
                value: other.variant_name(),
            }),
        }
    }
}

scalar_serde!(Money, ScalarKind::Money, |m| ScalarValue::Money(m.0), Money(v) => Ok(Money(v)));

/// Calendar date with `YYYY-MM-DD` layout.
///
/// The default value is "unset"; query encoders skip unset dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub NaiveDate);

impl Date {
    pub const UNSET: Date = Date(NaiveDate::MIN);

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(crate::codec::DATE_LAYOUT))
    }
}

impl FromStr for Date {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ScalarKind::DateOnly.decode(s.as_bytes())? {
            ScalarValue::Date(date) => Ok(Date(date)),
            other => Err(CodecError::KindMismatch {
                kind: ScalarKind::DateOnly.name(),
                value: other.variant_name(),
            }),
        }
    }
}

scalar_serde!(Date, ScalarKind::DateOnly, |d| ScalarValue::Date(d.0), Date(v) => Ok(Date(v)));

/// Millisecond-precision timestamp, `YYYY-MM-DD HH:MM:SS.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub NaiveDateTime);

scalar_serde!(Timestamp, ScalarKind::DateTimeMillis, |t| ScalarValue::DateTime(t.0), DateTime(v) => Ok(Timestamp(v)));

/// Timezone-aware RFC 3339 timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimestampTz(pub DateTime<FixedOffset>);

scalar_serde!(TimestampTz, ScalarKind::DateTimeOffset, |t| ScalarValue::DateTimeOffset(t.0), DateTimeOffset(v) => Ok(TimestampTz(v)));

/// Element types a `CommaList` can carry.
pub trait CommaElement: Sized + Clone {
    const KIND: ScalarKind;

    fn into_value(items: Vec<Self>) -> ScalarValue;
    fn from_value(value: ScalarValue) -> Option<Vec<Self>>;
}

impl CommaElement for i64 {
    const KIND: ScalarKind = ScalarKind::CommaListInt;

    fn into_value(items: Vec<Self>) -> ScalarValue {
        ScalarValue::Ints(items)
    }

    fn from_value(value: ScalarValue) -> Option<Vec<Self>> {
        match value {
            ScalarValue::Ints(items) => Some(items),
            _ => None,
        }
    }
}

impl CommaElement for String {
    const KIND: ScalarKind = ScalarKind::CommaListString;

    fn into_value(items: Vec<Self>) -> ScalarValue {
        ScalarValue::Strings(items)
    }

    fn from_value(value: ScalarValue) -> Option<Vec<Self>> {
        match value {
            ScalarValue::Strings(items) => Some(items),
            _ => None,
        }
    }
}

/// List transmitted as one quoted, comma-joined string.
/// An empty list travels as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommaList<T>(pub Vec<T>);

impl<T> Default for CommaList<T> {
    fn default() -> Self {
        CommaList(Vec::new())
    }
}

impl<T> CommaList<T> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<Vec<T>> for CommaList<T> {
    fn from(items: Vec<T>) -> Self {
        CommaList(items)
    }
}

impl<T: CommaElement> CommaList<T> {
    /// Joined text without quotes, as used in query strings and URL paths.
    pub fn joined(&self) -> String {
        T::KIND
            .format(&T::into_value(self.0.clone()))
            .unwrap_or_default()
    }
}

impl<T: CommaElement> Serialize for CommaList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_scalar(T::KIND, &T::into_value(self.0.clone()), serializer)
    }
}

impl<'de, T: CommaElement> Deserialize<'de> for CommaList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserialize_scalar(T::KIND, deserializer)?;
        match T::from_value(value.clone()) {
            Some(items) => Ok(CommaList(items)),
            None => Err(mismatch(T::KIND, &value)),
        }
    }
}

/// Latitude or longitude sent as a quoted float.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Coordinate(pub f64);

scalar_serde!(Coordinate, ScalarKind::QuotedFloat { decimals: None }, |c| ScalarValue::Float(c.0), Float(v) => Ok(Coordinate(v)));

/// Distance to a point of interest, quoted float.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

scalar_serde!(Distance, ScalarKind::QuotedFloat { decimals: None }, |d| ScalarValue::Float(d.0), Float(v) => Ok(Distance(v)));

/// Rate filter or min/max rate, quoted with two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct FloatRate(pub f64);

impl FloatRate {
    pub fn value(&self) -> f64 {
        self.0
    }
}

scalar_serde!(FloatRate, ScalarKind::QuotedFloat { decimals: Some(2) }, |r| ScalarValue::Float(r.0), Float(v) => Ok(FloatRate(v)));

/// Ordering rank sent as a quoted integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(pub i64);

scalar_serde!(Order, ScalarKind::QuotedInt, |o| ScalarValue::Int(o.0), Int(v) => Ok(Order(v)));

/// Search radius, quoted integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Radius(pub u32);

impl Radius {
    pub fn value(&self) -> u32 {
        self.0
    }
}

scalar_serde!(Radius, ScalarKind::QuotedInt, |r| ScalarValue::Int(i64::from(r.0)), Int(v) => {
    u32::try_from(v)
        .map(Radius)
        .map_err(|_| de::Error::custom(format!("radius {v} out of range")))
});

/// Distance unit of a geolocation filter. Unknown strings are kept so the
/// validation layer can reject them with a field-level fault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Miles,
    Kilometers,
    Other(String),
}

impl Unit {
    pub const ALLOWED: [&'static str; 2] = ["mi", "km"];

    pub fn as_str(&self) -> &str {
        match self {
            Unit::Miles => "mi",
            Unit::Kilometers => "km",
            Unit::Other(s) => s,
        }
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "mi" => Unit::Miles,
            "km" => Unit::Kilometers,
            _ => Unit::Other(s),
        }
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct RateFixture {
        selling_rate: Money,
        check_in: Date,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_rate: Option<FloatRate>,
    }

    #[test]
    fn test_money_serializes_as_bare_token() {
        let fixture = RateFixture {
            selling_rate: "123.4".parse().unwrap(),
            check_in: Date::from_ymd(2024, 4, 2).unwrap(),
            min_rate: Some(FloatRate(97.5)),
        };
        let json = serde_json::to_string(&fixture).unwrap();
        assert_eq!(
            json,
            r#"{"sellingRate":123.40,"checkIn":"2024-04-02","minRate":"97.50"}"#
        );
    }

    #[test]
    fn test_decodes_quoted_and_bare_money() {
        let quoted: RateFixture =
            serde_json::from_str(r#"{"sellingRate":"123.40","checkIn":"2024-04-02"}"#).unwrap();
        let bare: RateFixture =
            serde_json::from_str(r#"{"sellingRate":123.40,"checkIn":"2024-04-02"}"#).unwrap();
        assert_eq!(quoted, bare);
        assert_eq!(quoted.selling_rate.to_string(), "123.40");
        assert_eq!(quoted.check_in.to_string(), "2024-04-02");
        assert_eq!(quoted.min_rate, None);
    }

    #[test]
    fn test_money_scale_survives_text_serialization_only() {
        let money: Money = "123.4".parse().unwrap();
        assert_eq!(serde_json::to_vec(&money).unwrap(), b"123.40");
        assert_eq!(serde_json::to_value(money).unwrap(), json!(123.4));
    }

    #[test]
    fn test_money_beyond_two_place_range() {
        let money = Money(Decimal::MAX);
        assert!(serde_json::to_string(&money).is_err());
        assert_eq!(money.to_string(), Decimal::MAX.to_string());
    }

    #[test]
    fn test_null_optional_scalar() {
        let fixture: RateFixture = serde_json::from_str(
            r#"{"sellingRate":1,"checkIn":"2024-04-02","minRate":null}"#,
        )
        .unwrap();
        assert_eq!(fixture.min_rate, None);
    }

    #[test]
    fn test_bad_scalar_fails_the_document() {
        let err = serde_json::from_str::<RateFixture>(
            r#"{"sellingRate":"1.00","checkIn":"2024-04-02T00:00:00Z"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"), "{err}");
    }

    #[test]
    fn test_comma_list_fields() {
        let hotels: CommaList<i64> = serde_json::from_str(r#""6619,6613""#).unwrap();
        assert_eq!(hotels.0, vec![6619, 6613]);
        assert_eq!(serde_json::to_value(&hotels).unwrap(), json!("6619,6613"));
        assert_eq!(hotels.joined(), "6619,6613");

        let countries: CommaList<String> = serde_json::from_str(r#""ES,GB""#).unwrap();
        assert_eq!(countries.0, vec!["ES", "GB"]);

        assert!(serde_json::from_str::<CommaList<i64>>(r#""1,two""#).is_err());
    }

    #[test]
    fn test_quoted_number_wrappers() {
        assert_eq!(
            serde_json::from_str::<Coordinate>(r#""51.50""#).unwrap(),
            Coordinate(51.5)
        );
        assert_eq!(
            serde_json::from_str::<Distance>("120.5").unwrap(),
            Distance(120.5)
        );
        assert_eq!(serde_json::from_str::<Order>(r#""3""#).unwrap(), Order(3));
        assert_eq!(serde_json::to_string(&Radius(20)).unwrap(), r#""20""#);
        assert!(serde_json::from_str::<Radius>(r#""-1""#).is_err());
    }

    #[test]
    fn test_timestamps() {
        let ts: Timestamp = serde_json::from_str(r#""2024-04-02 10:15:30.125""#).unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            r#""2024-04-02 10:15:30.125""#
        );
        let tz: TimestampTz = serde_json::from_str(r#""2024-03-30T23:59:00+01:00""#).unwrap();
        assert_eq!(
            serde_json::to_string(&tz).unwrap(),
            r#""2024-03-30T23:59:00+01:00""#
        );
    }

    #[test]
    fn test_date_unset() {
        assert!(Date::default().is_unset());
        assert!(!Date::from_ymd(2024, 4, 2).unwrap().is_unset());
        assert!("2024-13-01".parse::<Date>().is_err());
    }

    #[test]
    fn test_unit_keeps_unknown_values() {
        assert_eq!(serde_json::from_str::<Unit>(r#""km""#).unwrap(), Unit::Kilometers);
        assert_eq!(
            serde_json::from_str::<Unit>(r#""yd""#).unwrap(),
            Unit::Other("yd".into())
        );
        assert_eq!(serde_json::to_string(&Unit::Miles).unwrap(), r#""mi""#);
    }
}
