// Validation layer
// Fail-fast pre-flight checks run before any request leaves the client.

use thiserror::Error;

/// A single field-level rejection.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error(
    "field={field},required={required},min={min},max={max},allow=[{}]",
    .allow.join(",")
)]
pub struct ValidationFault {
    pub field: String,
    pub required: bool,
    pub min: i64,
    pub max: i64,
    pub allow: Vec<String>,
}

impl ValidationFault {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationFault {
            field: field.into(),
            required: true,
            ..Default::default()
        }
    }

    pub fn range(field: impl Into<String>, min: i64, max: i64) -> Self {
        ValidationFault {
            field: field.into(),
            min,
            max,
            ..Default::default()
        }
    }

    pub fn allowed<I, S>(field: impl Into<String>, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationFault {
            field: field.into(),
            allow: allow.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Implemented by request payloads that carry client-side guardrails.
/// Returns the first violated rule.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationFault>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationFault> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }
}

pub fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationFault> {
    if value < min || value > max {
        return Err(ValidationFault::range(field, min, max));
    }
    Ok(())
}

/// Range check applied only when the field is set.
pub fn check_optional_range(
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Result<(), ValidationFault> {
    match value {
        Some(value) => check_range(field, value, min, max),
        None => Ok(()),
    }
}

pub fn check_max_len(field: &str, len: usize, max: usize) -> Result<(), ValidationFault> {
    if len > max {
        return Err(ValidationFault::range(field, 0, max as i64));
    }
    Ok(())
}

pub fn check_allowed(field: &str, value: &str, allow: &[&str]) -> Result<(), ValidationFault> {
    if !allow.contains(&value) {
        return Err(ValidationFault::allowed(field, allow.iter().copied()));
    }
    Ok(())
}

pub fn check_required(field: &str, present: bool) -> Result<(), ValidationFault> {
    if !present {
        return Err(ValidationFault::required(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_display_format() {
        let fault = ValidationFault::range("Radius", 0, 200);
        assert_eq!(
            fault.to_string(),
            "field=Radius,required=false,min=0,max=200,allow=[]"
        );

        let fault = ValidationFault::allowed("Unit", ["mi", "km"]);
        assert_eq!(
            fault.to_string(),
            "field=Unit,required=false,min=0,max=0,allow=[mi,km]"
        );

        let fault = ValidationFault::required("Latitude");
        assert_eq!(
            fault.to_string(),
            "field=Latitude,required=true,min=0,max=0,allow=[]"
        );
    }

    #[test_case(0, false; "below")]
    #[test_case(1, true; "lower bound")]
    #[test_case(50, true; "upper bound")]
    #[test_case(51, false; "above")]
    fn test_check_range(value: i64, ok: bool) {
        assert_eq!(check_range("MaxRooms", value, 1, 50).is_ok(), ok);
    }

    #[test]
    fn test_optional_range_skips_unset() {
        assert!(check_optional_range("MaxHotels", None, 1, 2000).is_ok());
        assert!(check_optional_range("MaxHotels", Some(2001), 1, 2000).is_err());
    }

    #[test]
    fn test_check_allowed() {
        assert!(check_allowed("Unit", "km", &["mi", "km"]).is_ok());
        let err = check_allowed("Unit", "ft", &["mi", "km"]).unwrap_err();
        assert_eq!(err.allow, vec!["mi", "km"]);
    }

    #[test]
    fn test_check_max_len() {
        assert!(check_max_len("Hotels", 2000, 2000).is_ok());
        assert_eq!(
            check_max_len("Hotels", 2001, 2000).unwrap_err(),
            ValidationFault::range("Hotels", 0, 2000)
        );
    }
}
