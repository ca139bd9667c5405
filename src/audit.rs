// Diagnostic metadata attached by the upstream to most responses and to
// long-form error bodies.

use crate::codec::{unquote, ScalarKind, ScalarValue};
use crate::encoding::Timestamp;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::time::Duration;

/// Request timing, server and environment details reported by the upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditData {
    pub process_time: ProcessTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(rename = "requestHost")]
    pub request_hosts: Hosts,
    #[serde(rename = "environment")]
    pub environments: Environments,
    pub server_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub release: String,
    pub token: String,
    pub internal: String,
}

/// Server-side processing time, transmitted as quoted milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProcessTime(pub Duration);

impl Serialize for ProcessTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.as_millis().to_string())
    }
}

impl<'de> Deserialize<'de> for ProcessTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Box<RawValue> = Deserialize::deserialize(deserializer)?;
        match ScalarKind::QuotedInt
            .decode(raw.get().as_bytes())
            .map_err(de::Error::custom)?
        {
            ScalarValue::Int(ms) => u64::try_from(ms)
                .map(|ms| ProcessTime(Duration::from_millis(ms)))
                .map_err(|_| de::Error::custom(format!("negative process time {ms}"))),
            other => Err(de::Error::custom(format!(
                "unexpected process time {other:?}"
            ))),
        }
    }
}

/// Hosts that served the request. Sent as `"10.0.0.1, 10.0.0.2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hosts(pub Vec<String>);

impl Serialize for Hosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(","))
    }
}

impl<'de> Deserialize<'de> for Hosts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Box<RawValue> = Deserialize::deserialize(deserializer)?;
        let text = unquote(raw.get().as_bytes()).map_err(de::Error::custom)?;
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        decode_strings(&compact).map(Hosts)
    }
}

/// Environment tags. Sent either as `"[int, test]"` or as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environments(pub Vec<String>);

impl Serialize for Environments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("[{}]", self.0.join(",")))
    }
}

impl<'de> Deserialize<'de> for Environments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Box<RawValue> = Deserialize::deserialize(deserializer)?;
        if raw.get().trim_start().starts_with('[') {
            let items: Vec<String> =
                serde_json::from_str(raw.get()).map_err(de::Error::custom)?;
            return Ok(Environments(items));
        }
        let text = unquote(raw.get().as_bytes()).map_err(de::Error::custom)?;
        let inner = text
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(&text);
        let compact: String = inner.chars().filter(|c| !c.is_whitespace()).collect();
        decode_strings(&compact).map(Environments)
    }
}

fn decode_strings<E: de::Error>(text: &str) -> Result<Vec<String>, E> {
    let quoted = serde_json::to_string(text).map_err(E::custom)?;
    match ScalarKind::CommaListString
        .decode(quoted.as_bytes())
        .map_err(E::custom)?
    {
        ScalarValue::Strings(items) => Ok(items),
        other => Err(E::custom(format!("unexpected list {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUDIT: &str = r#"{
        "processTime": "62",
        "timestamp": "2024-04-01 12:47:10.411",
        "requestHost": "10.185.88.161, 10.185.80.20",
        "serverId": "ip-10-185-88-161.eu-west-1.compute.internal",
        "environment": "[awseuwest1, awseuwest1a, ip_10_185_88_161]",
        "release": "6f2b0e2a0e2d",
        "token": "C7E1F5E3DF4A4D6E9E4B5C1D2F3A4B5C",
        "internal": "0|06~~21e12c~1630615603|EN|01|1|1|||||||||"
    }"#;

    #[test]
    fn test_decode_audit_data() {
        let audit: AuditData = serde_json::from_str(AUDIT).unwrap();
        assert_eq!(audit.process_time, ProcessTime(Duration::from_millis(62)));
        assert_eq!(
            audit.timestamp.map(|ts| ts.0.to_string()),
            Some("2024-04-01 12:47:10.411".to_string())
        );
        assert_eq!(audit.request_hosts.0, vec!["10.185.88.161", "10.185.80.20"]);
        assert_eq!(
            audit.environments.0,
            vec!["awseuwest1", "awseuwest1a", "ip_10_185_88_161"]
        );
        assert_eq!(audit.release, "6f2b0e2a0e2d");
    }

    #[test]
    fn test_environment_as_json_array() {
        let audit: AuditData =
            serde_json::from_str(r#"{"environment": ["int", "test"]}"#).unwrap();
        assert_eq!(audit.environments.0, vec!["int", "test"]);
    }

    #[test]
    fn test_partial_audit_uses_defaults() {
        let audit: AuditData = serde_json::from_str(r#"{"serverId": "srv-1"}"#).unwrap();
        assert_eq!(audit.server_id, "srv-1");
        assert!(audit.request_hosts.0.is_empty());
        assert_eq!(audit.process_time, ProcessTime::default());
    }

    #[test]
    fn test_bad_process_time_is_rejected() {
        assert!(serde_json::from_str::<AuditData>(r#"{"processTime": "fast"}"#).is_err());
    }
}
