pub mod list;
pub mod openai;
pub mod prompt;
pub mod telegram;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned resource identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ResourceId(pub i64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ResourceId)
    }
}

impl ResourceId {
    /// Detail page of this resource, relative to the console origin.
    pub fn detail_path(&self) -> String {
        format!("/ui/resources/{}", self.0)
    }

    /// API path of a per-resource action, e.g. `openai/key`.
    pub fn action_path(&self, action: &str) -> String {
        format!("/ui/resources/{}/{}", self.0, action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Openai,
    Telegram,
    Prompt,
    Web,
    #[serde(other)]
    Other,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Openai => write!(f, "openai"),
            ResourceKind::Telegram => write!(f, "telegram"),
            ResourceKind::Prompt => write!(f, "prompt"),
            ResourceKind::Web => write!(f, "web"),
            ResourceKind::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ResourceKind::Openai),
            "telegram" => Ok(ResourceKind::Telegram),
            "prompt" => Ok(ResourceKind::Prompt),
            "web" => Ok(ResourceKind::Web),
            "other" => Ok(ResourceKind::Other),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// Where the console should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
}

/// Input that should have held a whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAnInteger;

/// Reads an optional integer input. Blank is `Ok(None)`; anything that is not
/// a whole number within `i64` is rejected. `"3.0"` counts as 3.
pub fn parse_optional_int(raw: &str) -> Result<Option<i64>, NotAnInteger> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let n: f64 = raw.parse().map_err(|_| NotAnInteger)?;
    // i64::MAX is not representable; 2^63 is the first value out of range
    if !n.is_finite() || n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return Err(NotAnInteger);
    }
    Ok(Some(n as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int(""), Ok(None));
        assert_eq!(parse_optional_int("   "), Ok(None));
        assert_eq!(parse_optional_int(" 42 "), Ok(Some(42)));
        assert_eq!(parse_optional_int("3.0"), Ok(Some(3)));
        assert_eq!(parse_optional_int("-7"), Ok(Some(-7)));
        assert_eq!(parse_optional_int("3.5"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("abc"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("NaN"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("inf"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("1e30"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("-1e30"), Err(NotAnInteger));
        assert_eq!(parse_optional_int("1e15"), Ok(Some(1_000_000_000_000_000)));
    }

    #[test]
    fn test_unknown_kind_deserializes_to_other() {
        let kind: ResourceKind = serde_json::from_str("\"tilda\"").unwrap();
        assert_eq!(kind, ResourceKind::Other);
        let kind: ResourceKind = serde_json::from_str("\"telegram\"").unwrap();
        assert_eq!(kind, ResourceKind::Telegram);
        assert_eq!(serde_json::to_string(&ResourceKind::Openai).unwrap(), "\"openai\"");
    }

    #[test]
    fn test_paths() {
        let id = ResourceId(42);
        assert_eq!(id.detail_path(), "/ui/resources/42");
        assert_eq!(id.action_path("prompt/save"), "/ui/resources/42/prompt/save");
        assert_eq!("7".parse::<ResourceId>().unwrap(), ResourceId(7));
    }
}
