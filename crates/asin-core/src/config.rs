//! Redirector configuration
//!
//! Loaded from JSON by the CLI (`--config`) and by the wasm bindings
//! (`init`). Every field has a default, so `{}` is a valid config.

use serde::{Deserialize, Serialize};

use crate::canonical::QueryPolicy;
use crate::types::RequestType;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Redirector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RedirectConfig {
    /// Treatment of query strings on canonical URLs.
    pub query_policy: QueryPolicy,
    /// Only act on navigations reported as complete.
    pub require_complete: bool,
    /// Resource types the redirector acts on.
    #[serde(with = "resource_types")]
    pub resource_types: RequestType,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            query_policy: QueryPolicy::Strip,
            require_complete: true,
            resource_types: RequestType::MAIN_FRAME,
        }
    }
}

impl RedirectConfig {
    /// Parse a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// `RequestType` as a list of browser resource type names.
mod resource_types {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::RequestType;

    pub fn serialize<S: Serializer>(mask: &RequestType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(mask.names())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<RequestType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut mask = RequestType::empty();
        for name in &names {
            mask |= RequestType::from_browser_name(name)
                .ok_or_else(|| D::Error::custom(format!("unknown resource type {name:?}")))?;
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(RedirectConfig::from_json("{}").unwrap(), RedirectConfig::default());
    }

    #[test]
    fn test_parse_fields() {
        let config = RedirectConfig::from_json(
            r#"{"queryPolicy":"keep","requireComplete":false,"resourceTypes":["main_frame","sub_frame"]}"#,
        )
        .unwrap();
        assert_eq!(config.query_policy, QueryPolicy::Keep);
        assert!(!config.require_complete);
        assert_eq!(config.resource_types, RequestType::DOCUMENT);
    }

    #[test]
    fn test_round_trip_default() {
        let json = serde_json::to_string_pretty(&RedirectConfig::default()).unwrap();
        assert!(json.contains("\"main_frame\""));
        assert!(json.contains("\"strip\""));
        assert_eq!(RedirectConfig::from_json(&json).unwrap(), RedirectConfig::default());
    }

    #[test]
    fn test_rejects_unknown() {
        assert!(RedirectConfig::from_json(r#"{"resourceTypes":["nope"]}"#).is_err());
        assert!(RedirectConfig::from_json(r#"{"host":"amazon.com"}"#).is_err());
        assert!(RedirectConfig::from_json(r#"{"queryPolicy":"drop"}"#).is_err());
    }
}
