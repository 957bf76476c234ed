//! Explorer settings with environment overrides.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ExploreError, Result};

pub const DEFAULT_QUERY: &str = "MATCH (n) RETURN n LIMIT 10";
pub const DEFAULT_FALLBACK_LIMIT: usize = 10;

pub const ENV_DEFAULT_QUERY: &str = "LOREGRAPH_DEFAULT_QUERY";
pub const ENV_FALLBACK_LIMIT: &str = "LOREGRAPH_FALLBACK_LIMIT";
pub const ENV_ENDPOINT_RESOLUTION: &str = "LOREGRAPH_ENDPOINT_RESOLUTION";

/// When relationship endpoints get mapped from raw ids to display names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointResolution {
    /// Collect every node first, then resolve all relationships.
    #[default]
    TwoPass,
    /// Resolve each relationship with whatever names are known when it is
    /// visited. An endpoint whose node shows up later keeps its raw id.
    VisitOrder,
}

impl EndpointResolution {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-pass" | "two_pass" | "twopass" => Ok(Self::TwoPass),
            "visit-order" | "visit_order" | "single-pass" => Ok(Self::VisitOrder),
            other => Err(ExploreError::Config(format!(
                "unknown endpoint resolution `{other}` (expected two-pass|visit-order)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Query text a fresh session starts with.
    pub default_query: String,
    /// Records shown by the enumerated fallback when a table can't be built.
    pub fallback_limit: usize,
    pub endpoint_resolution: EndpointResolution,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            endpoint_resolution: EndpointResolution::default(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults,
    /// malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(query) = lookup(ENV_DEFAULT_QUERY).filter(|q| !q.trim().is_empty()) {
            config.default_query = query;
        }
        if let Some(raw) = lookup(ENV_FALLBACK_LIMIT) {
            config.fallback_limit = parse_count(ENV_FALLBACK_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENDPOINT_RESOLUTION) {
            config.endpoint_resolution = EndpointResolution::parse(&raw)?;
        }
        Ok(config)
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| ExploreError::Config(format!("{key}=`{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ExplorerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.default_query, "MATCH (n) RETURN n LIMIT 10");
        assert_eq!(config.endpoint_resolution, EndpointResolution::TwoPass);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ExplorerConfig::from_lookup(lookup(&[
            (ENV_FALLBACK_LIMIT, " 5 "),
            (ENV_ENDPOINT_RESOLUTION, "Visit-Order"),
            (ENV_DEFAULT_QUERY, "MATCH (c:Character) RETURN c"),
        ]))
        .unwrap();
        assert_eq!(config.fallback_limit, 5);
        assert_eq!(config.endpoint_resolution, EndpointResolution::VisitOrder);
        assert_eq!(config.default_query, "MATCH (c:Character) RETURN c");
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(ExplorerConfig::from_lookup(lookup(&[(ENV_FALLBACK_LIMIT, "ten")])).is_err());
        let err = ExplorerConfig::from_lookup(lookup(&[(ENV_ENDPOINT_RESOLUTION, "lazy")]))
            .unwrap_err();
        assert!(err.to_string().contains("two-pass|visit-order"));
    }
}
