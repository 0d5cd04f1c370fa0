//! Engine configuration
//!
//! Environment variables read by [`EngineConfig::from_env`]:
//! - `PLATFORM_CONTEXT_DEFAULT_LIMIT`: results when no limit is given (default: 10)
//! - `PLATFORM_CONTEXT_MAX_LIMIT`: hard cap on returned results (default: 50)
//! - `PLATFORM_CONTEXT_FUZZY`: enable the edit-distance fallback tier (default: false)
//! - `PLATFORM_CONTEXT_MAX_EDIT_DISTANCE`: fuzzy tier distance bound (default: 2)

use std::str::FromStr;

/// Configuration for the search engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Result count for absent or non-positive limits
    pub default_limit: usize,
    /// Upper bound for any requested limit
    pub max_limit: usize,
    /// Longest word prefix considered by compound-name fusion
    pub max_prefix_words: usize,
    /// All-words fallback runs while fewer candidates than this were found
    pub sparse_threshold: usize,
    /// Enable the edit-distance tier when nothing else matched
    pub fuzzy_fallback: bool,
    /// Maximum Levenshtein distance for the fuzzy tier
    pub max_edit_distance: usize,
    /// Minimum query length (chars) for the fuzzy tier
    pub min_fuzzy_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
            max_prefix_words: 4,
            sparse_threshold: 5,
            fuzzy_fallback: false,
            max_edit_distance: 2,
            min_fuzzy_length: 4,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `PLATFORM_CONTEXT_*` variables.
    /// Unparseable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_limit: parse_or(
                &lookup,
                "PLATFORM_CONTEXT_DEFAULT_LIMIT",
                defaults.default_limit,
            ),
            max_limit: parse_or(&lookup, "PLATFORM_CONTEXT_MAX_LIMIT", defaults.max_limit),
            fuzzy_fallback: lookup("PLATFORM_CONTEXT_FUZZY")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.fuzzy_fallback),
            max_edit_distance: parse_or(
                &lookup,
                "PLATFORM_CONTEXT_MAX_EDIT_DISTANCE",
                defaults.max_edit_distance,
            ),
            ..defaults
        }
    }

    /// Resolve a caller-supplied limit: absent or non-positive gives the
    /// default, anything else is capped at `max_limit`.
    pub fn effective_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.max_limit),
            _ => self.default_limit.min(self.max_limit),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_effective_limit() {
        let config = EngineConfig::default();
        assert_eq!(config.effective_limit(None), 10);
        assert_eq!(config.effective_limit(Some(0)), 10);
        assert_eq!(config.effective_limit(Some(-3)), 10);
        assert_eq!(config.effective_limit(Some(7)), 7);
        assert_eq!(config.effective_limit(Some(1000)), 50);
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("PLATFORM_CONTEXT_DEFAULT_LIMIT", "20"),
            ("PLATFORM_CONTEXT_FUZZY", "true"),
            ("PLATFORM_CONTEXT_MAX_EDIT_DISTANCE", "3"),
        ]));

        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, 50);
        assert!(config.fuzzy_fallback);
        assert_eq!(config.max_edit_distance, 3);
    }

    #[test]
    fn test_invalid_env_keeps_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("PLATFORM_CONTEXT_MAX_LIMIT", "lots"),
            ("PLATFORM_CONTEXT_FUZZY", "maybe"),
        ]));

        assert_eq!(config, EngineConfig::default());
    }
}
