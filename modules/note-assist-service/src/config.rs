//! Environment configuration for the note-assist service.

use crate::claude::{DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use std::env;

pub const DEFAULT_PORT: u16 = 9110;
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Provider credential. `None` switches the assist endpoint to demo mode.
    pub anthropic_api_key: Option<String>,
    pub anthropic_endpoint: String,
    pub anthropic_model: String,
    pub max_tokens: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "<set>"))
            .field("anthropic_endpoint", &self.anthropic_endpoint)
            .field("anthropic_model", &self.anthropic_model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable numbers fall back to
    /// their defaults; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            host: get("NOTE_ASSIST_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: get("NOTE_ASSIST_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_endpoint: get("ANTHROPIC_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            anthropic_model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: get("NOTE_ASSIST_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.anthropic_api_key.is_some()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(!config.has_credential());
        assert_eq!(config.anthropic_model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.bind_addr(), "127.0.0.1:9110");
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config = config_from(&[("ANTHROPIC_API_KEY", "   ")]);
        assert!(!config.has_credential());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_MODEL", "claude-test"),
            ("NOTE_ASSIST_PORT", "8088"),
            ("NOTE_ASSIST_MAX_TOKENS", "256"),
        ]);
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.anthropic_model, "claude-test");
        assert_eq!(config.port, 8088);
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config_from(&[("NOTE_ASSIST_PORT", "nope"), ("NOTE_ASSIST_MAX_TOKENS", "0")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_debug_hides_key() {
        let config = config_from(&[("ANTHROPIC_API_KEY", "sk-secret")]);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<set>"));
    }
}
