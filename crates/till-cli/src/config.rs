//! CLI configuration via environment variables

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Default to JSON diagnostic output (TILL_DIAGNOSTICS=json)
    pub default_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            default_json: lookup("TILL_DIAGNOSTICS")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_diagnostics_flag() {
        let config = Config::from_lookup(|key| (key == "TILL_DIAGNOSTICS").then(|| "JSON".to_string()));
        assert!(config.default_json);
        assert!(!Config::from_lookup(|_| None).default_json);
        assert!(!Config::from_lookup(|_| Some("human".to_string())).default_json);
    }
}
