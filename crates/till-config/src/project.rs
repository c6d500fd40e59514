//! Project Configuration (till.toml)
//!
//! Handles project-level configuration stored in `till.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Default indentation width used by the formatter
pub const DEFAULT_INDENT: usize = 4;

/// Accepted formatter indentation widths
pub const INDENT_RANGE: RangeInclusive<usize> = 1..=16;

/// Project configuration from till.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Package metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageConfig>,

    /// Interpreter settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeSection>,

    /// Display output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,

    /// Formatting configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<FormattingConfig>,
}

/// Package metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package name
    pub name: String,

    /// Package version (semver)
    pub version: String,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Package authors
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}

/// `[runtime]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    /// Maximum nesting of function calls (default: 1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_depth: Option<usize>,
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Prefix each displayed line with its source line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,
}

/// `[formatting]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FormattingConfig {
    /// Indentation size (default: 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(pkg) = &self.package {
            if pkg.name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "package.name".to_string(),
                    reason: "name cannot be empty".to_string(),
                });
            }

            if !is_valid_version(&pkg.version) {
                return Err(ConfigError::InvalidVersion(pkg.version.clone()));
            }
        }

        if let Some(0) = self.runtime.as_ref().and_then(|r| r.max_call_depth) {
            return Err(ConfigError::InvalidValue {
                field: "runtime.max_call_depth".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if let Some(indent) = self.formatting.as_ref().and_then(|f| f.indent) {
            if !INDENT_RANGE.contains(&indent) {
                return Err(ConfigError::InvalidValue {
                    field: "formatting.indent".to_string(),
                    reason: format!(
                        "{} is outside {}..={}",
                        indent,
                        INDENT_RANGE.start(),
                        INDENT_RANGE.end()
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get the package name, if present
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// Effective call depth limit
    pub fn max_call_depth(&self) -> usize {
        self.runtime
            .as_ref()
            .and_then(|r| r.max_call_depth)
            .unwrap_or(DEFAULT_MAX_CALL_DEPTH)
    }

    /// Whether displayed lines carry their source line number
    pub fn line_numbers(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.line_numbers)
            .unwrap_or(false)
    }

    /// Effective formatter indentation
    pub fn indent(&self) -> usize {
        self.formatting
            .as_ref()
            .and_then(|f| f.indent)
            .unwrap_or(DEFAULT_INDENT)
    }

    /// Merge another project config into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &ProjectConfig) {
        if other.package.is_some() {
            self.package = other.package.clone();
        }
        if other.runtime.is_some() {
            self.runtime = other.runtime.clone();
        }
        if other.output.is_some() {
            self.output = other.output.clone();
        }
        if other.formatting.is_some() {
            self.formatting = other.formatting.clone();
        }
    }
}

/// Basic semver validation (simplified)
fn is_valid_version(version: &str) -> bool {
    let main_version = version.split(['-', '+']).next().unwrap_or("");
    if main_version.is_empty() {
        return false;
    }

    // Main version should be X.Y or X.Y.Z where X, Y, Z are digits
    let parts: Vec<&str> = main_version.split('.').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return false;
    }

    parts
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[package]
name = "demo"
version = "0.1.0"

[runtime]
max_call_depth = 500

[output]
line_numbers = true

[formatting]
indent = 2
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.package_name(), Some("demo"));
        assert_eq!(config.max_call_depth(), 500);
        assert!(config.line_numbers());
        assert_eq!(config.indent(), 2);
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.max_call_depth(), DEFAULT_MAX_CALL_DEPTH);
        assert!(!config.line_numbers());
        assert_eq!(config.indent(), DEFAULT_INDENT);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = "[runtime]\nmax_depth = 3\n";
        assert!(toml::from_str::<ProjectConfig>(toml).is_err());
    }

    #[test]
    fn test_zero_call_depth_rejected() {
        let config: ProjectConfig = toml::from_str("[runtime]\nmax_call_depth = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "runtime.max_call_depth"
        ));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("1.2.3-beta+7"));
        assert!(!is_valid_version("1"));
        assert!(!is_valid_version("a.b.c"));
        assert!(!is_valid_version(""));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base: ProjectConfig = toml::from_str("[runtime]\nmax_call_depth = 10\n").unwrap();
        let other: ProjectConfig = toml::from_str("[runtime]\nmax_call_depth = 20\n").unwrap();
        base.merge(&other);
        assert_eq!(base.max_call_depth(), 20);
    }
}
