//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::project::{OutputSection, ProjectConfig, RuntimeSection};
use crate::{ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding `runtime.max_call_depth`
pub const ENV_MAX_CALL_DEPTH: &str = "TILL_MAX_CALL_DEPTH";

/// Environment variable overriding `output.line_numbers`
pub const ENV_LINE_NUMBERS: &str = "TILL_LINE_NUMBERS";

/// Configuration loader
///
/// Loads configuration with proper precedence:
/// 1. Project config (till.toml) - overrides defaults
/// 2. Environment variables (TILL_*) - overrides project
/// 3. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Project root directory (where till.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find till.toml, then applies
    /// environment overrides.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns the default config with no root if no till.toml exists.
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Apply environment variable overrides to project config
    fn apply_env_overrides(&self, config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        apply_overrides(config, |key| env::var(key).ok())
    }
}

/// Apply `TILL_*` overrides read through `lookup`
pub fn apply_overrides(
    mut config: ProjectConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<ProjectConfig> {
    if let Some(depth) = lookup(ENV_MAX_CALL_DEPTH) {
        let depth: usize = depth
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: ENV_MAX_CALL_DEPTH.to_string(),
                reason: format!("'{}' is not a non-negative integer", depth),
            })?;
        config
            .runtime
            .get_or_insert_with(RuntimeSection::default)
            .max_call_depth = Some(depth);
    }

    if let Some(flag) = lookup(ENV_LINE_NUMBERS) {
        let enabled = matches!(flag.to_lowercase().as_str(), "true" | "1" | "yes");
        config
            .output
            .get_or_insert_with(OutputSection::default)
            .line_numbers = Some(enabled);
    }

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Get the package name
    pub fn package_name(&self) -> Option<&str> {
        self.project.package_name()
    }

    /// Check if this is a project (has till.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    pub fn max_call_depth(&self) -> usize {
        self.project.max_call_depth()
    }

    pub fn line_numbers(&self) -> bool {
        self.project.line_numbers()
    }

    pub fn indent(&self) -> usize {
        self.project.indent()
    }
}
