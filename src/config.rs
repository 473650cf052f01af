//! Configuration file support for dependency-versions-check.
//!
//! Provides YAML-based configuration through `dvc.config.yml` files,
//! including data structures, file loading, and validation. Values given on
//! the command line take precedence over the file.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::application::dto::{ExclusionSpec, OutputFormat, ResolverSpec, VALID_SCOPES};
use crate::shared::security::read_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "dvc.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub scope: Option<String>,
    pub deep_scan: Option<bool>,
    pub direct_only: Option<bool>,
    pub managed_only: Option<bool>,
    pub conflicts_only: Option<bool>,
    pub fast_resolution: Option<bool>,
    pub unresolved_system_artifacts_fail_build: Option<bool>,
    pub conflicts_fail_build: Option<bool>,
    pub direct_conflicts_fail_build: Option<bool>,
    pub include_pom_projects: Option<bool>,
    pub skip: Option<bool>,
    pub default_strategy: Option<String>,
    pub resolvers: Option<Vec<ResolverConfig>>,
    pub exclusions: Option<Vec<ExclusionConfig>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Assigns a version strategy to the dependencies matching `includes`.
#[derive(Debug, Deserialize)]
pub struct ResolverConfig {
    pub strategy: String,
    #[serde(default)]
    pub includes: Vec<String>,
}

/// A known version conflict to ignore.
#[derive(Debug, Deserialize)]
pub struct ExclusionConfig {
    pub dependency: String,
    pub expected: Option<String>,
    pub resolved: Option<String>,
}

impl ConfigFile {
    pub fn resolver_specs(&self) -> Vec<ResolverSpec> {
        self.resolvers
            .iter()
            .flatten()
            .map(|r| ResolverSpec::new(&r.strategy, r.includes.clone()))
            .collect()
    }

    pub fn exclusion_specs(&self) -> Vec<ExclusionSpec> {
        self.exclusions
            .iter()
            .flatten()
            .map(|e| ExclusionSpec::new(&e.dependency, e.expected.clone(), e.resolved.clone()))
            .collect()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in the given directories, first match wins.
/// Returns `None` silently if none of them holds one.
pub fn discover_config(dirs: &[&Path]) -> Result<Option<ConfigFile>> {
    for dir in dirs {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            return load_config_from_path(&config_path).map(Some);
        }
    }
    Ok(None)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref format) = config.format {
        if let Err(e) = format.parse::<OutputFormat>() {
            bail!("Invalid config: {}", e);
        }
    }

    if let Some(ref scope) = config.scope {
        if !VALID_SCOPES.contains(&scope.as_str()) {
            bail!(
                "Invalid config: Scope '{}' is invalid.\n\n\
                 💡 Hint: Use one of {}.",
                scope,
                VALID_SCOPES.join(", ")
            );
        }
    }

    if let Some(ref resolvers) = config.resolvers {
        for (i, resolver) in resolvers.iter().enumerate() {
            if resolver.strategy.trim().is_empty() {
                bail!(
                    "Invalid config: resolvers[{}].strategy must not be empty.\n\n\
                     💡 Hint: Name one of the strategies, e.g. \"apr\" or \"single-digit\".",
                    i
                );
            }
        }
    }

    if let Some(ref exclusions) = config.exclusions {
        for (i, exclusion) in exclusions.iter().enumerate() {
            if exclusion.dependency.trim().is_empty() {
                bail!("Invalid config: exclusions[{}].dependency must not be empty.", i);
            }
            if exclusion.expected.is_none() || exclusion.resolved.is_none() {
                bail!(
                    "Invalid config: exclusions[{}] must set both 'expected' and 'resolved'.\n\n\
                     💡 Hint: An exclusion ignores one specific conflict, e.g. expected \"1.0\" resolved \"2.0\".",
                    i
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        warn!("Unknown config field '{}' will be ignored", key);
    }
}
