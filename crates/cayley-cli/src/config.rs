//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! registry:
//!   prune_interval: 16
//! ```
//!
//! Every section and field is optional; missing ones take their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use cayley_cache::{InstanceRegistry, RegistryConfig};

/// Parsed contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Instance registry tuning.
    pub registry: RegistryConfig,
}

impl CliConfig {
    /// Read the configuration at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse configuration YAML. An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// A fresh registry configured from this file.
    pub fn registry(&self) -> InstanceRegistry {
        InstanceRegistry::with_config(self.registry)
    }
}
