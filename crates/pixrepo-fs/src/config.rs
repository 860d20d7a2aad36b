//! Repository configuration loading and eager validation
//!
//! Format is detected from the file extension (TOML, JSON, or YAML).
//! All configuration errors are fatal and reported at load time; there
//! is no degraded mode.

use std::fs;
use std::path::{Path, PathBuf};

use pixrepo_path::{NamingRules, RuleTable};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_client_path_depth() -> usize {
    1
}

fn default_servant_ceiling() -> usize {
    10_000
}

fn default_tile_bound() -> u32 {
    256
}

/// Operator-supplied repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Root directory all repository paths resolve under
    pub base_dir: PathBuf,
    /// Naming-rule tables combined into the repository policy
    pub rules: Vec<RuleTable>,
    /// How many trailing client path components matter
    #[serde(default = "default_client_path_depth")]
    pub client_path_depth: usize,
    /// Hard cap on servants per session registry
    #[serde(default = "default_servant_ceiling")]
    pub servant_ceiling: usize,
    /// Maximum tile width for pixel streaming
    #[serde(default = "default_tile_bound")]
    pub tile_width: u32,
    /// Maximum tile height for pixel streaming
    #[serde(default = "default_tile_bound")]
    pub tile_height: u32,
}

impl RepositoryConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let config: Self = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            })?,
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            })?,
            _ => {
                return Err(Error::UnsupportedFormat {
                    extension: extension.to_string(),
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every eager invariant: existing base directory, depth and
    /// ceiling of at least 1, non-degenerate tile bounds, and a
    /// non-empty, combinable rule selection.
    pub fn validate(&self) -> Result<()> {
        if !self.base_dir.is_dir() {
            return Err(Error::BaseDirMissing {
                path: self.base_dir.clone(),
            });
        }
        if self.client_path_depth == 0 {
            return Err(Error::InvalidClientDepth);
        }
        if self.servant_ceiling == 0 {
            return Err(Error::InvalidServantCeiling);
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(Error::InvalidTileBounds {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        self.naming_rules()?;
        Ok(())
    }

    /// The combined naming policy for the selected tables.
    pub fn naming_rules(&self) -> Result<NamingRules> {
        if self.rules.is_empty() {
            return Err(Error::NoRulesSelected);
        }
        let tables: Vec<NamingRules> = self.rules.iter().map(RuleTable::rules).collect();
        Ok(NamingRules::combine(&tables)?)
    }
}
