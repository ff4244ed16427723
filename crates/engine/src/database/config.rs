//! Database configuration via `watchkv.toml`
//!
//! The engine has no data directory of its own; a front-end that wants a
//! config file points `Database::open_config` at one. Edit the file and
//! restart to change settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use watchkv_concurrency::CommandErrorPolicy;
use watchkv_core::{Error, Result};

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "watchkv.toml";

/// Namespace count used when the config does not say
pub const DEFAULT_NAMESPACES: u32 = 16;

/// Database configuration loaded from `watchkv.toml`.
///
/// # Example
///
/// ```toml
/// # Number of logical namespaces; valid indices are 0..namespaces
/// namespaces = 16
///
/// # Per-command failure policy inside execute: "continue" or "abort"
/// command_error_policy = "continue"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchKvConfig {
    /// Number of namespaces sessions may select.
    #[serde(default = "default_namespaces")]
    pub namespaces: u32,
    /// Command-error policy: `"continue"` or `"abort"`.
    #[serde(default = "default_policy_str")]
    pub command_error_policy: String,
}

fn default_namespaces() -> u32 {
    DEFAULT_NAMESPACES
}

fn default_policy_str() -> String {
    CommandErrorPolicy::default().as_str().to_string()
}

impl Default for WatchKvConfig {
    fn default() -> Self {
        Self {
            namespaces: default_namespaces(),
            command_error_policy: default_policy_str(),
        }
    }
}

impl WatchKvConfig {
    /// Parse the policy string into a `CommandErrorPolicy`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the string is not `"continue"` or `"abort"`.
    pub fn command_error_policy(&self) -> Result<CommandErrorPolicy> {
        self.command_error_policy.parse()
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        if self.namespaces == 0 {
            return Err(Error::Config {
                reason: "namespaces must be at least 1".to_string(),
            });
        }
        self.command_error_policy()?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# watchkv configuration
#
# Number of logical namespaces (databases). Sessions may select
# indices 0..namespaces. Default: 16
namespaces = 16

# What execute does when a queued command fails (e.g. INCRBY on text):
#   "continue" = record the error in that command's slot, apply the rest (default)
#   "abort"    = roll back the whole transaction and return an error
command_error_policy = "continue"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config: WatchKvConfig = toml::from_str(&content).map_err(|e| Error::Config {
            reason: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Io {
                reason: format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Io {
            reason: format!("failed to write config file '{}': {}", path.display(), e),
        })
    }
}
