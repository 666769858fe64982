//! Configuration via `verpack.toml`
//!
//! Every key is optional. A missing file is not an error for callers that
//! use [`VerpackConfig::default`]; [`VerpackConfig::write_default_if_missing`]
//! creates a commented template.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use verpack_core::{Error, Result};
use verpack_environment::{PackageScope, LOCKFILE_NAME};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "verpack.toml";

/// Settings loaded from `verpack.toml`.
///
/// # Example
///
/// ```toml
/// package_scope = "loaded"
/// lockfile = "../Cargo.lock"
/// strict_types = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerpackConfig {
    /// Default scope for writes: `"object"`, `"loaded"` or `"installed"`.
    #[serde(default = "default_scope_str")]
    pub package_scope: String,
    /// Lockfile describing the installed distributions, relative to the config file.
    #[serde(default = "default_lockfile")]
    pub lockfile: PathBuf,
    /// Runtime version to record instead of the library's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    /// Reject payload types that were not registered.
    #[serde(default)]
    pub strict_types: bool,
    /// Log mismatch reports. When false they are still returned to the caller.
    #[serde(default = "default_emit_warnings")]
    pub emit_warnings: bool,
}

fn default_scope_str() -> String {
    PackageScope::default().as_str().to_string()
}

fn default_lockfile() -> PathBuf {
    PathBuf::from(LOCKFILE_NAME)
}

fn default_emit_warnings() -> bool {
    true
}

impl Default for VerpackConfig {
    fn default() -> Self {
        Self {
            package_scope: default_scope_str(),
            lockfile: default_lockfile(),
            runtime_version: None,
            strict_types: false,
            emit_warnings: default_emit_warnings(),
        }
    }
}

impl VerpackConfig {
    /// Parse the scope string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` for anything but the three scope names.
    pub fn scope(&self) -> Result<PackageScope> {
        self.package_scope.parse()
    }

    /// Lockfile path, resolved against `base_dir` when relative.
    pub fn lockfile_path(&self, base_dir: &Path) -> PathBuf {
        if self.lockfile.is_absolute() {
            self.lockfile.clone()
        } else {
            base_dir.join(&self.lockfile)
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# verpack configuration
#
# Which distributions a written header records: "object" (default),
# "loaded" or "installed"
#   "object"    = distributions providing the types inside the object
#   "loaded"    = distributions providing every loaded module
#   "installed" = every installed distribution
package_scope = "object"

# Lockfile listing the installed distributions (relative to this file)
lockfile = "Cargo.lock"

# Runtime version recorded in headers (default: the library version)
# runtime_version = "my-app/1.4.0"

# Reject payload types that were never registered (default: false)
strict_types = false

# Log version mismatches found while reading (default: true)
emit_warnings = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// scope is not recognized.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: VerpackConfig = toml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.scope()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::ConfigError(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
