//! Manager configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! outgoing_president_role = "officer"
//! audit_enabled = true
//! max_name_len = 120
//! max_tags = 10
//! ```

use sc_model::Role;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but semantically invalid
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Club manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Role the outgoing president keeps after a transfer
    pub outgoing_president_role: Role,
    /// Record committed transitions in the audit log
    pub audit_enabled: bool,
    /// Maximum club name length in characters
    pub max_name_len: usize,
    /// Maximum number of tags per club
    pub max_tags: usize,
}

impl ManagerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With outgoing president role
    #[inline]
    #[must_use]
    pub fn with_outgoing_president_role(mut self, role: Role) -> Self {
        self.outgoing_president_role = role;
        self
    }

    /// With audit logging on or off
    #[inline]
    #[must_use]
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// With max club name length
    #[inline]
    #[must_use]
    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// With max tags per club
    #[inline]
    #[must_use]
    pub fn with_max_tags(mut self, max: usize) -> Self {
        self.max_tags = max;
        self
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// - [`ConfigError::Invalid`] if the outgoing role is president or the
    ///   name limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outgoing_president_role == Role::President {
            return Err(ConfigError::Invalid(
                "outgoing_president_role cannot be president".to_string(),
            ));
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid("max_name_len must be positive".to_string()));
        }
        Ok(())
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ManagerConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded manager config");
        Ok(config)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            outgoing_president_role: Role::Officer,
            audit_enabled: true,
            max_name_len: 120,
            max_tags: 10,
        }
    }
}
