use crate::error::ConfigError;
use crate::rule::{Role, RoleCatalog};
use itertools::Itertools;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings for a [`RouteGraph`](crate::router::RouteGraph), usually loaded from TOML.
///
/// ```toml
/// roles = ["Admin", "Manager", "Reviewer", "Guest"]
///
/// [validation]
/// strict_roles = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// The role catalog offered to rule editors, in display order.
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Reject rules that name roles outside the catalog. When off, such rules are
    /// accepted and a warning is logged.
    #[serde(default)]
    pub strict_roles: bool,
}

impl RouterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn role_catalog(&self) -> RoleCatalog {
        RoleCatalog::new(self.roles.iter().cloned())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let duplicates = self.roles.iter().duplicates().join(", ");
        if !duplicates.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "duplicate roles in catalog: {}",
                duplicates
            )));
        }
        if let Some(blank) = self.roles.iter().position(|r| r.as_str().trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "role at position {} has an empty name",
                blank
            )));
        }
        Ok(())
    }
}
