use crate::OrderedSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque role name such as `"Admin"` or `"Reviewer"`.
///
/// Roles carry no structure. Two roles are the same role when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The ordered list of roles offered by rule editors.
///
/// Sourced from static configuration or from an external import; the catalog
/// itself never invents roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: OrderedSet<Role>,
}

impl RoleCatalog {
    pub fn new<R: Into<Role>>(roles: impl IntoIterator<Item = R>) -> Self {
        let mut catalog = Self::default();
        catalog.extend(roles);
        catalog
    }

    /// Appends roles that are not already present. Existing order is kept.
    pub fn extend<R: Into<Role>>(&mut self, roles: impl IntoIterator<Item = R>) {
        self.roles.extend(roles.into_iter().map(Into::<Role>::into));
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_skips_known_roles() {
        let mut catalog = RoleCatalog::new(["Admin", "Guest"]);
        catalog.extend(["Reviewer", "Admin"]);
        let names: Vec<_> = catalog.iter().map(Role::as_str).collect();
        assert_eq!(names, vec!["Admin", "Guest", "Reviewer"]);
    }
}
