//! Role-based access rules attached to every route.

pub mod evaluate;
pub mod role;

pub use evaluate::*;
pub use role::*;

use crate::OrderedSet;
use serde::{Deserialize, Serialize};

/// Which roles may traverse a route.
///
/// `disallowed` always wins over `allowed` and `allow_all`. When `allow_all` is set
/// the `allowed` list is ignored for evaluation but kept, so switching `allow_all`
/// off again restores the previous selection.
///
/// Serializes with the same field names the remote API uses:
///
/// ```
/// use routegraph::rule::Rule;
///
/// let rule = Rule::deny_all().allow("Admin").deny("Guest");
/// let json = serde_json::to_string(&rule).unwrap();
/// assert_eq!(json, r#"{"allowAll":false,"allowed":["Admin"],"disallowed":["Guest"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub allow_all: bool,
    #[serde(default)]
    pub allowed: OrderedSet<Role>,
    #[serde(default)]
    pub disallowed: OrderedSet<Role>,
}

impl Default for Rule {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl Rule {
    /// `{ allowAll: true, allowed: [], disallowed: [] }`, the starting point of every draft.
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            allowed: OrderedSet::default(),
            disallowed: OrderedSet::default(),
        }
    }

    pub fn deny_all() -> Self {
        Self {
            allow_all: false,
            ..Self::allow_all()
        }
    }

    pub fn allow(mut self, role: impl Into<Role>) -> Self {
        self.allowed.insert(role.into());
        self
    }

    pub fn deny(mut self, role: impl Into<Role>) -> Self {
        self.disallowed.insert(role.into());
        self
    }

    pub fn set_allow_all(&mut self, allow_all: bool) {
        self.allow_all = allow_all;
    }

    /// Adds the role to `allowed`, or removes it if already present.
    pub fn toggle_allowed(&mut self, role: impl Into<Role>) {
        toggle(&mut self.allowed, role.into());
    }

    /// Adds the role to `disallowed`, or removes it if already present.
    pub fn toggle_disallowed(&mut self, role: impl Into<Role>) {
        toggle(&mut self.disallowed, role.into());
    }

    /// Roles listed in both `allowed` and `disallowed`. These are always denied.
    pub fn overlapping_roles(&self) -> impl Iterator<Item = &Role> {
        self.allowed.intersection(&self.disallowed)
    }

    /// Every role mentioned by the rule, `allowed` first, without repeats.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.allowed.union(&self.disallowed)
    }

    /// Shorthand for [`evaluate`] against this rule.
    pub fn evaluate(&self, role: &Role) -> Access {
        evaluate(self, role)
    }
}

fn toggle(set: &mut OrderedSet<Role>, role: Role) {
    if !set.shift_remove(&role) {
        set.insert(role);
    }
}
