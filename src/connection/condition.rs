use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// What a [`RouteCondition`] constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    RoleBased,
    TimeBased,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::RoleBased => write!(f, "role_based"),
            ConditionKind::TimeBased => write!(f, "time_based"),
        }
    }
}

/// A named condition attached to a route, such as business hours or a role override.
///
/// Conditions travel with the route for the surrounding application to enforce;
/// access tests only consult the route's [`Rule`](crate::rule::Rule). Within one
/// route a condition is identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCondition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "condition_type")]
    pub kind: ConditionKind,
    #[serde(rename = "condition_data", default)]
    pub data: Map<String, Value>,
}

impl RouteCondition {
    pub fn new(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            data: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets one entry of the free-form condition data.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
