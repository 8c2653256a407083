//! Routes between features and agents, and the set that owns them.

pub mod condition;
pub mod set;
pub mod views;

pub use condition::*;
pub use set::*;
pub use views::*;

use crate::entity::{Agent, AgentId, Feature, FeatureId};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a route currently lets traffic through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStatus::Active => write!(f, "active"),
            RouteStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A route from one feature to one agent, gated by a [`Rule`].
///
/// `agent` and `feature` are snapshots taken when the route was created. They keep
/// their names even if the catalog later renames the entity, until
/// [`ConnectionSet::resync_names`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub agent: Agent,
    pub feature: Feature,
    pub rule: Rule,
    /// Set only when the route was committed by the conditional workflow.
    pub conditional: bool,
    #[serde(default)]
    pub status: RouteStatus,
    #[serde(default)]
    pub conditions: Vec<RouteCondition>,
}

impl Connection {
    /// A plain, non-conditional route.
    pub fn new(agent: Agent, feature: Feature, rule: Rule) -> Self {
        Self {
            agent,
            feature,
            rule,
            conditional: false,
            status: RouteStatus::Active,
            conditions: Vec::new(),
        }
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent.id
    }

    pub fn feature_id(&self) -> &FeatureId {
        &self.feature.id
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.agent.id.clone(), self.feature.id.clone())
    }

    /// The `(feature, agent)` pair a renderer needs to draw this route.
    pub fn endpoints(&self) -> (&FeatureId, &AgentId) {
        (&self.feature.id, &self.agent.id)
    }

    pub fn is_active(&self) -> bool {
        self.status == RouteStatus::Active
    }

    pub fn condition(&self, name: &str) -> Option<&RouteCondition> {
        self.conditions.iter().find(|c| c.name == name)
    }
}

/// The identity of a route within a [`ConnectionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub agent_id: AgentId,
    pub feature_id: FeatureId,
}

impl RouteKey {
    pub fn new(agent_id: impl Into<AgentId>, feature_id: impl Into<FeatureId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            feature_id: feature_id.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.feature_id, self.agent_id)
    }
}
