use crate::connection::RouteKey;
use crate::entity::{AgentId, FeatureId};
use crate::error::RoutingError;
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// A request to create one plain route, shaped like the remote API's create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoute {
    pub agent_id: AgentId,
    pub feature_id: FeatureId,
    #[serde(rename = "rules", default)]
    pub rule: Rule,
}

impl NewRoute {
    pub fn new(agent_id: impl Into<AgentId>, feature_id: impl Into<FeatureId>, rule: Rule) -> Self {
        Self {
            agent_id: agent_id.into(),
            feature_id: feature_id.into(),
            rule,
        }
    }
}

/// A request from a bulk creation that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub request: NewRoute,
    pub error: RoutingError,
}

/// The result of [`RouteGraph::create_connections`](super::RouteGraph::create_connections).
///
/// Requests are applied one by one; a failing request does not undo the ones
/// before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub created: Vec<RouteKey>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn total_created(&self) -> usize {
        self.created.len()
    }

    pub fn total_failed(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
