use crate::connection::Connection;
use crate::entity::{AgentId, FeatureId};
use crate::rule::{Decision, Role, evaluate_roles};
use serde::Serialize;

/// The answer to "may a caller holding these roles use this route?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessReport {
    pub agent_id: AgentId,
    pub feature_id: FeatureId,
    pub allowed: bool,
    /// Human-readable explanation of the outcome.
    pub reason: String,
    /// The rule decision, absent when the route is inactive and the rule was not consulted.
    pub decision: Option<Decision>,
}

impl AccessReport {
    pub(super) fn for_connection<'a>(
        connection: &Connection,
        roles: impl IntoIterator<Item = &'a Role>,
    ) -> Self {
        let (allowed, reason, decision) = if connection.is_active() {
            let decision = evaluate_roles(&connection.rule, roles);
            (decision.is_allowed(), decision.reason.to_string(), Some(decision))
        } else {
            (false, "route is inactive".to_string(), None)
        };

        Self {
            agent_id: connection.agent_id().clone(),
            feature_id: connection.feature_id().clone(),
            allowed,
            reason,
            decision,
        }
    }
}
