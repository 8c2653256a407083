use crate::OrderedSet;
use crate::entity::{AgentId, Feature};
use crate::rule::Rule;

/// The uncommitted state of a conditional workflow: one feature, one rule, and the
/// agents that will receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    feature: Feature,
    agents: OrderedSet<AgentId>,
    rule: Rule,
}

impl Draft {
    pub(super) fn new(feature: Feature) -> Self {
        Self {
            feature,
            agents: OrderedSet::default(),
            rule: Rule::allow_all(),
        }
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Selected agents, in the order they were first picked.
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter()
    }

    pub fn is_selected(&self, agent_id: &AgentId) -> bool {
        self.agents.contains(agent_id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub(super) fn rule_mut(&mut self) -> &mut Rule {
        &mut self.rule
    }

    /// Selects the agent, or deselects it if already selected. Returns whether the
    /// agent is selected afterwards.
    pub(super) fn toggle_agent(&mut self, agent_id: AgentId) -> bool {
        if self.agents.shift_remove(&agent_id) {
            false
        } else {
            self.agents.insert(agent_id);
            true
        }
    }
}
