//! The conditional route workflow.
//!
//! An operator picks one feature, describes a rule, selects any number of agents
//! and commits. The commit writes one conditional route per selected agent, all
//! sharing the same rule. The workflow is an explicit state machine:
//!
//! ```text
//! Idle --start--> CollectingRule --proceed--> PickingAgents <--toggle--> Ready
//!   ^                                                                     |
//!   +------------------------------- commit ------------------------------+
//! ```
//!
//! `reset` returns to `Idle` from any other state. Calls that don't match the
//! current state are rejected with [`WorkflowError::InvalidTransition`] and change
//! nothing.

mod draft;

pub use draft::Draft;

use crate::connection::{ConnectionSet, UpsertOutcome};
use crate::entity::{AgentId, EntityCatalog, Feature, FeatureId};
use crate::error::WorkflowError;
use crate::rule::{Role, Rule};
use std::fmt;
use tracing::{debug, info};

/// The fieldless stage of a [`ConditionalWorkflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStage {
    Idle,
    CollectingRule,
    PickingAgents,
    Ready,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::Idle => write!(f, "idle"),
            WorkflowStage::CollectingRule => write!(f, "collecting a rule"),
            WorkflowStage::PickingAgents => write!(f, "picking agents"),
            WorkflowStage::Ready => write!(f, "ready to commit"),
        }
    }
}

/// The operations a caller can attempt on the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowAction {
    Start,
    Proceed,
    ToggleAgent,
    EditRule,
    Commit,
    Reset,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowAction::Start => write!(f, "start a conditional route"),
            WorkflowAction::Proceed => write!(f, "proceed to agent selection"),
            WorkflowAction::ToggleAgent => write!(f, "toggle an agent"),
            WorkflowAction::EditRule => write!(f, "edit the draft rule"),
            WorkflowAction::Commit => write!(f, "commit"),
            WorkflowAction::Reset => write!(f, "reset"),
        }
    }
}

#[derive(Debug, Clone, Default)]
enum WorkflowState {
    #[default]
    Idle,
    CollectingRule(Draft),
    PickingAgents(Draft),
    /// Invariant: the draft has at least one agent.
    Ready(Draft),
}

/// What a successful commit wrote, agent ids in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub feature_id: FeatureId,
    pub rule: Rule,
    /// Pairs that had no route before the commit.
    pub inserted: Vec<AgentId>,
    /// Pairs whose existing route was overwritten and marked conditional.
    pub updated: Vec<AgentId>,
}

impl CommitReport {
    pub fn total(&self) -> usize {
        self.inserted.len() + self.updated.len()
    }
}

/// The state machine behind conditional routing. See the module docs.
#[derive(Debug, Clone, Default)]
pub struct ConditionalWorkflow {
    state: WorkflowState,
}

impl ConditionalWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WorkflowStage {
        match self.state {
            WorkflowState::Idle => WorkflowStage::Idle,
            WorkflowState::CollectingRule(_) => WorkflowStage::CollectingRule,
            WorkflowState::PickingAgents(_) => WorkflowStage::PickingAgents,
            WorkflowState::Ready(_) => WorkflowStage::Ready,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage() != WorkflowStage::Idle
    }

    /// The in-progress draft, `None` while idle.
    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            WorkflowState::Idle => None,
            WorkflowState::CollectingRule(draft)
            | WorkflowState::PickingAgents(draft)
            | WorkflowState::Ready(draft) => Some(draft),
        }
    }

    /// `Idle -> CollectingRule` for the given feature, with an allow-all draft rule
    /// and no agents.
    pub fn start(&mut self, feature: Feature) -> Result<(), WorkflowError> {
        if !matches!(self.state, WorkflowState::Idle) {
            return Err(self.reject(WorkflowAction::Start));
        }
        debug!(feature = %feature.id, "conditional workflow started");
        self.state = WorkflowState::CollectingRule(Draft::new(feature));
        Ok(())
    }

    /// `CollectingRule -> PickingAgents`.
    pub fn proceed(&mut self) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.state) {
            WorkflowState::CollectingRule(draft) => {
                self.state = WorkflowState::PickingAgents(draft);
                debug!("conditional workflow picking agents");
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.reject(WorkflowAction::Proceed))
            }
        }
    }

    /// Selects or deselects an agent. The workflow is `Ready` exactly while at least
    /// one agent is selected. Returns the stage after the toggle.
    pub fn toggle_agent(&mut self, agent_id: AgentId) -> Result<WorkflowStage, WorkflowError> {
        match std::mem::take(&mut self.state) {
            WorkflowState::PickingAgents(mut draft) | WorkflowState::Ready(mut draft) => {
                let selected = draft.toggle_agent(agent_id);
                debug!(selected, count = draft.agent_count(), "draft agent toggled");
                self.state = if draft.agent_count() == 0 {
                    WorkflowState::PickingAgents(draft)
                } else {
                    WorkflowState::Ready(draft)
                };
                Ok(self.stage())
            }
            other => {
                self.state = other;
                Err(self.reject(WorkflowAction::ToggleAgent))
            }
        }
    }

    /// Replaces the draft rule wholesale.
    pub fn set_rule(&mut self, rule: Rule) -> Result<(), WorkflowError> {
        *self.draft_rule_mut()? = rule;
        Ok(())
    }

    pub fn set_allow_all(&mut self, allow_all: bool) -> Result<(), WorkflowError> {
        self.draft_rule_mut()?.set_allow_all(allow_all);
        Ok(())
    }

    pub fn toggle_allowed(&mut self, role: impl Into<Role>) -> Result<(), WorkflowError> {
        self.draft_rule_mut()?.toggle_allowed(role);
        Ok(())
    }

    pub fn toggle_disallowed(&mut self, role: impl Into<Role>) -> Result<(), WorkflowError> {
        self.draft_rule_mut()?.toggle_disallowed(role);
        Ok(())
    }

    /// `Ready -> Idle`, upserting one conditional route per selected agent.
    ///
    /// Existing routes for the same pair are overwritten in place: the draft rule
    /// replaces theirs and they become conditional. Agent names are resolved from
    /// `catalog` before anything is written; if one is missing nothing is written
    /// and the draft is kept.
    pub fn commit(
        &mut self,
        connections: &mut ConnectionSet,
        catalog: &EntityCatalog,
    ) -> Result<CommitReport, WorkflowError> {
        let WorkflowState::Ready(draft) = &self.state else {
            return Err(self.reject(WorkflowAction::Commit));
        };

        let agents = draft
            .agents()
            .map(|id| {
                catalog
                    .agent(id)
                    .ok_or_else(|| WorkflowError::UnresolvedAgent { agent_id: id.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = CommitReport {
            feature_id: draft.feature().id.clone(),
            rule: draft.rule().clone(),
            inserted: Vec::new(),
            updated: Vec::new(),
        };
        for agent in agents {
            match connections.upsert(agent, draft.feature(), draft.rule().clone(), true) {
                UpsertOutcome::Inserted => report.inserted.push(agent.id.clone()),
                UpsertOutcome::Updated => report.updated.push(agent.id.clone()),
            }
        }

        info!(
            feature = %report.feature_id,
            inserted = report.inserted.len(),
            updated = report.updated.len(),
            "conditional routes committed"
        );
        self.state = WorkflowState::Idle;
        Ok(report)
    }

    /// Discards the draft and returns to `Idle` without touching any route.
    pub fn reset(&mut self) -> Result<Draft, WorkflowError> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Idle => Err(self.reject(WorkflowAction::Reset)),
            WorkflowState::CollectingRule(draft)
            | WorkflowState::PickingAgents(draft)
            | WorkflowState::Ready(draft) => {
                debug!(feature = %draft.feature().id, "conditional workflow reset");
                Ok(draft)
            }
        }
    }

    fn draft_rule_mut(&mut self) -> Result<&mut Rule, WorkflowError> {
        match &mut self.state {
            WorkflowState::Idle => Err(WorkflowError::InvalidTransition {
                stage: WorkflowStage::Idle,
                action: WorkflowAction::EditRule,
            }),
            WorkflowState::CollectingRule(draft)
            | WorkflowState::PickingAgents(draft)
            | WorkflowState::Ready(draft) => Ok(draft.rule_mut()),
        }
    }

    fn reject(&self, action: WorkflowAction) -> WorkflowError {
        let stage = self.stage();
        debug!(%stage, %action, "workflow transition rejected");
        WorkflowError::InvalidTransition { stage, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picking() -> ConditionalWorkflow {
        let mut workflow = ConditionalWorkflow::new();
        workflow.start(Feature::new("f1", "Export")).unwrap();
        workflow.proceed().unwrap();
        workflow
    }

    #[test]
    fn rejected_proceed_keeps_the_draft() {
        let mut workflow = picking();
        workflow.toggle_agent(AgentId::from("a1")).unwrap();
        assert!(workflow.proceed().is_err());
        assert_eq!(workflow.stage(), WorkflowStage::Ready);
        assert_eq!(workflow.draft().map(Draft::agent_count), Some(1));
    }

    #[test]
    fn selection_order_is_kept() {
        let mut workflow = picking();
        for id in ["a3", "a1", "a2"] {
            workflow.toggle_agent(AgentId::from(id)).unwrap();
        }
        let order: Vec<_> = workflow
            .draft()
            .unwrap()
            .agents()
            .map(AgentId::as_str)
            .collect();
        assert_eq!(order, vec!["a3", "a1", "a2"]);
    }

    #[test]
    fn reset_from_idle_is_rejected() {
        let mut workflow = ConditionalWorkflow::new();
        let err = workflow.reset().unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                stage: WorkflowStage::Idle,
                action: WorkflowAction::Reset,
            }
        );
    }

    #[test]
    fn transition_error_message() {
        let err = WorkflowError::InvalidTransition {
            stage: WorkflowStage::PickingAgents,
            action: WorkflowAction::Commit,
        };
        assert_eq!(
            err.to_string(),
            "Cannot commit while the conditional workflow is picking agents"
        );
    }
}
