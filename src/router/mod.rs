use crate::config::RouterConfig;
use crate::connection::{
    Connection, ConnectionSet, FeatureGroups, RouteCondition, RouteStatus, order_features,
};
use crate::entity::{Agent, AgentId, EntityCatalog, Feature, FeatureId};
use crate::error::{ConnectionError, RoutingError, WorkflowError};
use crate::rule::{Role, RoleCatalog, Rule};
use crate::workflow::{CommitReport, ConditionalWorkflow, Draft, WorkflowAction, WorkflowStage};
use itertools::Itertools;
use tracing::{info, warn};

mod access;
mod builder;
mod bulk;

pub use access::AccessReport;
pub use builder::RouteGraphBuilder;
pub use bulk::{BulkFailure, BulkOutcome, NewRoute};

/// The entry point for the surrounding application.
///
/// A `RouteGraph` owns the entity and role catalogs, every route of the workspace
/// and the single conditional workflow. All operations are synchronous; none of
/// them can leave two routes for the same `(agent, feature)` pair.
///
/// ```
/// use routegraph::prelude::*;
///
/// # fn main() -> std::result::Result<(), RoutingError> {
/// let mut graph = RouteGraph::builder()
///     .with_agents([Agent::new("a1", "Claude"), Agent::new("a2", "GPT-4")])
///     .with_features([Feature::new("f1", "Data Export")])
///     .with_roles(["Admin", "Reviewer", "Guest"])
///     .build()?;
///
/// graph.start_conditional(&"f1".into())?;
/// graph.toggle_draft_allowed("Reviewer")?;
/// graph.set_draft_allow_all(false)?;
/// graph.proceed()?;
/// graph.toggle_agent(&"a1".into())?;
/// graph.toggle_agent(&"a2".into())?;
/// let report = graph.commit_conditional()?;
///
/// assert_eq!(report.inserted.len(), 2);
/// assert!(graph.all_connections().all(|c| c.conditional));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RouteGraph {
    entities: EntityCatalog,
    roles: RoleCatalog,
    connections: ConnectionSet,
    workflow: ConditionalWorkflow,
    strict_roles: bool,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RouteGraphBuilder {
        RouteGraphBuilder::new()
    }

    pub fn with_config(config: &RouterConfig) -> Self {
        Self {
            roles: config.role_catalog(),
            strict_roles: config.validation.strict_roles,
            ..Self::default()
        }
    }

    // --- Catalogs ---

    /// Replaces the agent and feature lists. Existing routes keep their name snapshots.
    pub fn refresh_entities(
        &mut self,
        agents: impl IntoIterator<Item = Agent>,
        features: impl IntoIterator<Item = Feature>,
    ) {
        self.entities.replace(agents, features);
    }

    pub fn entities(&self) -> &EntityCatalog {
        &self.entities
    }

    pub fn roles(&self) -> &RoleCatalog {
        &self.roles
    }

    pub fn extend_roles<R: Into<Role>>(&mut self, roles: impl IntoIterator<Item = R>) {
        self.roles.extend(roles);
    }

    /// Copies current catalog names into every route snapshot. Returns how many routes changed.
    pub fn resync_names(&mut self) -> usize {
        self.connections.resync_names(&self.entities)
    }

    // --- Single routes ---

    /// Creates a plain, non-conditional route from `feature_id` to `agent_id`.
    pub fn create_connection(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        rule: Rule,
    ) -> Result<&Connection, RoutingError> {
        let agent = self.agent(agent_id)?.clone();
        let feature = self.feature(feature_id)?.clone();
        self.check_rule(&rule)?;

        self.connections.add(Connection::new(agent, feature, rule))?;
        self.connections
            .find(agent_id, feature_id)
            .ok_or_else(|| not_found(agent_id, feature_id))
    }

    /// Creates several plain routes, reporting each failure without stopping.
    pub fn create_connections(
        &mut self,
        requests: impl IntoIterator<Item = NewRoute>,
    ) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for request in requests {
            match self.create_connection(&request.agent_id, &request.feature_id, request.rule.clone()) {
                Ok(connection) => outcome.created.push(connection.key()),
                Err(error) => outcome.failed.push(BulkFailure { request, error }),
            }
        }
        info!(
            created = outcome.total_created(),
            failed = outcome.total_failed(),
            "bulk route creation finished"
        );
        outcome
    }

    /// Replaces the rule of an existing route wholesale. The conditional flag is kept.
    pub fn edit_rule(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        rule: Rule,
    ) -> Result<&Connection, RoutingError> {
        self.check_rule(&rule)?;
        Ok(self.connections.replace_rule(agent_id, feature_id, rule)?)
    }

    /// Removes a route. Removing a pair that has no route is not an error.
    pub fn remove_connection(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
    ) -> Option<Connection> {
        self.connections.remove(agent_id, feature_id)
    }

    pub fn set_status(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        status: RouteStatus,
    ) -> Result<&Connection, RoutingError> {
        Ok(self.connections.set_status(agent_id, feature_id, status)?)
    }

    /// Attaches a named condition to an existing route, replacing one with the same name.
    pub fn add_condition(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        condition: RouteCondition,
    ) -> Result<&Connection, RoutingError> {
        Ok(self.connections.add_condition(agent_id, feature_id, condition)?)
    }

    /// Detaches a condition by name. The route must exist; the condition need not.
    pub fn remove_condition(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        name: &str,
    ) -> Result<Option<RouteCondition>, RoutingError> {
        Ok(self.connections.remove_condition(agent_id, feature_id, name)?)
    }

    /// Checks whether a caller holding `roles` may use the route. Inactive routes deny everyone.
    pub fn test_access<'a>(
        &self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        roles: impl IntoIterator<Item = &'a Role>,
    ) -> Result<AccessReport, RoutingError> {
        let connection = self
            .connections
            .find(agent_id, feature_id)
            .ok_or_else(|| not_found(agent_id, feature_id))?;
        Ok(AccessReport::for_connection(connection, roles))
    }

    // --- Conditional workflow ---

    pub fn workflow_stage(&self) -> WorkflowStage {
        self.workflow.stage()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.workflow.draft()
    }

    /// Starts a conditional route for a feature. Only possible while no other
    /// conditional route is in progress.
    pub fn start_conditional(&mut self, feature_id: &FeatureId) -> Result<(), RoutingError> {
        let feature = self.feature(feature_id)?.clone();
        Ok(self.workflow.start(feature)?)
    }

    pub fn proceed(&mut self) -> Result<(), RoutingError> {
        Ok(self.workflow.proceed()?)
    }

    /// Selects or deselects an agent in the draft. Only catalog agents can be selected;
    /// an agent that left the catalog can still be deselected.
    pub fn toggle_agent(&mut self, agent_id: &AgentId) -> Result<WorkflowStage, RoutingError> {
        let stage = self.workflow.stage();
        let draft = match (stage, self.workflow.draft()) {
            (WorkflowStage::PickingAgents | WorkflowStage::Ready, Some(draft)) => draft,
            _ => {
                return Err(WorkflowError::InvalidTransition {
                    stage,
                    action: WorkflowAction::ToggleAgent,
                }
                .into());
            }
        };
        if !draft.is_selected(agent_id) {
            self.agent(agent_id)?;
        }
        Ok(self.workflow.toggle_agent(agent_id.clone())?)
    }

    pub fn set_draft_rule(&mut self, rule: Rule) -> Result<(), RoutingError> {
        self.check_rule(&rule)?;
        Ok(self.workflow.set_rule(rule)?)
    }

    pub fn set_draft_allow_all(&mut self, allow_all: bool) -> Result<(), RoutingError> {
        Ok(self.workflow.set_allow_all(allow_all)?)
    }

    pub fn toggle_draft_allowed(&mut self, role: impl Into<Role>) -> Result<(), RoutingError> {
        let role = self.check_role(role.into())?;
        Ok(self.workflow.toggle_allowed(role)?)
    }

    pub fn toggle_draft_disallowed(&mut self, role: impl Into<Role>) -> Result<(), RoutingError> {
        let role = self.check_role(role.into())?;
        Ok(self.workflow.toggle_disallowed(role)?)
    }

    /// Writes one conditional route per selected agent and returns to idle.
    pub fn commit_conditional(&mut self) -> Result<CommitReport, RoutingError> {
        if let Some(draft) = self.workflow.draft() {
            self.warn_on_overlap(draft.rule());
        }
        Ok(self.workflow.commit(&mut self.connections, &self.entities)?)
    }

    /// Abandons the conditional route in progress. No route is touched.
    pub fn reset_conditional(&mut self) -> Result<Draft, RoutingError> {
        Ok(self.workflow.reset()?)
    }

    // --- Views ---

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    /// Every route in insertion order.
    pub fn all_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Anchor-agnostic `(feature, agent)` pairs for a renderer.
    pub fn endpoints(&self) -> impl Iterator<Item = (&FeatureId, &AgentId)> {
        self.connections.iter().map(Connection::endpoints)
    }

    pub fn conditional_connections_by_feature(&self) -> FeatureGroups<'_> {
        self.connections.conditional_by_feature()
    }

    /// Catalog features, those with conditional routes first.
    pub fn ordered_features(&self) -> Vec<&Feature> {
        order_features(self.entities.features(), &self.connections)
    }

    // --- Validation ---

    fn agent(&self, id: &AgentId) -> Result<&Agent, RoutingError> {
        self.entities
            .agent(id)
            .ok_or_else(|| RoutingError::UnknownAgent(id.clone()))
    }

    fn feature(&self, id: &FeatureId) -> Result<&Feature, RoutingError> {
        self.entities
            .feature(id)
            .ok_or_else(|| RoutingError::UnknownFeature(id.clone()))
    }

    fn check_role(&self, role: Role) -> Result<Role, RoutingError> {
        if self.roles.contains(&role) {
            return Ok(role);
        }
        if self.strict_roles {
            return Err(RoutingError::UnknownRole { role });
        }
        if !self.roles.is_empty() {
            warn!(%role, "role is not in the role catalog");
        }
        Ok(role)
    }

    fn check_rule(&self, rule: &Rule) -> Result<(), RoutingError> {
        for role in rule.roles() {
            self.check_role(role.clone())?;
        }
        self.warn_on_overlap(rule);
        Ok(())
    }

    fn warn_on_overlap(&self, rule: &Rule) {
        let overlap = rule.overlapping_roles().join(", ");
        if !overlap.is_empty() {
            warn!(roles = %overlap, "roles are both allowed and disallowed; disallowed wins");
        }
    }
}

fn not_found(agent_id: &AgentId, feature_id: &FeatureId) -> RoutingError {
    ConnectionError::ConnectionNotFound {
        agent_id: agent_id.clone(),
        feature_id: feature_id.clone(),
    }
    .into()
}
