use super::RouteGraph;
use crate::config::RouterConfig;
use crate::connection::{Connection, ConnectionSet};
use crate::entity::{Agent, EntityCatalog, Feature};
use crate::error::RoutingError;
use crate::rule::{Role, RoleCatalog};
use crate::workflow::ConditionalWorkflow;

/// Assembles a [`RouteGraph`] from already-loaded data.
///
/// Existing routes are taken as-is: they keep their name snapshots, conditional
/// flag and status. Only the uniqueness of `(agent, feature)` pairs is checked.
#[derive(Debug, Default)]
pub struct RouteGraphBuilder {
    agents: Vec<Agent>,
    features: Vec<Feature>,
    roles: RoleCatalog,
    connections: Vec<Connection>,
    strict_roles: bool,
}

impl RouteGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the role catalog and validation policy from a config.
    pub fn with_config(mut self, config: &RouterConfig) -> Self {
        self.roles.extend(config.roles.iter().cloned());
        self.strict_roles = config.validation.strict_roles;
        self
    }

    pub fn with_agents(mut self, agents: impl IntoIterator<Item = Agent>) -> Self {
        self.agents.extend(agents);
        self
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn with_roles<R: Into<Role>>(mut self, roles: impl IntoIterator<Item = R>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_connections(mut self, connections: impl IntoIterator<Item = Connection>) -> Self {
        self.connections.extend(connections);
        self
    }

    pub fn strict_roles(mut self, strict: bool) -> Self {
        self.strict_roles = strict;
        self
    }

    pub fn build(self) -> Result<RouteGraph, RoutingError> {
        Ok(RouteGraph {
            entities: EntityCatalog::new(self.agents, self.features),
            roles: self.roles,
            connections: ConnectionSet::from_connections(self.connections)?,
            workflow: ConditionalWorkflow::new(),
            strict_roles: self.strict_roles,
        })
    }
}
