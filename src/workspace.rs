use crate::config::RouterConfig;
use crate::connection::{Connection, RouteCondition, RouteStatus};
use crate::entity::{Agent, AgentId, Feature, FeatureId};
use crate::error::{RoutingError, WorkspaceError};
use crate::router::RouteGraph;
use crate::rule::{Role, Rule};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A workspace export of the admin application: catalogs plus existing routes.
///
/// Routes reference agents and features by id and carry their rule under `rules`,
/// matching the API's route records. Missing `conditional`, `status` and
/// `conditions` fields take their defaults.
///
/// ```json
/// {
///   "agents": [{ "id": "A1", "name": "Claude Agent" }],
///   "features": [{ "id": "F1", "name": "User Authentication" }],
///   "roles": ["Admin", "Guest"],
///   "routes": [{ "agent_id": "A1", "feature_id": "F1", "rules": { "allowAll": true } }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub routes: Vec<WorkspaceRoute>,
}

/// One route record of a [`Workspace`].
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceRoute {
    pub agent_id: AgentId,
    pub feature_id: FeatureId,
    #[serde(default)]
    pub rules: Rule,
    #[serde(default)]
    pub conditional: bool,
    #[serde(default)]
    pub status: RouteStatus,
    #[serde(default)]
    pub conditions: Vec<RouteCondition>,
}

impl Workspace {
    pub fn from_json_str(content: &str) -> Result<Self, WorkspaceError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Builds a graph from the workspace, applying `config` first when given.
    ///
    /// Fails on a route whose agent or feature is not in the workspace catalogs, and
    /// on a second route for the same pair.
    pub fn into_graph(self, config: Option<&RouterConfig>) -> Result<RouteGraph, RoutingError> {
        let mut connections = Vec::with_capacity(self.routes.len());
        for route in self.routes {
            let agent = self
                .agents
                .iter()
                .find(|a| a.id == route.agent_id)
                .ok_or_else(|| RoutingError::UnknownAgent(route.agent_id.clone()))?;
            let feature = self
                .features
                .iter()
                .find(|f| f.id == route.feature_id)
                .ok_or_else(|| RoutingError::UnknownFeature(route.feature_id.clone()))?;
            connections.push(Connection {
                conditional: route.conditional,
                status: route.status,
                conditions: route.conditions,
                ..Connection::new(agent.clone(), feature.clone(), route.rules)
            });
        }
        debug!(routes = connections.len(), "workspace routes resolved");

        let mut builder = RouteGraph::builder();
        if let Some(config) = config {
            builder = builder.with_config(config);
        }
        builder
            .with_roles(self.roles)
            .with_agents(self.agents)
            .with_features(self.features)
            .with_connections(connections)
            .build()
    }
}
