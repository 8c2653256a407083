use crate::entity::{AgentId, FeatureId};
use crate::rule::Role;
use crate::workflow::{WorkflowAction, WorkflowStage};
use thiserror::Error;

/// Errors raised by the connection set when a mutation would break its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("A route from feature '{feature_id}' to agent '{agent_id}' already exists")]
    DuplicateConnection {
        agent_id: AgentId,
        feature_id: FeatureId,
    },

    #[error("No route from feature '{feature_id}' to agent '{agent_id}'")]
    ConnectionNotFound {
        agent_id: AgentId,
        feature_id: FeatureId,
    },
}

/// Errors raised by the conditional route workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Cannot {action} while the conditional workflow is {stage}")]
    InvalidTransition {
        stage: WorkflowStage,
        action: WorkflowAction,
    },

    #[error("Agent '{agent_id}' selected in the draft is not in the entity catalog")]
    UnresolvedAgent { agent_id: AgentId },
}

/// Errors surfaced by the `RouteGraph` facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Agent '{0}' not found in the entity catalog")]
    UnknownAgent(AgentId),

    #[error("Feature '{0}' not found in the entity catalog")]
    UnknownFeature(FeatureId),

    #[error("Role '{role}' is not part of the role catalog")]
    UnknownRole { role: Role },
}

/// Errors that can occur while loading a `RouterConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur while loading a `Workspace` export.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Could not read workspace file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workspace JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
