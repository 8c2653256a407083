//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the routegraph crate.
//! Import this module to get the facade, the domain types and the error enums
//! without importing each one individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use routegraph::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RouterConfig::from_file("routegraph.toml")?;
//! let mut graph = RouteGraph::with_config(&config);
//! graph.refresh_entities(
//!     vec![Agent::new("a1", "Claude Agent")],
//!     vec![Feature::new("f1", "Email Notifications")],
//! );
//! graph.create_connection(&"a1".into(), &"f1".into(), Rule::allow_all())?;
//!
//! for feature in graph.ordered_features() {
//!     println!("{}", feature.name);
//! }
//! # Ok(())
//! # }
//! ```

// Facade
pub use crate::router::{AccessReport, BulkOutcome, NewRoute, RouteGraph, RouteGraphBuilder};

// Domain types
pub use crate::connection::{
    ConditionKind, Connection, ConnectionSet, RouteCondition, RouteKey, RouteStatus,
};
pub use crate::entity::{Agent, AgentId, Feature, FeatureId};
pub use crate::rule::{Access, Decision, DecisionReason, Role, RoleCatalog, Rule, evaluate};
pub use crate::workflow::{
    CommitReport, ConditionalWorkflow, Draft, WorkflowAction, WorkflowStage,
};

// Configuration and loading
pub use crate::config::RouterConfig;
pub use crate::workspace::{Workspace, WorkspaceRoute};

// Error types
pub use crate::error::{
    ConfigError, ConnectionError, RoutingError, WorkflowError, WorkspaceError,
};
