//! # routegraph - Role-Gated Routing Between Features and Agents
//!
//! **routegraph** is the in-memory core of an agent router. It keeps the routes that
//! connect *features* (capability providers) to *agents* (capability consumers),
//! the role-based [`Rule`](rule::Rule) attached to each route, and the multi-step
//! workflow that attaches one rule to several agents at once ("conditional routing").
//!
//! Agents, features and role names come from the surrounding application, which
//! also owns persistence; `routegraph` only acts on the data handed to it. The only
//! I/O is reading a config or a [`Workspace`](workspace::Workspace) export on request.
//!
//! ## Core Workflow
//!
//! 1.  **Load the catalogs**: Hand the current agents, features and role names to a
//!     [`RouteGraph`](router::RouteGraph), directly or through a
//!     [`RouterConfig`](config::RouterConfig).
//! 2.  **Route**: Create single routes with `create_connection`, or drive the
//!     conditional workflow (`start_conditional`, `proceed`, `toggle_agent`,
//!     `commit_conditional`) to route one feature to many agents.
//! 3.  **Query**: Read the ordered routes, the conditional routes grouped per
//!     feature, or ask whether a set of roles may use a route.
//!
//! ## Quick Start
//!
//! ```rust
//! use routegraph::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RouterConfig::from_toml_str(r#"roles = ["Admin", "Manager", "Guest"]"#)?;
//!     let mut graph = RouteGraph::builder()
//!         .with_config(&config)
//!         .with_agents([Agent::new("claude", "Claude Agent")])
//!         .with_features([Feature::new("uploads", "File Upload")])
//!         .build()?;
//!
//!     let rule = Rule::deny_all().allow("Admin").allow("Manager").deny("Guest");
//!     graph.create_connection(&"claude".into(), &"uploads".into(), rule)?;
//!
//!     let admin = [Role::from("Admin")];
//!     let report = graph.test_access(&"claude".into(), &"uploads".into(), &admin)?;
//!     assert!(report.allowed);
//!     println!("-> {}", report.reason);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod router;
pub mod rule;
pub mod workflow;
pub mod workspace;

use ahash::RandomState;
use indexmap::{IndexMap, IndexSet};

/// Insertion-ordered map hashed with `ahash`.
pub type OrderedMap<K, V> = IndexMap<K, V, RandomState>;

/// Insertion-ordered set hashed with `ahash`.
pub type OrderedSet<T> = IndexSet<T, RandomState>;
