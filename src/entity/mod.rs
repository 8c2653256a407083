//! Read-only agents and features supplied by the surrounding application.
//!
//! The routing core never creates, renames or deletes these entities. It only
//! keeps the latest lists handed to it so that connections can snapshot display
//! names and so that derived views can follow the caller's ordering.

pub mod catalog;
pub mod ids;

pub use catalog::*;
pub use ids::*;

use serde::{Deserialize, Serialize};

/// A capability consumer that features can be routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A capability provider that can be exposed to agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
}

impl Feature {
    pub fn new(id: impl Into<FeatureId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
