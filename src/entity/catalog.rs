use super::{Agent, AgentId, Feature, FeatureId};
use crate::OrderedMap;
use tracing::debug;

/// The latest agent and feature lists handed over by the caller.
///
/// Both lists keep the order they were supplied in. If the same id appears twice,
/// the later entry replaces the earlier one's name but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    agents: OrderedMap<AgentId, Agent>,
    features: OrderedMap<FeatureId, Feature>,
}

impl EntityCatalog {
    pub fn new(
        agents: impl IntoIterator<Item = Agent>,
        features: impl IntoIterator<Item = Feature>,
    ) -> Self {
        let mut catalog = Self::default();
        catalog.replace(agents, features);
        catalog
    }

    /// Replaces both lists wholesale.
    pub fn replace(
        &mut self,
        agents: impl IntoIterator<Item = Agent>,
        features: impl IntoIterator<Item = Feature>,
    ) {
        self.agents = agents.into_iter().map(|a| (a.id.clone(), a)).collect();
        self.features = features.into_iter().map(|f| (f.id.clone(), f)).collect();
        debug!(
            agents = self.agents.len(),
            features = self.features.len(),
            "entity catalog refreshed"
        );
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }
}
