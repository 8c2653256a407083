use super::{Connection, RouteCondition, RouteKey, RouteStatus};
use crate::OrderedMap;
use crate::entity::{Agent, AgentId, EntityCatalog, Feature, FeatureId};
use crate::error::ConnectionError;
use crate::rule::Rule;
use indexmap::Equivalent;
use tracing::{debug, warn};

/// Borrowed form of [`RouteKey`] so lookups don't allocate.
///
/// Must hash exactly like `RouteKey`: agent id first, then feature id.
#[derive(Hash)]
struct RouteKeyRef<'a>(&'a AgentId, &'a FeatureId);

impl Equivalent<RouteKey> for RouteKeyRef<'_> {
    fn equivalent(&self, key: &RouteKey) -> bool {
        *self.0 == key.agent_id && *self.1 == key.feature_id
    }
}

/// What [`ConnectionSet::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// All routes of a workspace, in insertion order.
///
/// There is at most one route per `(agent, feature)` pair. Every mutation goes
/// through `add`, `upsert`, `remove` or the in-place editors, none of which can
/// produce a second route for an existing pair.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet {
    routes: OrderedMap<RouteKey, Connection>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from existing routes, rejecting the first duplicate pair.
    pub fn from_connections(
        connections: impl IntoIterator<Item = Connection>,
    ) -> Result<Self, ConnectionError> {
        let mut set = Self::new();
        for connection in connections {
            set.add(connection)?;
        }
        Ok(set)
    }

    /// Appends a route. Fails if the pair is already routed.
    pub fn add(&mut self, connection: Connection) -> Result<(), ConnectionError> {
        let key = connection.key();
        if self.routes.contains_key(&key) {
            return Err(ConnectionError::DuplicateConnection {
                agent_id: key.agent_id,
                feature_id: key.feature_id,
            });
        }
        debug!(route = %key, conditional = connection.conditional, "route added");
        self.routes.insert(key, connection);
        Ok(())
    }

    /// Replaces `rule` and `conditional` of an existing route in place, or appends a
    /// new route if the pair is not routed yet.
    ///
    /// An existing route keeps its position, status, conditions and name snapshots.
    pub fn upsert(
        &mut self,
        agent: &Agent,
        feature: &Feature,
        rule: Rule,
        conditional: bool,
    ) -> UpsertOutcome {
        if let Some(existing) = self.routes.get_mut(&RouteKeyRef(&agent.id, &feature.id)) {
            existing.rule = rule;
            existing.conditional = conditional;
            debug!(route = %existing.key(), conditional, "route updated");
            return UpsertOutcome::Updated;
        }

        let connection = Connection {
            conditional,
            ..Connection::new(agent.clone(), feature.clone(), rule)
        };
        debug!(route = %connection.key(), conditional, "route added");
        self.routes.insert(connection.key(), connection);
        UpsertOutcome::Inserted
    }

    /// Removes a route, keeping the order of the others. Removing an absent pair is a no-op.
    pub fn remove(&mut self, agent_id: &AgentId, feature_id: &FeatureId) -> Option<Connection> {
        let removed = self.routes.shift_remove(&RouteKeyRef(agent_id, feature_id));
        if let Some(connection) = &removed {
            debug!(route = %connection.key(), "route removed");
        }
        removed
    }

    pub fn find(&self, agent_id: &AgentId, feature_id: &FeatureId) -> Option<&Connection> {
        self.routes.get(&RouteKeyRef(agent_id, feature_id))
    }

    pub fn contains(&self, agent_id: &AgentId, feature_id: &FeatureId) -> bool {
        self.routes.contains_key(&RouteKeyRef(agent_id, feature_id))
    }

    /// Replaces the rule of an existing route wholesale.
    pub fn replace_rule(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        rule: Rule,
    ) -> Result<&Connection, ConnectionError> {
        let connection = self.get_mut(agent_id, feature_id)?;
        connection.rule = rule;
        debug!(route = %connection.key(), "route rule replaced");
        Ok(connection)
    }

    pub fn set_status(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        status: RouteStatus,
    ) -> Result<&Connection, ConnectionError> {
        let connection = self.get_mut(agent_id, feature_id)?;
        connection.status = status;
        debug!(route = %connection.key(), %status, "route status changed");
        Ok(connection)
    }

    /// Attaches a condition to a route. A condition with the same name is replaced in place.
    pub fn add_condition(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        condition: RouteCondition,
    ) -> Result<&Connection, ConnectionError> {
        let connection = self.get_mut(agent_id, feature_id)?;
        debug!(route = %connection.key(), condition = %condition.name, kind = %condition.kind, "route condition attached");
        match connection.conditions.iter_mut().find(|c| c.name == condition.name) {
            Some(existing) => *existing = condition,
            None => connection.conditions.push(condition),
        }
        Ok(connection)
    }

    /// Detaches a condition by name. Detaching a condition the route does not carry is a no-op.
    pub fn remove_condition(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
        name: &str,
    ) -> Result<Option<RouteCondition>, ConnectionError> {
        let connection = self.get_mut(agent_id, feature_id)?;
        let Some(position) = connection.conditions.iter().position(|c| c.name == name) else {
            return Ok(None);
        };
        debug!(route = %connection.key(), condition = name, "route condition detached");
        Ok(Some(connection.conditions.remove(position)))
    }

    /// Refreshes every name snapshot from the catalog.
    ///
    /// Routes whose agent or feature is no longer in the catalog keep their old
    /// names. Returns how many routes changed.
    pub fn resync_names(&mut self, catalog: &EntityCatalog) -> usize {
        let mut changed = 0;
        for connection in self.routes.values_mut() {
            let agent = catalog.agent(&connection.agent.id);
            let feature = catalog.feature(&connection.feature.id);
            if agent.is_none() || feature.is_none() {
                warn!(route = %connection.key(), "route points at an entity missing from the catalog");
            }

            let mut touched = false;
            if let Some(agent) = agent.filter(|a| a.name != connection.agent.name) {
                connection.agent.name = agent.name.clone();
                touched = true;
            }
            if let Some(feature) = feature.filter(|f| f.name != connection.feature.name) {
                connection.feature.name = feature.name.clone();
                touched = true;
            }
            if touched {
                changed += 1;
            }
        }
        debug!(changed, "route names resynchronized");
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.routes.values()
    }

    pub fn for_agent<'a>(
        &'a self,
        agent_id: &AgentId,
    ) -> impl Iterator<Item = &'a Connection> + use<'a> {
        let agent_id = agent_id.clone();
        self.routes.values().filter(move |c| *c.agent_id() == agent_id)
    }

    pub fn for_feature<'a>(
        &'a self,
        feature_id: &FeatureId,
    ) -> impl Iterator<Item = &'a Connection> + use<'a> {
        let feature_id = feature_id.clone();
        self.routes.values().filter(move |c| *c.feature_id() == feature_id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn get_mut(
        &mut self,
        agent_id: &AgentId,
        feature_id: &FeatureId,
    ) -> Result<&mut Connection, ConnectionError> {
        self.routes
            .get_mut(&RouteKeyRef(agent_id, feature_id))
            .ok_or_else(|| ConnectionError::ConnectionNotFound {
                agent_id: agent_id.clone(),
                feature_id: feature_id.clone(),
            })
    }
}

impl<'a> IntoIterator for &'a ConnectionSet {
    type Item = &'a Connection;
    type IntoIter = indexmap::map::Values<'a, RouteKey, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.values()
    }
}
