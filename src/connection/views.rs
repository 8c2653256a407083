use super::{Connection, ConnectionSet};
use crate::OrderedMap;
use crate::entity::{Feature, FeatureId};
use itertools::Itertools;

/// Routes grouped per feature. Features appear in the order of their first route,
/// and routes keep their order within each group.
pub type FeatureGroups<'a> = OrderedMap<FeatureId, Vec<&'a Connection>>;

impl ConnectionSet {
    /// Groups every route by its feature.
    pub fn by_feature(&self) -> FeatureGroups<'_> {
        group_by_feature(self.iter())
    }

    /// Groups only the routes committed by the conditional workflow.
    pub fn conditional_by_feature(&self) -> FeatureGroups<'_> {
        group_by_feature(self.iter().filter(|c| c.conditional))
    }
}

fn group_by_feature<'a>(connections: impl Iterator<Item = &'a Connection>) -> FeatureGroups<'a> {
    let mut groups = FeatureGroups::default();
    for connection in connections {
        groups
            .entry(connection.feature_id().clone())
            .or_default()
            .push(connection);
    }
    groups
}

/// Orders features for display: features with at least one conditional route come
/// first, the rest follow. The input order is kept within each of the two groups.
pub fn order_features<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    connections: &ConnectionSet,
) -> Vec<&'a Feature> {
    let conditional = connections.conditional_by_feature();
    features
        .into_iter()
        .sorted_by_key(|feature| !conditional.contains_key(&feature.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Agent;
    use crate::rule::Rule;

    #[test]
    fn groups_follow_first_route_order() {
        let mut set = ConnectionSet::new();
        let f1 = Feature::new("f1", "Auth");
        let f2 = Feature::new("f2", "Export");
        set.upsert(&Agent::new("a1", "A"), &f2, Rule::allow_all(), false);
        set.upsert(&Agent::new("a2", "B"), &f1, Rule::allow_all(), true);
        set.upsert(&Agent::new("a3", "C"), &f2, Rule::allow_all(), true);

        let groups = set.by_feature();
        let keys: Vec<_> = groups.keys().map(FeatureId::as_str).collect();
        assert_eq!(keys, vec!["f2", "f1"]);
        assert_eq!(groups[&FeatureId::from("f2")].len(), 2);

        let conditional = set.conditional_by_feature();
        assert_eq!(conditional[&FeatureId::from("f2")].len(), 1);
    }
}
