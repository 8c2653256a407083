//! Common fixtures for building catalogs, routes and graphs.
use routegraph::prelude::*;

/// Agents from the seeded admin workspace.
#[allow(dead_code)]
pub fn sample_agents() -> Vec<Agent> {
    vec![
        Agent::new("A1", "Claude Agent"),
        Agent::new("A2", "GPT-4 Agent"),
        Agent::new("A3", "Code Assistant"),
        Agent::new("A4", "Data Analyst"),
    ]
}

/// Features from the seeded admin workspace.
#[allow(dead_code)]
pub fn sample_features() -> Vec<Feature> {
    vec![
        Feature::new("F1", "User Authentication"),
        Feature::new("F2", "File Upload"),
        Feature::new("F3", "Email Notifications"),
        Feature::new("F4", "Data Export"),
    ]
}

#[allow(dead_code)]
pub fn sample_roles() -> Vec<&'static str> {
    vec!["Admin", "Manager", "Reviewer", "Guest"]
}

/// A graph with the sample catalogs and no routes.
#[allow(dead_code)]
pub fn empty_graph() -> RouteGraph {
    RouteGraph::builder()
        .with_agents(sample_agents())
        .with_features(sample_features())
        .with_roles(sample_roles())
        .build()
        .expect("sample catalogs are valid")
}

/// A graph whose workflow is `Ready` for `feature` with the given agents selected.
#[allow(dead_code)]
pub fn ready_graph(feature: &str, agents: &[&str], rule: Rule) -> RouteGraph {
    let mut graph = empty_graph();
    graph.start_conditional(&feature.into()).unwrap();
    graph.set_draft_rule(rule).unwrap();
    graph.proceed().unwrap();
    for agent in agents {
        graph.toggle_agent(&(*agent).into()).unwrap();
    }
    assert_eq!(graph.workflow_stage(), WorkflowStage::Ready);
    graph
}

#[allow(dead_code)]
pub fn agent(id: &str) -> AgentId {
    AgentId::from(id)
}

#[allow(dead_code)]
pub fn feature(id: &str) -> FeatureId {
    FeatureId::from(id)
}

#[allow(dead_code)]
pub fn roles(names: &[&str]) -> Vec<Role> {
    names.iter().map(|n| Role::from(*n)).collect()
}
