//! Tests for the `RouteGraph` facade: single routes, bulk creation, access checks and views.
mod common;
use common::*;
use routegraph::prelude::*;

#[test]
fn test_create_then_duplicate() {
    let mut graph = empty_graph();
    let created = graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap();
    assert!(!created.conditional);
    assert_eq!(created.agent.name, "Claude Agent");
    assert_eq!(created.feature.name, "User Authentication");
    assert_eq!(graph.all_connections().count(), 1);

    let err = graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap_err();
    assert!(matches!(
        err,
        RoutingError::Connection(ConnectionError::DuplicateConnection { .. })
    ));
    assert_eq!(graph.all_connections().count(), 1);
}

#[test]
fn test_create_requires_catalog_entities() {
    let mut graph = empty_graph();
    assert_eq!(
        graph
            .create_connection(&agent("A9"), &feature("F1"), Rule::allow_all())
            .unwrap_err(),
        RoutingError::UnknownAgent(agent("A9"))
    );
    assert_eq!(
        graph
            .create_connection(&agent("A1"), &feature("F9"), Rule::allow_all())
            .unwrap_err(),
        RoutingError::UnknownFeature(feature("F9"))
    );
}

#[test]
fn test_edit_rule_replaces_wholesale_and_keeps_flag() {
    let mut graph = ready_graph("F2", &["A3"], Rule::allow_all());
    graph.commit_conditional().unwrap();

    let new_rule = Rule::deny_all().deny("Guest");
    let edited = graph
        .edit_rule(&agent("A3"), &feature("F2"), new_rule.clone())
        .unwrap();
    assert_eq!(edited.rule, new_rule);
    assert!(edited.conditional);

    assert!(matches!(
        graph.edit_rule(&agent("A1"), &feature("F2"), Rule::allow_all()),
        Err(RoutingError::Connection(ConnectionError::ConnectionNotFound { .. }))
    ));
}

#[test]
fn test_remove_connection_is_idempotent() {
    let mut graph = empty_graph();
    graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap();
    assert!(graph.remove_connection(&agent("A1"), &feature("F1")).is_some());
    assert!(graph.remove_connection(&agent("A1"), &feature("F1")).is_none());
    assert_eq!(graph.all_connections().count(), 0);
}

#[test]
fn test_bulk_create_reports_each_failure() {
    let mut graph = empty_graph();
    let outcome = graph.create_connections(vec![
        NewRoute::new("A1", "F1", Rule::allow_all()),
        NewRoute::new("A1", "F1", Rule::deny_all()),
        NewRoute::new("A9", "F2", Rule::allow_all()),
        NewRoute::new("A2", "F2", Rule::deny_all().allow("Admin")),
    ]);

    assert_eq!(outcome.total_created(), 2);
    assert_eq!(outcome.total_failed(), 2);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.created[1], RouteKey::new("A2", "F2"));
    assert_eq!(
        outcome.failed[1].error,
        RoutingError::UnknownAgent(agent("A9"))
    );
    assert_eq!(graph.all_connections().count(), 2);
}

#[test]
fn test_bulk_request_uses_api_field_names() {
    let request: NewRoute = serde_json::from_str(
        r#"{"agent_id": "A1", "feature_id": "F1", "rules": {"allowAll": false, "allowed": ["Admin"]}}"#,
    )
    .unwrap();
    assert_eq!(request.rule, Rule::deny_all().allow("Admin"));
}

#[test]
fn test_access_report_follows_rule_precedence() {
    let mut graph = empty_graph();
    let rule = Rule::deny_all()
        .allow("Admin")
        .allow("Manager")
        .deny("Guest");
    graph
        .create_connection(&agent("A3"), &feature("F2"), rule)
        .unwrap();

    let report = graph
        .test_access(&agent("A3"), &feature("F2"), &roles(&["Manager"]))
        .unwrap();
    assert!(report.allowed);
    assert_eq!(report.reason, "role 'Manager' is allowed");

    let report = graph
        .test_access(&agent("A3"), &feature("F2"), &roles(&["Admin", "Guest"]))
        .unwrap();
    assert!(!report.allowed);
    assert_eq!(report.reason, "role 'Guest' is disallowed");

    let report = graph
        .test_access(&agent("A3"), &feature("F2"), &roles(&["Reviewer"]))
        .unwrap();
    assert!(!report.allowed);
}

#[test]
fn test_inactive_route_denies_everyone() {
    let mut graph = empty_graph();
    graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap();
    graph
        .set_status(&agent("A1"), &feature("F1"), RouteStatus::Inactive)
        .unwrap();

    let report = graph
        .test_access(&agent("A1"), &feature("F1"), &roles(&["Admin"]))
        .unwrap();
    assert!(!report.allowed);
    assert_eq!(report.reason, "route is inactive");
    assert!(report.decision.is_none());
}

#[test]
fn test_access_on_missing_route() {
    let graph = empty_graph();
    assert!(graph
        .test_access(&agent("A1"), &feature("F1"), &roles(&["Admin"]))
        .is_err());
}

#[test]
fn test_ordered_features_surface_conditional_first() {
    let mut graph = empty_graph();
    graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap();
    graph.start_conditional(&feature("F4")).unwrap();
    graph.proceed().unwrap();
    graph.toggle_agent(&agent("A4")).unwrap();
    graph.commit_conditional().unwrap();

    graph.start_conditional(&feature("F2")).unwrap();
    graph.proceed().unwrap();
    graph.toggle_agent(&agent("A3")).unwrap();
    graph.commit_conditional().unwrap();

    let order: Vec<_> = graph
        .ordered_features()
        .into_iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(order, vec!["F2", "F4", "F1", "F3"]);
}

#[test]
fn test_conditional_view_groups_by_feature() {
    let mut graph = ready_graph("F4", &["A4", "A1"], Rule::allow_all());
    graph.commit_conditional().unwrap();
    graph
        .create_connection(&agent("A2"), &feature("F4"), Rule::allow_all())
        .unwrap();

    let groups = graph.conditional_connections_by_feature();
    assert_eq!(groups.len(), 1);
    let agents: Vec<_> = groups[&feature("F4")]
        .iter()
        .map(|c| c.agent_id().as_str())
        .collect();
    assert_eq!(agents, vec!["A4", "A1"]);

    let endpoints: Vec<_> = graph.endpoints().collect();
    assert_eq!(endpoints.len(), 3);
    assert_eq!(endpoints[2], (&feature("F4"), &agent("A2")));
}

#[test]
fn test_strict_roles_reject_unknown_roles() {
    let config = RouterConfig::from_toml_str(
        r#"
        roles = ["Admin", "Guest"]

        [validation]
        strict_roles = true
        "#,
    )
    .unwrap();
    let mut graph = RouteGraph::builder()
        .with_config(&config)
        .with_agents(sample_agents())
        .with_features(sample_features())
        .build()
        .unwrap();

    let err = graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::deny_all().allow("Root"))
        .unwrap_err();
    assert_eq!(err, RoutingError::UnknownRole { role: Role::from("Root") });

    graph.start_conditional(&feature("F1")).unwrap();
    assert!(graph.toggle_draft_allowed("Root").is_err());
    graph.toggle_draft_allowed("Admin").unwrap();

    graph.extend_roles(["Root"]);
    assert!(graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::deny_all().allow("Root"))
        .is_ok());
}

#[test]
fn test_lenient_roles_accept_unknown_roles() {
    let mut graph = empty_graph();
    assert!(graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::deny_all().allow("Root"))
        .is_ok());
}

#[test]
fn test_with_config_loads_role_catalog() {
    let config = RouterConfig::from_toml_str(r#"roles = ["Admin", "Reviewer"]"#).unwrap();
    let graph = RouteGraph::with_config(&config);
    let names: Vec<_> = graph.roles().iter().map(Role::as_str).collect();
    assert_eq!(names, vec!["Admin", "Reviewer"]);
}

#[test]
fn test_names_are_snapshots_until_resync() {
    let mut graph = empty_graph();
    graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::allow_all())
        .unwrap();

    let mut agents = sample_agents();
    agents[0].name = "Claude Opus".to_string();
    graph.refresh_entities(agents, sample_features());

    let route = graph.all_connections().next().unwrap();
    assert_eq!(route.agent.name, "Claude Agent");

    assert_eq!(graph.resync_names(), 1);
    let route = graph.all_connections().next().unwrap();
    assert_eq!(route.agent.name, "Claude Opus");
}

#[test]
fn test_builder_rejects_duplicate_initial_routes() {
    let route = Connection::new(
        Agent::new("A1", "Claude Agent"),
        Feature::new("F1", "User Authentication"),
        Rule::allow_all(),
    );
    let result = RouteGraph::builder()
        .with_agents(sample_agents())
        .with_features(sample_features())
        .with_connections([route.clone(), route])
        .build();
    assert!(matches!(
        result,
        Err(RoutingError::Connection(ConnectionError::DuplicateConnection { .. }))
    ));
}

#[test]
fn test_route_conditions_through_the_facade() {
    let mut graph = empty_graph();
    let condition = RouteCondition::new("High Priority Users", ConditionKind::RoleBased)
        .with_description("Override time restrictions for managers")
        .with_data("allowed_roles", serde_json::json!(["Admin", "Manager"]))
        .with_data("override_time_restrictions", true);

    assert_eq!(
        graph
            .add_condition(&agent("A1"), &feature("F1"), condition.clone())
            .unwrap_err(),
        RoutingError::Connection(ConnectionError::ConnectionNotFound {
            agent_id: agent("A1"),
            feature_id: feature("F1"),
        })
    );

    graph
        .create_connection(&agent("A1"), &feature("F1"), Rule::deny_all().allow("Admin"))
        .unwrap();
    let route = graph
        .add_condition(&agent("A1"), &feature("F1"), condition.clone())
        .unwrap();
    assert_eq!(route.conditions, vec![condition.clone()]);

    // Conditions are carried, not enforced.
    let report = graph
        .test_access(&agent("A1"), &feature("F1"), &roles(&["Manager"]))
        .unwrap();
    assert!(!report.allowed);

    assert_eq!(
        graph
            .remove_condition(&agent("A1"), &feature("F1"), "High Priority Users")
            .unwrap(),
        Some(condition)
    );
    assert_eq!(
        graph
            .remove_condition(&agent("A1"), &feature("F1"), "High Priority Users")
            .unwrap(),
        None
    );
}

#[test]
fn test_conditional_commit_keeps_route_conditions() {
    let mut graph = empty_graph();
    graph
        .create_connection(&agent("A2"), &feature("F4"), Rule::allow_all())
        .unwrap();
    graph
        .add_condition(
            &agent("A2"),
            &feature("F4"),
            RouteCondition::new("Business Hours", ConditionKind::TimeBased),
        )
        .unwrap();

    graph.start_conditional(&feature("F4")).unwrap();
    graph.set_draft_allow_all(false).unwrap();
    graph.toggle_draft_allowed("Reviewer").unwrap();
    graph.proceed().unwrap();
    graph.toggle_agent(&agent("A2")).unwrap();
    let report = graph.commit_conditional().unwrap();
    assert_eq!(report.updated, vec![agent("A2")]);

    let route = graph.connections().find(&agent("A2"), &feature("F4")).unwrap();
    assert!(route.conditional);
    assert!(route.condition("Business Hours").is_some());
}
