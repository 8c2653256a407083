use clap::{Parser, Subcommand};
use routegraph::prelude::*;
use tracing_subscriber::EnvFilter;

/// Inspect the routes of an agent router workspace
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workspace JSON file (agents, features, roles, routes)
    workspace: String,

    /// Optional TOML config with the role catalog and validation policy
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print features in display order with their routes
    List,
    /// Print the conditional routes grouped by feature
    Conditional,
    /// Check whether a caller holding the given roles may use a route
    Check {
        #[arg(short, long)]
        agent: String,
        #[arg(short, long)]
        feature: String,
        /// Roles held by the caller (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref().map(|path| {
        RouterConfig::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()))
    });

    let graph = Workspace::from_file(&cli.workspace)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
        .into_graph(config.as_ref())
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid workspace: {}", e)));

    match cli.command {
        Command::List => print_routes(&graph),
        Command::Conditional => print_conditional(&graph),
        Command::Check {
            agent,
            feature,
            roles,
            json,
        } => {
            let roles: Vec<Role> = roles.into_iter().map(Role::from).collect();
            let report = graph
                .test_access(&agent.into(), &feature.into(), &roles)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => exit_with_error(&format!("Failed to serialize report: {}", e)),
                }
            } else {
                let verdict = if report.allowed { "ALLOW" } else { "DENY" };
                println!(
                    "{} {} -> {}: {}",
                    verdict, report.feature_id, report.agent_id, report.reason
                );
            }
        }
    }
}

fn print_routes(graph: &RouteGraph) {
    let groups = graph.connections().by_feature();
    for feature in graph.ordered_features() {
        println!("{} ({})", feature.name, feature.id);
        let Some(routes) = groups.get(&feature.id) else {
            println!("  (no routes)");
            continue;
        };
        for route in routes {
            let marker = if route.conditional { "*" } else { " " };
            println!(
                " {} -> {} [{}] {}",
                marker,
                route.agent.name,
                route.status,
                describe_rule(&route.rule)
            );
            for condition in &route.conditions {
                println!("      if {} ({})", condition.name, condition.kind);
            }
        }
    }
}

fn print_conditional(graph: &RouteGraph) {
    let groups = graph.conditional_connections_by_feature();
    if groups.is_empty() {
        println!("No conditional routes.");
        return;
    }
    for (feature_id, routes) in &groups {
        let agents: Vec<&str> = routes.iter().map(|r| r.agent.name.as_str()).collect();
        println!("{}: {}", feature_id, agents.join(", "));
    }
}

fn describe_rule(rule: &Rule) -> String {
    let list = |roles: &routegraph::OrderedSet<Role>| {
        roles.iter().map(Role::as_str).collect::<Vec<_>>().join(", ")
    };
    let mut text = if rule.allow_all {
        "allow all".to_string()
    } else if rule.allowed.is_empty() {
        "deny all".to_string()
    } else {
        format!("allow {}", list(&rule.allowed))
    };
    if !rule.disallowed.is_empty() {
        text.push_str(&format!(", except {}", list(&rule.disallowed)));
    }
    text
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
