use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serde_json::json;
use shindan::workflow::{NodeConfig, WorkflowBuilder};
use tracing_subscriber::EnvFilter;

/// Aliases the generator draws from for body nodes.
const BODY_ALIASES: &[&str] = &[
    "set", "code", "http", "postgres", "if", "switch", "merge", "filter", "wait", "loop",
    "split_batch", "slack", "email",
];

/// A CLI tool to generate random workflow documents for the analyzer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of body nodes between the trigger and the response
    #[arg(long, default_value_t = 20)]
    nodes: usize,

    /// Probability that a body node also connects to a second, later node
    #[arg(long, default_value_t = 0.2)]
    branch_probability: f64,

    /// Add one back edge so the workflow contains a cycle
    #[arg(long)]
    cycle: bool,

    /// Workflow name
    #[arg(long, default_value = "Generated Workflow")]
    name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if !(0.0..=1.0).contains(&cli.branch_probability) {
        tracing::error!(
            value = cli.branch_probability,
            "--branch-probability must be between 0 and 1"
        );
        std::process::exit(1);
    }

    let mut rng = rand::rng();
    let mut builder = WorkflowBuilder::new();

    let trigger = builder.webhook("/generated", "POST");
    let body: Vec<String> = (0..cli.nodes)
        .map(|i| add_body_node(&mut builder, &mut rng, i))
        .collect();
    let respond = builder.respond("json");

    let mut sequence: Vec<&str> = vec![trigger.as_str()];
    sequence.extend(body.iter().map(String::as_str));
    sequence.push(respond.as_str());
    builder.chain(&sequence)?;

    let mut branches = 0;
    for (i, source) in body.iter().enumerate() {
        let remaining = body.len() - i - 1;
        if remaining > 1 && rng.random_bool(cli.branch_probability) {
            let target = &body[rng.random_range(i + 2..body.len())];
            builder.connect_slots(source, target, "main", "main", 1, 0);
            branches += 1;
        }
    }

    if cli.cycle && body.len() > 1 {
        let from = rng.random_range(1..body.len());
        let to = rng.random_range(0..from);
        builder.connect(&body[from], &body[to]);
        tracing::info!(from = %body[from], to = %body[to], "Added back edge");
    }

    let document = builder.build(Some(&cli.name));
    document.save(&cli.output)?;

    tracing::info!(
        nodes = document.nodes.len(),
        connections = document.connection_count(),
        branches,
        output = %cli.output,
        "Generated workflow"
    );
    Ok(())
}

fn add_body_node(builder: &mut WorkflowBuilder, rng: &mut ThreadRng, index: usize) -> String {
    let alias = BODY_ALIASES.choose(rng).copied().unwrap_or("set");
    match alias {
        "http" => {
            let scheme = if rng.random_bool(0.3) { "http" } else { "https" };
            let host = rng.random_range(0..3);
            builder.http(&format!("{}://api{}.example.com/items", scheme, host), "GET", &[])
        }
        "postgres" => builder.database("postgres", "executeQuery", Some("SELECT * FROM items")),
        "wait" => builder.add_node(
            "wait",
            NodeConfig::named(&format!("Pause {}", index))
                .with_parameters(json!({ "amount": rng.random_range(1..10) })),
        ),
        other => builder.add_node(other, NodeConfig::named(&format!("Step {} ({})", index, other))),
    }
}
