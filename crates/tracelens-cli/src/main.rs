use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tracelens_core::app::{
    DEFAULT_MAX_CONTENT_LENGTH, ExplainOptions, Explainer, format_decision, format_run,
};
use tracelens_core::domain::{ExplanationLevel, NodeId, RunId, StepId, TraceId};

mod api;
mod stores;

use stores::Stores;

#[derive(Parser)]
#[command(
    name = "tracelens",
    version,
    about = "Explain AI agent decision traces for audit and debugging"
)]
struct Cli {
    /// Trace fixture (JSON array of traces with a tenantId)
    #[arg(long, env = "TRACELENS_TRACES", global = true)]
    traces: Option<PathBuf>,

    /// Context graph fixture (JSON array of nodes with an optional parentId)
    #[arg(long, env = "TRACELENS_GRAPH", global = true)]
    graph: Option<PathBuf>,

    /// Entity fixture used to resolve actor ids
    #[arg(long, env = "TRACELENS_ENTITIES", global = true)]
    entities: Option<PathBuf>,

    /// Tenant to explain for (the HTTP API reads it from x-tenant-id instead)
    #[arg(long, env = "TRACELENS_TENANT", global = true)]
    tenant: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// summary, detailed or full
    #[arg(long, default_value_t = ExplanationLevel::Detailed, global = true)]
    level: ExplanationLevel,

    /// Attach the source trace to each decision
    #[arg(long, global = true)]
    include_raw: bool,

    /// Resolve override actors through the entity fixture
    #[arg(long, global = true)]
    resolve_entities: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_LENGTH, global = true)]
    max_content_length: usize,

    /// Emit logs as JSON
    #[arg(long, env = "TRACELENS_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Explain a run, or one step of it
    Explain { run_id: String, step_id: Option<String> },
    /// Explain a single decision by trace id
    Decision { trace_id: String },
    /// Print the causal path leading to a context node
    Trajectory { node_id: String },
    /// Serve the explanation API over HTTP
    Serve {
        #[arg(long, env = "TRACELENS_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn options(&self) -> ExplainOptions {
        ExplainOptions::default()
            .with_level(self.level)
            .with_raw(self.include_raw)
            .with_entities(self.resolve_entities)
            .with_max_content_length(self.max_content_length)
    }

    fn explainer(&self, stores: &Stores) -> Result<Explainer> {
        let tenant = self
            .tenant
            .as_deref()
            .context("a tenant is required: pass --tenant or set TRACELENS_TENANT")?;
        Ok(stores.explainer(tenant)?)
    }
}

/// ログは stderr へ（stdout は説明の出力専用）
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tracelens=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let stores = Stores::load(
        cli.traces.as_deref(),
        cli.graph.as_deref(),
        cli.entities.as_deref(),
    )
    .await
    .context("failed to load fixtures")?;
    let options = cli.options();

    match &cli.command {
        Command::Explain { run_id, step_id: None } => {
            let explainer = cli.explainer(&stores)?;
            match explainer.explain_run(&RunId::new(run_id.as_str()), &options).await? {
                Some(run) if cli.format == OutputFormat::Json => print_json(&run)?,
                Some(run) => println!("{}", format_run(&run)),
                None => println!("No decisions found for run {run_id}"),
            }
        }
        Command::Explain { run_id, step_id: Some(step_id) } => {
            let explainer = cli.explainer(&stores)?;
            let step = explainer
                .explain_step(
                    &RunId::new(run_id.as_str()),
                    &StepId::new(step_id.as_str()),
                    &options,
                )
                .await?;
            match step {
                Some(decision) if cli.format == OutputFormat::Json => print_json(&decision)?,
                Some(decision) => println!("{}", format_decision(&decision)),
                None => println!("No decision found for step {step_id} in run {run_id}"),
            }
        }
        Command::Decision { trace_id } => {
            let explainer = cli.explainer(&stores)?;
            match explainer
                .explain_decision(&TraceId::new(trace_id.as_str()), &options)
                .await?
            {
                Some(decision) if cli.format == OutputFormat::Json => print_json(&decision)?,
                Some(decision) => println!("{}", format_decision(&decision)),
                None => println!("No decision found for trace {trace_id}"),
            }
        }
        Command::Trajectory { node_id } => {
            let explainer = cli.explainer(&stores)?;
            let node_id = NodeId::new(node_id.as_str());
            let lines = explainer.explain_trajectory(&node_id).await?;
            if cli.format == OutputFormat::Json {
                print_json(&api::TrajectoryResponse { node_id, lines })?;
            } else if lines.is_empty() {
                println!("No trajectory found for node {node_id}");
            } else {
                println!("{}", lines.join("\n"));
            }
        }
        Command::Serve { addr } => {
            let listener = tokio::net::TcpListener::bind(*addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(%addr, "tracelens API listening");
            axum::serve(listener, api::router(stores)).await?;
        }
    }

    Ok(())
}
