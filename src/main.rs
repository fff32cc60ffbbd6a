//! Free Tier POC service.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from an optional TOML file plus the `PORT` environment
//! override, sets up the Axum router, and starts the HTTP server. The
//! `plan` subcommand instead runs the self-heal planner as an offline dry
//! run against captured cluster events.

mod config;
mod http;
mod middleware;
mod routes;
mod selfheal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use routes::create_router;
use selfheal::{RemediationPlan, ServiceRef};

/// Free Tier POC: minimal HTTP service with a self-heal planner
#[derive(Parser, Debug)]
#[command(name = "freetier", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "freetier=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dry-run the self-heal planner against a captured cluster event
    Plan {
        /// Path to a task state-change event JSON file
        #[arg(long)]
        event: PathBuf,

        /// Captured model response; omit to print the rendered prompt instead
        #[arg(long)]
        model_output: Option<PathBuf>,

        /// Recent service events as a JSON array file (prompt context)
        #[arg(long)]
        service_events: Option<PathBuf>,

        /// Current desired count of the target service
        #[arg(long, default_value_t = 0)]
        desired_count: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(Command::Plan {
        event,
        model_output,
        service_events,
        desired_count,
    }) = args.command
    {
        return run_plan(&event, model_output.as_deref(), service_events.as_deref(), desired_count);
    }

    // Load configuration, then apply PORT override (fail fast on a bad value)
    let mut config = AppConfig::load(&args.config)?;
    config.apply_env_overrides()?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(config = %args.config, "Loaded configuration");
    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        "HTTP listener configured"
    );

    let app = create_router();

    crate::http::server::start_server(app, &config).await?;

    Ok(())
}

/// Offline dry run of the self-heal planner.
///
/// With only an event, prints the diagnostic prompt that would be sent to
/// the model. With a captured model response, prints the parsed plan and
/// the decided action as JSON.
fn run_plan(
    event_path: &std::path::Path,
    model_output: Option<&std::path::Path>,
    service_events: Option<&std::path::Path>,
    desired_count: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let event = selfheal::load_event(event_path)?;
    let target = ServiceRef::from_event(&event);

    match model_output {
        None => {
            let history = match service_events {
                Some(path) => selfheal::load_service_events(path)?,
                None => Vec::new(),
            };
            println!("{}", selfheal::render_prompt(&event, &history));
        }
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let plan = RemediationPlan::parse(&text);
            let decision = selfheal::decide(&plan, target.as_ref(), desired_count);
            let report = serde_json::json!({
                "target": target,
                "plan": plan,
                "action": decision,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
