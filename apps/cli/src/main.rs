//! `nebula` — run or validate a flow document against the engine.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nebula_engine::{ExecutionMode, Executor, HostServiceRegistry};
use nebula_log::{Config, LoggerBuilder, TracingObserver};

/// Run or validate Nebula workflow flow documents.
#[derive(Debug, Parser)]
#[command(name = "nebula", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load, validate, and run a flow document to completion.
    Run {
        /// Path to the flow JSON document.
        flow: PathBuf,
        /// Abort the run after this many component steps instead of the
        /// engine's default last-resort guard.
        #[arg(long)]
        iteration_cap: Option<usize>,
    },
    /// Load and validate a flow document without running it.
    Validate {
        /// Path to the flow JSON document.
        flow: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = Config::from_env();
    let _guard = LoggerBuilder::from_config(log_config).build().ok();

    match cli.command {
        Command::Run { flow, iteration_cap } => run(&flow, iteration_cap).await,
        Command::Validate { flow } => validate(&flow),
    }
}

fn read_flow_text(path: &PathBuf) -> anyhow::Result<String> {
    fs::read_to_string(path).map_err(|err| anyhow::anyhow!("reading {}: {err}", path.display()))
}

fn validate(path: &PathBuf) -> anyhow::Result<()> {
    let text = read_flow_text(path)?;
    match nebula_workflow::load(&text) {
        Ok(loaded) => {
            println!("valid: {} component(s), {} connection(s)", loaded.flow.components.len(), loaded.flow.connections.len());
            for warning in &loaded.warnings {
                println!("warning: {warning}");
            }
            Ok(())
        }
        Err(errors) => {
            for error in &errors.0 {
                eprintln!("error: {error}");
            }
            Err(anyhow::anyhow!("flow failed validation ({} error(s))", errors.0.len()))
        }
    }
}

async fn run(path: &PathBuf, iteration_cap: Option<usize>) -> anyhow::Result<()> {
    let text = read_flow_text(path)?;
    let loaded = nebula_workflow::load(&text).map_err(|errors| {
        for error in &errors.0 {
            eprintln!("error: {error}");
        }
        anyhow::anyhow!("flow failed validation ({} error(s))", errors.0.len())
    })?;

    let mut executor = Executor::new(HostServiceRegistry::new()).with_observer(std::sync::Arc::new(TracingObserver::new()));
    if let Some(cap) = iteration_cap {
        executor = executor.with_iteration_cap(cap);
    }

    let result = executor
        .execute(&loaded.flow, None, ExecutionMode::RunToCompletion)
        .await?;

    if result.is_success() {
        let output = serde_json::to_string_pretty(&result.context.variables)?;
        println!("{output}");
        Ok(())
    } else {
        let reason = result.error.unwrap_or_else(|| "execution did not complete".to_string());
        Err(anyhow::anyhow!("execution failed: {reason}"))
    }
}
