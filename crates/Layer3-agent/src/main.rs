//! rce-agent - Main entry point

mod protocol;
mod transport;

use clap::{Parser, Subcommand};
use rce_foundation::{AgentConfig, AGENT_CONFIG_FILE};
use rce_task::{JobManager, JobRequest, NO_EXIT_CODE};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::StdioTransport;

/// rce-agent - run whitelisted commands as pollable jobs
#[derive(Parser, Debug)]
#[command(name = "rce-agent")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to the agent config (TOML)
    #[arg(short, long, global = true, default_value = AGENT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve JSON requests on stdin, one per line
    Serve,
    /// Run one whitelisted command, wait for it and print its status
    Run {
        /// Job name
        #[arg(short, long, default_value = "cli")]
        name: String,

        /// Status poll interval in milliseconds
        #[arg(long, default_value = "100")]
        poll_ms: u64,

        /// Whitelisted command name
        command_name: String,

        /// Arguments passed to the command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the whitelisted command names
    Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = AgentConfig::load(&args.config)?;

    // stdout belongs to the transport; logs go to stderr
    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config.log.level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        "Loaded {} whitelisted commands from {}",
        config.commands.len(),
        args.config.display()
    );

    match args.command {
        Command::Serve => serve(&config).await,
        Command::Run {
            name,
            poll_ms,
            command_name,
            args,
        } => {
            let request = JobRequest {
                name,
                command_name,
                args,
            };
            run_once(&config, request, Duration::from_millis(poll_ms)).await
        }
        Command::Commands => {
            for name in config.commands.names() {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn serve(config: &AgentConfig) -> anyhow::Result<ExitCode> {
    let manager = JobManager::from_config(config);
    let transport = StdioTransport::new(Arc::new(manager.clone()));

    tokio::select! {
        result = transport.serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, {} jobs still running", manager.running_count().await);
        }
    }

    // Dropping the runtime drops the runner tasks, and kill_on_drop reaps
    // any child still alive.
    Ok(ExitCode::SUCCESS)
}

async fn run_once(
    config: &AgentConfig,
    request: JobRequest,
    poll_interval: Duration,
) -> anyhow::Result<ExitCode> {
    let manager = JobManager::from_config(config);
    let started = manager.start_job(request).await;

    let status = manager.wait(started.job_id, poll_interval).await?;
    info!(
        "job={}: Finished (success: {}, duration: {:?})",
        status.job_id,
        status.is_success(),
        status.duration().unwrap_or_default()
    );
    println!("{}", serde_json::to_string_pretty(&status)?);

    if status.exit_code == NO_EXIT_CODE {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::from(u8::try_from(status.exit_code).unwrap_or(1)))
}
