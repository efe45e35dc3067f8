//! Train delay checker entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use train_delays::api::{create_router, AppState};
use train_delays::config::Config;
use train_delays::metrics;
use train_delays::trains::{TrainChecker, TrainTarget, ViaggiaTrenoClient};
use train_delays::utils::shutdown_signal;

/// Set by the Lambda execution environment.
const LAMBDA_RUNTIME_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

/// Serverless train delay checker.
#[derive(Parser, Debug)]
#[command(name = "train-delays")]
#[command(about = "Reports the current delay of scheduled ViaggiaTreno trains as JSON")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the report over HTTP locally.
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run as an AWS Lambda function behind an HTTP trigger.
    Lambda,

    /// Check every train once and print the report.
    Check,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::load()?;

    let command = args.command.unwrap_or_else(|| {
        if std::env::var_os(LAMBDA_RUNTIME_ENV).is_some() {
            Command::Lambda
        } else {
            Command::Serve { port: None }
        }
    });

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("train_delays=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let json = config.log_json || matches!(command, Command::Lambda);
    init_logging(filter, json);

    match command {
        Command::Serve { port } => cmd_serve(config, port).await,
        Command::Lambda => cmd_lambda(config).await,
        Command::Check => cmd_check(config).await,
        Command::CheckConfig => cmd_check_config(config),
    }
}

fn init_logging(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Validate the configuration and build the checker.
fn build_checker(config: &Config) -> anyhow::Result<TrainChecker<ViaggiaTrenoClient>> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let queries = config.train_queries()?;
    let client = ViaggiaTrenoClient::new(config)?;

    info!(trains = queries.len(), base_url = %client.base_url(), "Checker ready");
    Ok(TrainChecker::new(client, queries))
}

/// Serve the report locally.
async fn cmd_serve(config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    let checker = build_checker(&config)?;
    let mut app_state = AppState::new(checker);

    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Failed to install metrics recorder: {}", e),
        }
    }

    let port = port_override.unwrap_or(config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Run inside the Lambda runtime.
async fn cmd_lambda(config: Config) -> anyhow::Result<()> {
    let checker = build_checker(&config)?;

    info!("Starting Lambda runtime");
    train_delays::lambda::run(checker)
        .await
        .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))
}

/// Check every train once and print the JSON report to stdout.
async fn cmd_check(config: Config) -> anyhow::Result<()> {
    let checker = build_checker(&config)?;

    let report = checker.run().await;
    println!("{}", report.to_json()?);

    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TRAIN DELAYS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    let queries = config.train_queries()?;

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Base URL: {}", config.viaggiatreno_base_url);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Connect Timeout: {}ms", config.http_connect_timeout_ms);
    println!("  Port: {}", config.port);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("  Trains ({}):", queries.len());
    for query in &queries {
        let kind = match query.target {
            TrainTarget::Url(_) => "direct",
            TrainTarget::Number(_) => "lookup",
        };
        println!("    {} -> {} ({})", query.label, query.target, kind);
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
