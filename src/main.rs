//! azureappscan - Azure AD application ID enumeration.
//!
//! Checks which application (client) IDs are registered in a tenant by
//! requesting a client credentials token with a wrong secret and reading the
//! AADSTS error code the token endpoint returns.

#![deny(clippy::all)]

mod cli;
mod config;
mod error;
mod input;
mod report;
mod scan;

use std::io;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Args;
use config::Config;
use error::AppError;
use scan::{aggregate, DispatchSettings, Dispatcher, Probe, TokenEndpointProbe};

fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Parse command line
    let args = Args::parse();

    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            eprintln!("\nCheck the following environment variables:");
            eprintln!("  AZAPPSCAN_TOKEN_ENDPOINT=<url containing {{tenant}}>");
            eprintln!("  AZAPPSCAN_SCOPE=<scope>");
            eprintln!("  AZAPPSCAN_TIMEOUT_SECONDS=<seconds>");
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.logging.level, args.verbose);

    info!("Starting azureappscan v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Tokio runtime
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    // Run the scan (blocks until every submitted request has finished)
    let code = runtime.block_on(run(args, config));
    std::process::exit(code);
}

/// Initialize tracing/logging. Logs go to stderr; stdout carries the report.
fn init_logging(level: &str, verbose: bool) {
    let directive = if verbose && std::env::var_os("RUST_LOG").is_none() {
        format!("{},{}=debug", level, env!("CARGO_CRATE_NAME"))
    } else {
        level.to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Build the HTTP client, wire up Ctrl-C, and run the scan. Returns the process exit code.
async fn run(args: Args, config: Config) -> i32 {
    // Create token endpoint client
    let client = match TokenEndpointProbe::new(&config.probe) {
        Ok(client) => client,
        Err(e) => return exit_code(AppError::Config(format!("{:#}", e))).unwrap_or(1),
    };

    // Stop submitting on Ctrl-C; a second Ctrl-C exits immediately
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if let Some(code) = on_interrupt(&interrupt) {
                std::process::exit(code);
            }
        }
    });

    scan_and_report(&args, &config, client, &cancel).await
}

/// Load candidates, scan the tenant, and report. Returns the process exit code.
async fn scan_and_report<P: Probe>(
    args: &Args,
    config: &Config,
    client: P,
    cancel: &CancellationToken,
) -> i32 {
    // Load candidates (fatal on unreadable or empty input)
    let candidates = match input::load_candidates(&args.file) {
        Ok(candidates) => candidates,
        Err(e) => return exit_code(e.into()).unwrap_or(1),
    };

    info!("Starting detection in tenant {}", args.tenant);
    info!("Loaded {} application IDs", candidates.len());

    // Command line overrides config defaults
    let settings = DispatchSettings {
        workers: args.workers.unwrap_or(config.scan.workers),
        delay: args.delay.unwrap_or_else(|| config.scan.delay()),
    };
    let dispatcher = Dispatcher::new(Arc::new(client), settings);

    // Check every candidate and collect results in input order
    let outcomes = dispatcher.dispatch(&candidates, &args.tenant, cancel).await;
    let result = aggregate(outcomes);
    let skipped = candidates.len() - result.total_checked;

    // Print summary
    if let Err(e) = report::write_summary(&mut io::stdout().lock(), &result, skipped) {
        warn!("Failed to print summary: {}", e);
    }

    // Save results (a failure here is only a warning)
    if let Some(path) = &args.output {
        match report::save_results(path, &result) {
            Ok(()) => info!("Results saved to {}", path.display()),
            Err(e) => {
                if let Some(code) = exit_code(e.into()) {
                    return code;
                }
            }
        }
    }

    0
}

/// Handle one Ctrl-C. The first cancels the scan; a repeat returns exit code 130.
fn on_interrupt(cancel: &CancellationToken) -> Option<i32> {
    if cancel.is_cancelled() {
        warn!("Interrupted again, exiting without waiting for in-flight requests");
        return Some(130);
    }

    warn!("Interrupted, waiting for in-flight requests to finish (Ctrl-C again to exit)");
    cancel.cancel();
    None
}

/// Report an error; returns the exit code when it must end the run.
fn exit_code(err: AppError) -> Option<i32> {
    if err.is_fatal() {
        error!("{}", err);
        eprintln!("Error: {}", err.user_message());
        Some(1)
    } else {
        warn!("{} {}", err.user_message(), err);
        None
    }
}
