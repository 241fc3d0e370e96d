//! ikd-daemon - IKE keying daemon
//!
//! Wires the runtime core together: loads configuration, initializes
//! tracing, constructs the SA store and job processor, then waits for
//! SIGTERM/SIGINT and shuts the processor down.
//!
//! The binary runs a synchronous `main`; a Tokio runtime is constructed
//! manually and used only for signal-driven shutdown, while job execution
//! stays on the processor's own worker threads.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ikd_core::config::DaemonConfig;
use ikd_daemon::context::JobContext;
use ikd_daemon::negotiation::NullNegotiation;
use ikd_daemon::processing::Processor;
use ikd_daemon::sa_store::SaStore;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ikd daemon - IKE/IPsec key management
#[derive(Parser, Debug)]
#[command(name = "ikd-daemon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to daemon configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of job worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Override the log filter directive (e.g. "debug", "ikd_daemon=trace")
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DaemonConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };

    let filter = args.log_filter.as_deref().unwrap_or(&config.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).context("invalid log filter")?)
        .init();

    let workers = args.workers.unwrap_or(config.worker_threads);
    let sa_store = Arc::new(SaStore::new());
    // The exchange layer registers itself here once linked in; until then
    // every negotiation request fails and the requesting job is dropped.
    let ctx = Arc::new(JobContext::new(
        Arc::clone(&sa_store),
        Arc::new(NullNegotiation),
    ));
    let processor = Processor::spawn(workers, ctx).context("spawning processor")?;

    info!(workers, "ikd-daemon running");
    wait_for_shutdown_signal()?;

    info!("shutting down");
    processor.shutdown();
    Ok(())
}

/// Block until SIGTERM or SIGINT arrives.
fn wait_for_shutdown_signal() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;

    runtime.block_on(async {
        let mut sigterm = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
        let mut sigint = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
        Ok(())
    })
}
