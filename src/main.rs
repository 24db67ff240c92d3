use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_controller::config::load_config;
use proxy_controller::model::Equivalence;
use proxy_controller::reload::{load_snapshot, CommandReloader, ReloadGate, SnapshotWatcher};

#[derive(Parser)]
#[command(name = "proxy-controller")]
#[command(about = "Reload gate for a generated reverse-proxy configuration", long_about = None)]
struct Cli {
    /// Path of the controller settings file.
    #[arg(short, long, default_value = "/etc/proxy-controller/controller.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the snapshot document and gate proxy reloads (default)
    Watch,
    /// Compare two snapshot documents and exit (0 equivalent, 1 different)
    Check { old: PathBuf, new: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy_controller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Check { old, new } => check(&old, &new),
        Commands::Watch => watch(&cli.config).await,
    }
}

/// One-shot equivalence check between two rendered snapshots.
fn check(old: &Path, new: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let old_snapshot = load_snapshot(old)?;
    let new_snapshot = load_snapshot(new)?;

    if old_snapshot.equivalent(&new_snapshot) {
        println!("equivalent: a reload would be suppressed");
        Ok(())
    } else {
        println!("different: a reload would be triggered");
        std::process::exit(1);
    }
}

/// Long-running mode: gate every snapshot change behind the comparator.
async fn watch(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("proxy-controller v0.1.0 starting");

    let config = load_config(config_path)?;
    tracing::info!(
        snapshot_path = %config.snapshot.path,
        reload_command = %config.reload.command,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            proxy_controller::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let gate = ReloadGate::new(CommandReloader::from_config(&config.reload));

    let snapshot_path = PathBuf::from(&config.snapshot.path);

    // Apply whatever the builder has already rendered before watching.
    match load_snapshot(&snapshot_path) {
        Ok(snapshot) => {
            if let Err(e) = gate.commit(Arc::new(snapshot)).await {
                tracing::error!(error = %e, "Initial reload failed");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "No usable snapshot yet, waiting for the builder");
        }
    }

    let (watcher, mut updates) = SnapshotWatcher::new(&snapshot_path);
    let _watcher_handle = watcher.run()?;

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Some(snapshot) => {
                        if let Err(e) = gate.commit(Arc::new(snapshot)).await {
                            tracing::error!(error = %e, "Reload failed, configuration not applied");
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
