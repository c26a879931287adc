// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EstateFlow - a real-estate lead-automation agent.
//!
//! This is the binary entry point for the EstateFlow agent.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod status;
mod vault_cmd;

use clap::{Parser, Subcommand};
use estateflow_config::EstateConfig;
use tracing_subscriber::EnvFilter;

/// EstateFlow - a real-estate lead-automation agent.
#[derive(Parser, Debug)]
#[command(name = "estateflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the ingestion-to-publication pipeline.
    Serve,
    /// Manage the encrypted credential vault.
    Vault {
        #[command(subcommand)]
        action: vault_cmd::VaultAction,
    },
    /// Run a diagnostic login check with the stored credentials.
    Verify,
    /// Show configuration and component health.
    Status,
}

fn init_tracing(config: &EstateConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match estateflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            estateflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run(config).await,
        Some(Commands::Vault { action }) => vault_cmd::run(config, action).await,
        Some(Commands::Verify) => vault_cmd::verify(config).await,
        Some(Commands::Status) => status::run(config).await,
        None => {
            println!("estateflow: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("estateflow: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_is_valid() {
        let config = estateflow_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "estateflow");
    }
}
