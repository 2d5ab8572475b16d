//! cartopub CLI - publish map, marker and timeline data from a notes vault
//!
//! Usage: cartopub [OPTIONS] <COMMAND>
//!
//! Commands:
//!   install-runtime  Install or refresh the loader block
//!   generate         Generate data artifacts
//!   manifest         Write the assets manifest
//!   all              Run the three in sequence

mod cli;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cartopub::application::{
    GenerateUseCase, InstallRuntimeUseCase, ManifestUseCase, PassReport, PublishPipeline,
};
use cartopub::config::{Config, ScanMode};
use cartopub::infrastructure::{LocalVault, PassLock};

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("CARTOPUB_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vault_root = cli
        .vault
        .canonicalize()
        .with_context(|| format!("vault not found: {}", cli.vault.display()))?;

    let (mut config, warnings) = Config::load_for_vault(&vault_root, cli.config.as_deref())?;
    if !cli.json {
        ui::output::print_config_warnings(&warnings);
    }
    if cli.scan_all {
        config.scan.mode = ScanMode::All;
    }
    debug!(vault = %vault_root.display(), mode = ?config.scan.mode, "configuration loaded");

    let _lock = PassLock::acquire(&vault_root)?;
    let vault = LocalVault::new(&vault_root);

    let report = run(cli.command, &vault, &config)?;
    ui::output::print_report(cli.command.name(), &vault_root, &report, cli.json)?;

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Commands, vault: &LocalVault, config: &Config) -> Result<PassReport> {
    let report = match command {
        Commands::InstallRuntime => InstallRuntimeUseCase::new(vault, config).execute()?,
        Commands::Generate => GenerateUseCase::new(vault, config).execute()?,
        Commands::Manifest => ManifestUseCase::new(vault, config).execute()?,
        Commands::All => PublishPipeline::new(vault, config).run()?,
    };
    Ok(report)
}
