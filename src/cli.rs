use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cartopub - publish map, marker and timeline data from a notes vault
#[derive(Parser, Debug)]
#[command(name = "cartopub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    pub vault: PathBuf,

    /// Configuration file (defaults to <vault>/.cartopub.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scan every note, not only those flagged for publishing
    #[arg(long, global = true)]
    pub scan_all: bool,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Install or refresh the loader block in the runtime document
    InstallRuntime,

    /// Generate marker, library and timeline artifacts
    Generate,

    /// Write the assets manifest
    Manifest,

    /// Run install-runtime, generate and manifest in sequence
    All,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::InstallRuntime => "install-runtime",
            Commands::Generate => "generate",
            Commands::Manifest => "manifest",
            Commands::All => "all",
        }
    }
}
