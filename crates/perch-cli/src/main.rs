use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "perch")]
#[command(about = "Perch - inspect and edit saved overlay preferences", long_about = None)]
struct Cli {
    /// Use this config file instead of ~/.config/perch/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every saved preference record
    List {
        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },
    /// Show which saved record a model identity resolves to
    Resolve {
        /// Model path or identity as the renderer would request it
        identity: String,
    },
    /// Save (or replace) the record for a model
    Save(commands::save::SaveArgs),
    /// Print the config file location
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    match cli.command {
        Commands::List { json } => commands::list::run(cli.config, json).await?,
        Commands::Resolve { identity } => commands::resolve::run(cli.config, &identity).await?,
        Commands::Save(args) => commands::save::run(cli.config, args).await?,
        Commands::ConfigPath => commands::config_path::run(cli.config)?,
    }

    Ok(())
}
