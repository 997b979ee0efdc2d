//! Sidetrack - single-focus task tracker

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use sidetrack::cli::{self, Cli, Commands};
use sidetrack::config::Config;

fn main() -> Result<()> {
    if std::env::var("SIDETRACK_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("sidetrack=debug")
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        // Works in read-only environments; touches no app data
        Commands::Completion { shell } => {
            generate(shell, &mut Cli::command(), "sdt", &mut std::io::stdout());
            Ok(())
        }
        command => {
            let app_dir = cli::resolve_app_dir(cli.dir)?;
            let config = Config::load_from(&app_dir)?;
            cli::dispatch(&app_dir, &config, command)
        }
    }
}
