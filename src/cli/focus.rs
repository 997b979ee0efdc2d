//! Free-text command, resume, interrupt, and status subcommands

use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;

use crate::config::Config;

#[derive(Args)]
pub struct DoArgs {
    /// Free-text command, classified like chat input
    #[arg(required = true, trailing_var_arg = true)]
    pub text: Vec<String>,
}

pub fn run_do(app_dir: &Path, config: &Config, args: DoArgs) -> Result<()> {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        bail!("Nothing to do: empty command");
    }

    let mut coordinator = super::open_coordinator(app_dir, config);
    println!("{}", coordinator.process_command(&text)?);
    Ok(())
}

pub fn run_resume(app_dir: &Path, config: &Config) -> Result<()> {
    let mut coordinator = super::open_coordinator(app_dir, config);
    let count = coordinator.resume_all()?;
    if count == 0 {
        println!("Nothing to resume");
    } else {
        println!("Resumed {} interrupted task(s)", count);
    }
    Ok(())
}

pub fn run_interrupt(app_dir: &Path, config: &Config) -> Result<()> {
    let mut coordinator = super::open_coordinator(app_dir, config);
    let Some(description) = coordinator.current_task().map(|r| r.description.clone()) else {
        println!("No active task");
        return Ok(());
    };

    coordinator.interrupt()?;
    println!("Interrupted: {}", description);
    Ok(())
}

pub fn run_status(app_dir: &Path, config: &Config) -> Result<()> {
    let coordinator = super::open_coordinator(app_dir, config);
    println!("{}", coordinator.status_report());
    Ok(())
}
