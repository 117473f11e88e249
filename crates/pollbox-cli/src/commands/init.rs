//! Init command
//!
//! Write a default configuration and create the data directory.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use tracing::debug;

use super::AppContext;
use pollbox_core::config::Config;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(ctx: &AppContext, args: InitArgs) -> Result<()> {
    use colored::Colorize;

    if ctx.config_path.exists() && !args.force {
        eprintln!(
            "{} pollbox already initialized. Use --force to reinitialize.",
            "⚠".yellow()
        );
        return Ok(());
    }

    if let Some(parent) = ctx.config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let config = Config::default();
    let content = format!("# pollbox configuration\n\n{}", config.to_toml()?);
    fs::write(&ctx.config_path, content).context("Failed to write config.toml")?;
    debug!("Wrote default configuration to {:?}", ctx.config_path);
    println!(
        "{} Generated {}",
        "✓".green(),
        ctx.config_path.display()
    );

    let data_dir = ctx
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir.clone());
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    println!("{} Data directory {}", "✓".green(), data_dir.display());

    println!("\n{}", "Next steps:".bold());
    println!("  1. Review and customize {}", ctx.config_path.display());
    println!("  2. Create your first poll:");
    println!("     ");
    println!(
        "     {}",
        "pollbox poll create \"Lunch?\" --type single -o Pizza -o Sushi".cyan()
    );

    Ok(())
}
