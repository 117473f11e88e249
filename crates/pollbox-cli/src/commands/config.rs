//! Config command
//!
//! Inspect and reset pollbox configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;

use super::{confirm, print_json, AppContext};
use pollbox_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Validate the configuration file
    Validate,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(ctx: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Validate => validate_config(ctx),
        ConfigCommand::Reset { force } => reset_config(ctx, force),
        ConfigCommand::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let config = ctx.load_config()?;

    if ctx.json {
        return print_json(&config);
    }

    println!("{}", "Configuration:".bold().underline());
    if ctx.config_path.exists() {
        println!("{}", ctx.config_path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

fn validate_config(ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    if !ctx.config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            ctx.config_path.display()
        );
        return Ok(());
    }

    Config::load(&ctx.config_path).context("Invalid configuration")?;
    println!("{} Configuration is valid", "✓".green());

    Ok(())
}

fn reset_config(ctx: &AppContext, force: bool) -> Result<()> {
    use colored::Colorize;

    if !confirm("Reset configuration to defaults?", force)? {
        println!("Reset cancelled.");
        return Ok(());
    }

    // Backup existing
    if ctx.config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            ctx.config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(&ctx.config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = ctx.config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = format!("# pollbox configuration\n\n{}", Config::default().to_toml()?);
    fs::write(&ctx.config_path, content)?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}
