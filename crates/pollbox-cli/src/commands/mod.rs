//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod init;
pub mod option;
pub mod poll;
pub mod user;
pub mod vote;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use pollbox_core::config::Config;
use pollbox_core::PollService;
use pollbox_storage::FileSystemStorage;

/// Default configuration location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".pollbox/config.toml";

/// pollbox - polls, votes and threaded comments from the terminal
#[derive(Debug, Parser)]
#[command(name = "pollbox")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "POLLBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory (overrides storage.data_dir)
    #[arg(long, global = true, env = "POLLBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize pollbox in current directory
    Init(init::InitArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// Create, inspect and close polls
    #[command(subcommand)]
    Poll(poll::PollCommand),

    /// Manage the options of a poll
    #[command(subcommand, name = "option")]
    PollOption(option::OptionCommand),

    /// Cast and inspect votes
    #[command(subcommand)]
    Vote(vote::VoteCommand),

    /// Threaded comments on a poll
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommand),

    /// Show polls with the most recent votes
    Trending,
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config_path: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
}

impl AppContext {
    /// Load the configuration file, or defaults when it is missing
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_path)
            .with_context(|| format!("Failed to load {}", self.config_path.display()))
    }

    /// Open the data directory and build the service
    pub fn service(&self) -> Result<PollService> {
        let config = self.load_config()?;
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| config.storage.data_dir.clone());

        let storage = FileSystemStorage::new(&data_dir)
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
        Ok(PollService::new(storage, config))
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = AppContext {
        config_path: cli
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        data_dir: cli.data_dir,
        json: cli.json,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(&ctx, args),
        Commands::Config(cmd) => config::execute(&ctx, cmd),
        Commands::Poll(cmd) => poll::execute(&ctx, cmd),
        Commands::PollOption(cmd) => option::execute(&ctx, cmd),
        Commands::Vote(cmd) => vote::execute(&ctx, cmd),
        Commands::Comment(cmd) => comment::execute(&ctx, cmd),
        Commands::User(cmd) => user::execute(&ctx, cmd),
        Commands::Trending => poll::trending(&ctx),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Ask before a destructive action unless `yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    use dialoguer::Confirm;
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
