//! User command
//!
//! Register users and show their voting activity.

use anyhow::Result;
use clap::Subcommand;

use super::{print_json, AppContext};
use pollbox_core::types::UserId;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a named user
    Create {
        /// Username
        username: String,
    },

    /// List all users
    List,

    /// Show a user by ID or username
    Show {
        /// User ID or username
        user: String,
    },

    /// Show a user's voting summary
    Stats {
        /// User ID
        id: UserId,
    },
}

/// Execute the user command
pub fn execute(ctx: &AppContext, cmd: UserCommand) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;

    match cmd {
        UserCommand::Create { username } => {
            let user = service.create_user(&username)?;
            if ctx.json {
                return print_json(&user);
            }
            println!("{} Created user {} ({})", "✓".green(), user.username.cyan(), user.id);
        }
        UserCommand::List => {
            let users = service.list_users()?;
            if ctx.json {
                return print_json(&users);
            }
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            for user in &users {
                println!("  {} {}", user.id.to_string().green(), user.username);
            }
        }
        UserCommand::Show { user } => {
            let found = match UserId::from_string(&user) {
                Ok(id) => service.get_user(&id)?,
                Err(_) => service.get_user_by_username(&user)?,
            };
            if ctx.json {
                return print_json(&found);
            }
            println!("  ID: {}", found.id.to_string().green());
            println!("  Username: {}", found.username);
            println!(
                "  Created: {}",
                found.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        UserCommand::Stats { id } => {
            let stats = service.user_stats(&id)?;
            if ctx.json {
                return print_json(&stats);
            }
            println!("{}", stats.user.username.bold().underline());
            println!();
            println!("  Polls: {}", stats.participated_polls.to_string().yellow());
            println!("  Votes: {}", stats.total_votes.to_string().yellow());
            if !stats.recent_votes.is_empty() {
                println!();
                println!("{}", "Recent votes".bold());
                for vote in &stats.recent_votes {
                    println!(
                        "  {} {} -> {}",
                        vote.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                        vote.poll_title,
                        vote.option_text.cyan()
                    );
                }
            }
        }
    }

    Ok(())
}
