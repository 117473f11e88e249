//! Vote command
//!
//! Cast ballots and inspect a user's votes.

use anyhow::Result;
use clap::Subcommand;

use super::{print_json, AppContext};
use pollbox_core::types::{OptionId, PollId, UserId};

/// Vote subcommands
#[derive(Debug, Subcommand)]
pub enum VoteCommand {
    /// Cast a ballot; without --user an anonymous user is created
    Cast {
        /// Poll ID
        poll: PollId,

        /// Selected option IDs
        #[arg(required = true)]
        options: Vec<OptionId>,

        /// Voting user ID
        #[arg(long, short)]
        user: Option<UserId>,
    },

    /// Show a user's current votes on a poll
    Mine {
        /// Poll ID
        poll: PollId,

        /// User ID
        #[arg(long, short)]
        user: UserId,
    },
}

/// Execute the vote command
pub fn execute(ctx: &AppContext, cmd: VoteCommand) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;

    match cmd {
        VoteCommand::Cast {
            poll,
            options,
            user,
        } => {
            let receipt = service.cast_vote(&poll, user, &options)?;
            if ctx.json {
                return print_json(&receipt);
            }

            if let Some(created) = &receipt.created_user {
                println!(
                    "{} Voting as new anonymous user {} ({})",
                    "ℹ".blue(),
                    created.username.cyan(),
                    created.id
                );
            }
            let verb = if receipt.retracted > 0 { "Changed" } else { "Recorded" };
            println!(
                "{} {} {} vote(s) for user {}",
                "✓".green(),
                verb,
                receipt.votes.len(),
                receipt.user_id
            );
        }
        VoteCommand::Mine { poll, user } => {
            let mine = service.user_votes(&poll, &user)?;
            if ctx.json {
                return print_json(&mine);
            }

            if mine.votes.is_empty() {
                println!("No votes on this poll.");
                return Ok(());
            }
            for (vote, option) in mine.votes.iter().zip(&mine.options) {
                println!(
                    "  {} {} ({})",
                    option.text,
                    option.id.to_string().dimmed(),
                    vote.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}
