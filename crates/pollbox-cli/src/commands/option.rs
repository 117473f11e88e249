//! Option command
//!
//! Add, relabel and remove poll options.

use anyhow::Result;
use clap::Subcommand;

use super::{confirm, print_json, AppContext};
use pollbox_core::types::{OptionId, PollId};

/// Option subcommands
#[derive(Debug, Subcommand)]
pub enum OptionCommand {
    /// Add an option to a single or multi poll
    Add {
        /// Poll ID
        poll: PollId,

        /// Option label
        text: String,
    },

    /// Relabel an option
    Update {
        /// Poll ID
        poll: PollId,

        /// Option ID
        option: OptionId,

        /// New label
        text: String,
    },

    /// Delete an option and its votes
    Delete {
        /// Poll ID
        poll: PollId,

        /// Option ID
        option: OptionId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the option command
pub fn execute(ctx: &AppContext, cmd: OptionCommand) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;

    match cmd {
        OptionCommand::Add { poll, text } => {
            let option = service.add_option(&poll, &text)?;
            if ctx.json {
                return print_json(&option);
            }
            println!("{} Added option {} ({})", "✓".green(), option.text, option.id);
        }
        OptionCommand::Update { poll, option, text } => {
            let option = service.update_option(&poll, &option, &text)?;
            if ctx.json {
                return print_json(&option);
            }
            println!("{} Option {} is now '{}'", "✓".green(), option.id, option.text);
        }
        OptionCommand::Delete { poll, option, yes } => {
            if !confirm("Delete this option and every vote for it?", yes)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            let removed = service.delete_option(&poll, &option)?;
            if ctx.json {
                return print_json(&serde_json::json!({
                    "option_id": option,
                    "removed_votes": removed,
                }));
            }
            println!(
                "{} Option deleted ({} votes removed).",
                "✓".green(),
                removed
            );
        }
    }

    Ok(())
}
