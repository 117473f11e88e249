//! Poll command
//!
//! Create, inspect, update and delete polls.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::{confirm, print_json, AppContext};
use pollbox_core::poll::{NewPoll, PollDetails, PollType, PollUpdate};
use pollbox_core::types::PollId;

/// Poll subcommands
#[derive(Debug, Subcommand)]
pub enum PollCommand {
    /// Create a poll
    Create {
        /// Poll title
        title: String,

        /// Poll type: binary, single or multi
        #[arg(long = "type", short = 't', default_value = "single")]
        poll_type: PollType,

        /// Option label (repeatable; ignored for binary polls)
        #[arg(long = "option", short = 'o')]
        options: Vec<String>,

        /// Description
        #[arg(long, short, default_value = "")]
        description: String,

        /// When voting closes (RFC 3339)
        #[arg(long)]
        end_time: Option<DateTime<Utc>>,
    },

    /// List all polls
    List,

    /// Show a poll with its options
    Show {
        /// Poll ID
        id: PollId,
    },

    /// Update a poll
    Update {
        /// Poll ID
        id: PollId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New end time (RFC 3339)
        #[arg(long)]
        end_time: Option<DateTime<Utc>>,

        /// Stop accepting votes
        #[arg(long, conflicts_with = "reopen")]
        close: bool,

        /// Accept votes again
        #[arg(long)]
        reopen: bool,
    },

    /// Delete a poll with its options, votes and comments
    Delete {
        /// Poll ID
        id: PollId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show vote counts per option
    Results {
        /// Poll ID
        id: PollId,
    },

    /// Show detailed statistics
    Stats {
        /// Poll ID
        id: PollId,
    },
}

/// Execute the poll command
pub fn execute(ctx: &AppContext, cmd: PollCommand) -> Result<()> {
    match cmd {
        PollCommand::Create {
            title,
            poll_type,
            options,
            description,
            end_time,
        } => {
            let mut input = NewPoll::new(title, poll_type).with_description(description);
            input.options = options;
            input.end_time = end_time;
            create_poll(ctx, input)
        }
        PollCommand::List => list_polls(ctx),
        PollCommand::Show { id } => show_poll(ctx, &id),
        PollCommand::Update {
            id,
            title,
            description,
            end_time,
            close,
            reopen,
        } => {
            let is_active = match (close, reopen) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            let update = PollUpdate {
                title,
                description,
                end_time,
                is_active,
            };
            update_poll(ctx, &id, update)
        }
        PollCommand::Delete { id, yes } => delete_poll(ctx, &id, yes),
        PollCommand::Results { id } => show_results(ctx, &id),
        PollCommand::Stats { id } => show_stats(ctx, &id),
    }
}

/// Print a poll and its options
pub(crate) fn print_poll(details: &PollDetails) {
    use colored::Colorize;

    let poll = &details.poll;
    let status = if poll.has_ended(Utc::now()) {
        "ended".red()
    } else if poll.is_active {
        "active".green()
    } else {
        "inactive".yellow()
    };

    println!("{} [{}] {}", poll.title.bold(), poll.poll_type.to_string().cyan(), status);
    println!("  ID: {}", poll.id.to_string().dimmed());
    if !poll.description.is_empty() {
        println!("  {}", poll.description);
    }
    if let Some(end) = poll.end_time {
        println!("  Ends: {}", end.format("%Y-%m-%d %H:%M:%S"));
    }
    for option in &details.options {
        println!("    {} {}", option.id.to_string().dimmed(), option.text);
    }
}

fn create_poll(ctx: &AppContext, input: NewPoll) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let details = service.create_poll(input)?;

    if ctx.json {
        return print_json(&details);
    }

    println!("{} Poll created.", "✓".green());
    print_poll(&details);
    Ok(())
}

fn list_polls(ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let polls = service.list_polls()?;

    if ctx.json {
        return print_json(&polls);
    }

    if polls.is_empty() {
        println!("No polls found.");
        return Ok(());
    }

    println!("{}", "Polls:".bold().underline());
    println!();
    for details in &polls {
        let poll = &details.poll;
        println!(
            "  {} {} ({}, {} options)",
            poll.id.to_string().green(),
            poll.title,
            poll.poll_type.to_string().cyan(),
            details.options.len()
        );
    }

    Ok(())
}

fn show_poll(ctx: &AppContext, id: &PollId) -> Result<()> {
    let service = ctx.service()?;
    let details = service
        .get_poll(id)
        .context(format!("Poll '{}' not found", id))?;

    if ctx.json {
        return print_json(&details);
    }

    print_poll(&details);
    Ok(())
}

fn update_poll(ctx: &AppContext, id: &PollId, update: PollUpdate) -> Result<()> {
    use colored::Colorize;

    if update.is_empty() {
        anyhow::bail!("Nothing to update");
    }

    let service = ctx.service()?;
    let details = service.update_poll(id, update)?;

    if ctx.json {
        return print_json(&details);
    }

    println!("{} Poll updated.", "✓".green());
    print_poll(&details);
    Ok(())
}

fn delete_poll(ctx: &AppContext, id: &PollId, yes: bool) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let details = service
        .get_poll(id)
        .context(format!("Poll '{}' not found", id))?;

    if !yes {
        print_poll(&details);
    }
    if !confirm("Delete this poll with all votes and comments?", yes)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    service.delete_poll(id)?;
    println!("{} Poll '{}' deleted.", "✓".green(), id);

    Ok(())
}

fn show_results(ctx: &AppContext, id: &PollId) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let results = service.poll_results(id)?;

    if ctx.json {
        return print_json(&results);
    }

    println!("{}", results.poll.poll.title.bold().underline());
    println!();
    for option in &results.results {
        println!("  {:>5}  {}", option.count.to_string().cyan(), option.text);
    }
    println!();
    println!("  Total: {}", results.total_votes.to_string().yellow());

    Ok(())
}

fn show_stats(ctx: &AppContext, id: &PollId) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let stats = service.poll_stats(id)?;

    if ctx.json {
        return print_json(&stats);
    }

    println!("{}", stats.poll.poll.title.bold().underline());
    println!();
    println!("  Votes: {}", stats.total_votes.to_string().yellow());
    println!("  Voters: {}", stats.unique_voters.to_string().yellow());
    println!();
    println!("{}", "Options".bold());
    for option in &stats.option_stats {
        println!(
            "  {:>5} {:>6.1}%  {}",
            option.count.to_string().cyan(),
            option.percentage,
            option.text
        );
    }

    let busy: Vec<_> = stats
        .time_distribution
        .iter()
        .filter(|h| h.count > 0)
        .collect();
    if !busy.is_empty() {
        println!();
        println!("{}", "Votes by hour (UTC)".bold());
        for hour in busy {
            println!("  {:02}:00  {}", hour.hour, hour.count);
        }
    }

    Ok(())
}

/// Show polls with the most recent votes
pub fn trending(ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;
    let trending = service.trending_polls()?;

    if ctx.json {
        return print_json(&trending);
    }

    if trending.is_empty() {
        println!(
            "No votes in the last {} days.",
            service.config().stats.trending_window_days
        );
        return Ok(());
    }

    println!("{}", "Trending polls:".bold().underline());
    println!();
    for (rank, entry) in trending.iter().enumerate() {
        println!(
            "  {}. {} {} ({} votes)",
            rank + 1,
            entry.poll.poll.id.to_string().green(),
            entry.poll.poll.title,
            entry.vote_count.to_string().yellow()
        );
    }

    Ok(())
}
