//! Comment command
//!
//! Post, list, edit and delete threaded comments.

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{confirm, print_json, AppContext};
use pollbox_core::comment::{CommentNode, NewComment};
use pollbox_core::types::{CommentId, PollId, UserId};

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Post a comment or a reply
    Add {
        /// Poll ID
        poll: PollId,

        /// Comment text
        content: String,

        /// Author user ID
        #[arg(long, short)]
        user: UserId,

        /// Comment to reply to
        #[arg(long)]
        reply_to: Option<CommentId>,
    },

    /// Show the comment thread of a poll
    List {
        /// Poll ID
        poll: PollId,
    },

    /// Edit a comment
    Edit {
        /// Poll ID
        poll: PollId,

        /// Comment ID
        comment: CommentId,

        /// New text
        content: String,

        /// Author user ID
        #[arg(long, short)]
        user: UserId,
    },

    /// Delete a comment and its replies
    Delete {
        /// Poll ID
        poll: PollId,

        /// Comment ID
        comment: CommentId,

        /// Author user ID
        #[arg(long, short)]
        user: UserId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the comment command
pub fn execute(ctx: &AppContext, cmd: CommentCommand) -> Result<()> {
    use colored::Colorize;

    let service = ctx.service()?;

    match cmd {
        CommentCommand::Add {
            poll,
            content,
            user,
            reply_to,
        } => {
            let mut input = NewComment::new(user, content);
            input.parent_id = reply_to;
            let comment = service.add_comment(&poll, input)?;
            if ctx.json {
                return print_json(&comment);
            }
            println!("{} Comment {} posted.", "✓".green(), comment.id);
        }
        CommentCommand::List { poll } => {
            let tree = service.comment_tree(&poll)?;
            if ctx.json {
                return print_json(&tree)
                    .context("Thread is too deep for JSON output; list it without --json");
            }
            if tree.is_empty() {
                println!("No comments yet.");
                return Ok(());
            }
            print_thread(&tree);
        }
        CommentCommand::Edit {
            poll,
            comment,
            content,
            user,
        } => {
            let comment = service.update_comment(&poll, &comment, &user, &content)?;
            if ctx.json {
                return print_json(&comment);
            }
            println!("{} Comment {} updated.", "✓".green(), comment.id);
        }
        CommentCommand::Delete {
            poll,
            comment,
            user,
            yes,
        } => {
            if !confirm("Delete this comment and its replies?", yes)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            let deleted = service.delete_comment(&poll, &comment, &user)?;
            if ctx.json {
                return print_json(&deleted);
            }
            println!("{} Deleted {} comment(s).", "✓".green(), deleted.len());
        }
    }

    Ok(())
}

/// Print a reply tree with indentation, depth first
fn print_thread(roots: &[CommentNode]) {
    use colored::Colorize;

    let mut stack: Vec<(&CommentNode, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth + 1);
        let comment = &node.comment;
        println!(
            "{}{} {} {}",
            indent,
            comment.id.to_string().dimmed(),
            comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            comment.content
        );
        stack.extend(node.replies.iter().rev().map(|r| (r, depth + 1)));
    }
}
