//! pollbox - polls, votes and threaded comments from the terminal
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize in the current directory
//! pollbox init
//!
//! # Create a poll and vote on it
//! pollbox poll create "Lunch?" --type single -o Pizza -o Sushi
//! pollbox vote cast <POLL_ID> <OPTION_ID>
//!
//! # See how it went
//! pollbox poll results <POLL_ID>
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
