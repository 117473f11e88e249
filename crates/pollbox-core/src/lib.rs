//! pollbox-core - Core library for pollbox
//!
//! This crate provides the core business logic for pollbox, including poll
//! management, vote adjudication, threaded comments, and transactional storage.

pub mod error;
pub mod types;
pub mod config;
pub mod poll;
pub mod vote;
pub mod comment;
pub mod user;
pub mod store;
pub mod service;

pub use error::{ErrorKind, PollboxError, Result};
pub use service::PollService;
pub use types::*;
