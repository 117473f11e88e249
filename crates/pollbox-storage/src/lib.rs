//! pollbox-storage - Storage library for pollbox
//!
//! This crate provides the file-backed storage for polls, votes and comments.

mod dataset_store;

pub use dataset_store::FileSystemStorage;
