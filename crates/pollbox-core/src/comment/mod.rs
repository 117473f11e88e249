//! Comment system module
//!
//! Handles comment models, validation, and reply tree reconstruction.

pub mod model;
pub mod tree;
pub mod validator;

pub use model::*;
pub use tree::build_tree;
pub use validator::CommentValidator;
