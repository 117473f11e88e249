//! Poll module
//!
//! Poll and option models plus the rules that guard the option set.

pub mod model;
pub mod validator;

pub use model::*;
pub use validator::PollValidator;
