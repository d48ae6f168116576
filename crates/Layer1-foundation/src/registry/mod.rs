//! Registry - static lookups loaded at startup
//!
//! - `command.rs` - command whitelist (name → executable)

pub mod command;

pub use command::CommandWhitelist;
