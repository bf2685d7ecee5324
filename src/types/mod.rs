mod config;
mod server;

pub use config::*;
pub use server::*;

pub use crate::protocol::command::{SentinelCommand, SentinelCommandKind};
