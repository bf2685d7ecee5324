pub mod codec;
pub mod command;
pub mod connection;
pub mod utils;
