#[macro_use]
pub mod utils;

mod sentinel;

pub mod tcp;
