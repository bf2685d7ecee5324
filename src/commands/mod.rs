pub mod sentinel;
