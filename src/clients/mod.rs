mod sentinel;
mod tcp;

pub use crate::protocol::connection::TcpTransport;
pub use sentinel::SentinelConnection;
pub use tcp::TcpBinding;
