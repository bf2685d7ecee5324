#![cfg_attr(docsrs, deny(rustdoc::broken_intra_doc_links))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

//! Fred Sentinel
//! =============
//!
//! Sentinel discovery and failover coordination for [Redis](https://redis.io/) clients, based on Tokio and Futures.
//!
//! A [SentinelRouter](router::SentinelRouter) holds the sentinel nodes watching a named master. Each call to
//! [sentinel_commands](router::SentinelRouter::sentinel_commands) probes the nodes in order, connects to the first
//! active one, and returns a [SentinelConnection](clients::SentinelConnection) owned by the caller.
//!
//! ## Examples
//!
//! ```rust edition2021 no_run
//! use fred_sentinel::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RedisError> {
//!   let config = SentinelConfig::from_url(
//!     "redis-sentinel://sentinel-1:26379?sentinelServiceName=mymaster&node=sentinel-2:26379",
//!   )?;
//!   let router = SentinelRouter::with_config(config.clone(), TcpBinding::default());
//!
//!   // probe the sentinel nodes in order and connect to the first active one
//!   let mut sentinel = router.sentinel_commands().await?;
//!   for master in sentinel.masters().await? {
//!     println!("{:?} at {}:{}", master.name, master.host, master.port);
//!   }
//!
//!   sentinel.failover(&config.master()).await?;
//!   sentinel.close().await?;
//!   Ok(())
//! }
//! ```
pub extern crate bytes;
pub extern crate bytes_utils;

#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate log;

#[macro_use]
mod macros;

mod commands;
mod modules;
mod protocol;
mod utils;

/// Sentinel connections and client bindings.
pub mod clients;
/// Error structs returned by sentinel operations.
pub mod error;
/// Traits that implement the sentinel interface and the seams between the router and a client binding.
pub mod interfaces;
/// Discovery of an active sentinel node.
pub mod router;
/// The structs and enums used by the sentinel interface.
pub mod types;

/// An interface for mocking sentinel nodes.
#[cfg(feature = "mocks")]
#[cfg_attr(docsrs, doc(cfg(feature = "mocks")))]
pub use crate::modules::mocks;

/// Utility functions used by the crate that may also be useful to callers.
pub mod util {
  pub use crate::utils::{static_bytes, DEFAULT_SENTINEL_PORT};
}

/// Convenience module to import the router, the TCP binding, all interfaces, error types, and common argument or
/// return value types.
pub mod prelude {
  pub use crate::{
    clients::{SentinelConnection, TcpBinding},
    error::{RedisError, RedisErrorKind},
    interfaces::*,
    router::SentinelRouter,
    types::{ConnectionConfig, ConnectionState, MasterNode, NamedNode, RedisServer, SentinelConfig, Server},
  };
}
