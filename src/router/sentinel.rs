use crate::{
  error::{RedisError, RedisErrorKind},
  interfaces::SentinelBinding,
  types::{SentinelConfig, Server},
  utils,
};
use arc_swap::ArcSwapOption;
use std::{fmt, sync::Arc};

/// Locates an active sentinel node and opens connections to it.
///
/// The router holds an optional [SentinelConfig](crate::types::SentinelConfig) and the
/// [SentinelBinding](crate::interfaces::SentinelBinding) used to probe and connect to nodes. It never holds an open
/// connection. Each call to [sentinel_commands](Self::sentinel_commands) runs selection from the start of the host
/// list and returns a new connection owned by the caller.
///
/// ```rust no_run
/// # use fred_sentinel::prelude::*;
/// # async fn example() -> Result<(), RedisError> {
/// let config = SentinelConfig::new("mymaster", vec![("sentinel-1", 26379), ("sentinel-2", 26379)]);
/// let router = SentinelRouter::with_config(config.clone(), TcpBinding::default());
///
/// let mut sentinel = router.sentinel_commands().await?;
/// sentinel.failover(&config.master()).await?;
/// sentinel.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct SentinelRouter<B: SentinelBinding> {
  id:      Arc<String>,
  config:  ArcSwapOption<SentinelConfig>,
  binding: B,
}

impl<B: SentinelBinding> fmt::Debug for SentinelRouter<B> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SentinelRouter")
      .field("id", &self.id)
      .field("config", &self.config.load_full())
      .finish()
  }
}

impl<B: SentinelBinding> SentinelRouter<B> {
  /// Create a new router without any sentinel config.
  pub fn new(binding: B) -> Self {
    SentinelRouter {
      id: utils::new_id(),
      config: ArcSwapOption::empty(),
      binding,
    }
  }

  /// Create a new router with the provided sentinel config.
  pub fn with_config(config: SentinelConfig, binding: B) -> Self {
    SentinelRouter {
      id: utils::new_id(),
      config: ArcSwapOption::from_pointee(config),
      binding,
    }
  }

  /// An identifier for the router used in logs.
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Read the binding used to probe and connect to sentinel nodes.
  pub fn binding(&self) -> &B {
    &self.binding
  }

  /// Replace the sentinel config.
  ///
  /// A selection scan that already started keeps using the config it started with.
  pub fn set_config(&self, config: SentinelConfig) {
    _debug!(
      self,
      "Changing sentinel config to {} with {} nodes.",
      config.service_name,
      config.hosts().len()
    );
    self.config.store(Some(Arc::new(config)));
  }

  /// Remove the sentinel config.
  pub fn clear_config(&self) {
    self.config.store(None);
  }

  /// Read a snapshot of the current sentinel config.
  pub fn config(&self) -> Option<Arc<SentinelConfig>> {
    self.config.load_full()
  }

  /// Whether a sentinel config is set. This does not check whether any node is reachable.
  pub fn has_sentinel_configured(&self) -> bool {
    self.config.load().is_some()
  }

  /// Find the first active sentinel node and open a new connection to it.
  ///
  /// Returns a `Config` error without probing any node if no config is set, or a `Discovery` error if every
  /// configured node is inactive.
  pub async fn sentinel_commands(&self) -> Result<B::Connection, RedisError> {
    let config = match self.config.load_full() {
      Some(config) => config,
      None => return Err(RedisError::new(RedisErrorKind::Config, "No sentinels configured.")),
    };

    let server = self.select_active_sentinel(&config).await?;
    _debug!(self, "Connecting to active sentinel {}", server);
    self.binding.connect(&server).await
  }

  /// Probe each node in order and return the first one that is active.
  pub async fn select_active_sentinel(&self, config: &SentinelConfig) -> Result<Server, RedisError> {
    for server in config.hosts().iter() {
      if self.binding.is_active(server).await {
        return Ok(server.clone());
      } else {
        _debug!(self, "Skipping inactive sentinel {}", server);
      }
    }

    _warn!(
      self,
      "Could not find any active sentinels for {} among {} nodes.",
      config.service_name,
      config.hosts().len()
    );
    Err(RedisError::new(
      RedisErrorKind::Discovery,
      "Could not find any active sentinels.",
    ))
  }
}
