use crate::{
  error::RedisError,
  types::{MasterNode, Server},
  utils,
};
use std::time::Duration;

/// The default timeout when establishing new connections.
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 10_000;
/// The default timeout for internal commands such as the liveness probe.
pub const DEFAULT_INTERNAL_COMMAND_TIMEOUT_MS: u64 = 2_000;

/// Timeouts applied by the TCP transport.
///
/// A duration of zero disables the associated timeout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectionConfig {
  /// The timeout to apply when opening a new TCP connection.
  ///
  /// Default: 10 sec
  pub connection_timeout:       Duration,
  /// The timeout for the whole liveness probe, including the connection and the `PING` round trip.
  ///
  /// Default: 2 sec
  pub internal_command_timeout: Duration,
  /// The timeout applied to each command sent on an open sentinel connection.
  ///
  /// Default: 0 (no timeout)
  pub command_timeout:          Duration,
}

impl Default for ConnectionConfig {
  fn default() -> Self {
    ConnectionConfig {
      connection_timeout:       Duration::from_millis(DEFAULT_CONNECTION_TIMEOUT_MS),
      internal_command_timeout: Duration::from_millis(DEFAULT_INTERNAL_COMMAND_TIMEOUT_MS),
      command_timeout:          Duration::from_millis(0),
    }
  }
}

/// The set of sentinel nodes watching a named master.
///
/// The order of `hosts` is the order in which nodes are probed during discovery. Reachability is not checked
/// until a caller asks for a sentinel connection.
///
/// ```rust
/// # use fred_sentinel::types::SentinelConfig;
/// let config = SentinelConfig::new("mymaster", vec![("sentinel-1", 26379)])
///   .with_sentinel("sentinel-2", 26379)
///   .with_sentinel("sentinel-3", 26379);
///
/// assert_eq!(config.hosts().len(), 3);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentinelConfig {
  /// The service name of the master, as configured on the sentinel nodes.
  pub service_name: String,
  hosts:            Vec<Server>,
}

impl Default for SentinelConfig {
  fn default() -> Self {
    SentinelConfig {
      service_name: "mymaster".into(),
      hosts:        vec![Server::new("127.0.0.1", utils::DEFAULT_SENTINEL_PORT)],
    }
  }
}

impl SentinelConfig {
  /// Create a new config from a service name and a list of `(host, port)` tuples.
  ///
  /// Duplicate hosts are dropped, keeping the first occurrence.
  pub fn new<N, H>(service_name: N, hosts: Vec<(H, u16)>) -> Self
  where
    N: Into<String>,
    H: Into<String>,
  {
    let mut config = SentinelConfig {
      service_name: service_name.into(),
      hosts:        Vec::with_capacity(hosts.len()),
    };
    for (host, port) in hosts.into_iter() {
      config.add_sentinel(Server::new(host.into(), port));
    }

    config
  }

  /// Create a new config from a service name and a comma separated list of `host:port` pairs.
  ///
  /// ```rust
  /// # use fred_sentinel::types::{SentinelConfig, Server};
  /// let config = SentinelConfig::from_nodes("mymaster", "10.0.0.1:26379, 10.0.0.2:26380").unwrap();
  /// assert_eq!(config.hosts()[1], Server::new("10.0.0.2", 26380));
  /// ```
  pub fn from_nodes<N>(service_name: N, nodes: &str) -> Result<Self, RedisError>
  where
    N: Into<String>,
  {
    let mut config = SentinelConfig {
      service_name: service_name.into(),
      hosts:        Vec::new(),
    };
    for node in nodes.split(',').filter(|s| !s.trim().is_empty()) {
      config.add_sentinel(utils::parse_host_port(node)?);
    }

    Ok(config)
  }

  /// Create a new config from a URL.
  ///
  /// The scheme must end with `-sentinel`, the service name is read from the `sentinelServiceName` query
  /// parameter, and any additional sentinel nodes are read from repeated `node=host:port` query parameters.
  ///
  /// ```rust
  /// # use fred_sentinel::types::SentinelConfig;
  /// let config = SentinelConfig::from_url(
  ///   "redis-sentinel://sentinel-1:26379?sentinelServiceName=mymaster&node=sentinel-2:26380",
  /// )
  /// .unwrap();
  ///
  /// assert_eq!(config.service_name, "mymaster");
  /// assert_eq!(config.hosts().len(), 2);
  /// ```
  pub fn from_url(url: &str) -> Result<Self, RedisError> {
    let (url, first) = utils::parse_url(url)?;
    let service_name = utils::parse_url_sentinel_service_name(&url)?;
    let mut config = SentinelConfig {
      service_name,
      hosts: vec![first],
    };
    for server in utils::parse_url_other_nodes(&url)? {
      config.add_sentinel(server);
    }

    Ok(config)
  }

  /// Add a sentinel node, returning the modified config.
  pub fn with_sentinel<H>(mut self, host: H, port: u16) -> Self
  where
    H: Into<String>,
  {
    self.add_sentinel(Server::new(host.into(), port));
    self
  }

  /// Add a sentinel node to the end of the list. Returns `false` if the node was already present.
  pub fn add_sentinel(&mut self, server: Server) -> bool {
    if self.hosts.contains(&server) {
      false
    } else {
      self.hosts.push(server);
      true
    }
  }

  /// Read the sentinel nodes in probe order.
  pub fn hosts(&self) -> &[Server] {
    &self.hosts
  }

  /// Whether the config contains no sentinel nodes.
  pub fn is_empty(&self) -> bool {
    self.hosts.is_empty()
  }

  /// Read the configured master as a `MasterNode`.
  pub fn master(&self) -> MasterNode {
    MasterNode::new(self.service_name.clone())
  }
}
