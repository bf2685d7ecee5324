use crate::{
  error::{RedisError, RedisErrorKind},
  utils,
};
use bytes_utils::Str;
use std::{collections::HashMap, fmt, str::FromStr};

/// The address of a sentinel node.
///
/// Two servers are equal when their host and port are equal.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Server {
  /// The hostname or IP address for the server.
  pub host: Str,
  /// The port for the server.
  pub port: u16,
}

impl Server {
  /// Create a new `Server` from parts.
  pub fn new<S: Into<Str>>(host: S, port: u16) -> Self {
    Server {
      host: host.into(),
      port,
    }
  }
}

impl fmt::Display for Server {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", &*self.host, self.port)
  }
}

impl FromStr for Server {
  type Err = RedisError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    utils::parse_host_port(s)
  }
}

impl<S: Into<Str>> From<(S, u16)> for Server {
  fn from((host, port): (S, u16)) -> Self {
    Server::new(host, port)
  }
}

/// Any node that can be identified by a logical name, such as the service name of a master.
///
/// A `None` name is treated the same as a missing node.
pub trait NamedNode {
  /// Read the logical name of the node.
  fn name(&self) -> Option<&str>;
}

impl NamedNode for str {
  fn name(&self) -> Option<&str> {
    Some(self)
  }
}

impl NamedNode for String {
  fn name(&self) -> Option<&str> {
    Some(self.as_str())
  }
}

impl<T: NamedNode> NamedNode for Option<T> {
  fn name(&self) -> Option<&str> {
    self.as_ref().and_then(|node| node.name())
  }
}

impl<T: NamedNode + ?Sized> NamedNode for &T {
  fn name(&self) -> Option<&str> {
    (**self).name()
  }
}

/// The logical identity of a master, shared by all sentinels watching it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MasterNode {
  pub name: String,
}

impl MasterNode {
  pub fn new<S: Into<String>>(name: S) -> Self {
    MasterNode { name: name.into() }
  }
}

impl NamedNode for MasterNode {
  fn name(&self) -> Option<&str> {
    Some(&self.name)
  }
}

impl From<&str> for MasterNode {
  fn from(name: &str) -> Self {
    MasterNode::new(name)
  }
}

impl From<String> for MasterNode {
  fn from(name: String) -> Self {
    MasterNode::new(name)
  }
}

/// The state of a sentinel connection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConnectionState {
  /// The connection was created but the transport is not yet connected.
  Unopened,
  /// The transport is connected and commands can be sent.
  Open,
  /// The connection was closed. There is no transition out of this state.
  Closed,
}

impl ConnectionState {
  pub(crate) fn to_str(self) -> &'static str {
    match self {
      ConnectionState::Unopened => "Unopened",
      ConnectionState::Open => "Open",
      ConnectionState::Closed => "Closed",
    }
  }
}

impl fmt::Display for ConnectionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_str())
  }
}

/// A master or replica as reported by a sentinel node.
///
/// The typed fields are read from the well known keys in the `SENTINEL MASTERS` and `SENTINEL REPLICAS` replies.
/// Every key in the reply is also kept in `properties`.
///
/// <https://redis.io/docs/management/sentinel/#sentinel-commands>
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct RedisServer {
  /// The logical name of the node. For replicas this is usually `<ip>:<port>`.
  pub name:                Option<String>,
  /// The IP address or hostname of the node.
  pub host:                String,
  /// The port of the node.
  pub port:                u16,
  /// The run ID of the node.
  pub run_id:              Option<String>,
  /// The role reported by the node, usually `master` or `slave`.
  pub role:                Option<String>,
  /// The flags reported by the sentinel, such as `master`, `s_down`, or `o_down`.
  pub flags:               Vec<String>,
  /// The number of replicas known to the sentinel.
  pub num_replicas:        Option<u64>,
  /// The number of other sentinels watching the same master.
  pub num_other_sentinels: Option<u64>,
  /// The number of sentinels that need to agree a master is unreachable.
  pub quorum:              Option<u64>,
  /// Every key/value pair from the reply.
  pub properties:          HashMap<String, String>,
}

impl RedisServer {
  /// Create a new server description from a host and port. This is typically used with
  /// [monitor](crate::interfaces::SentinelInterface::monitor).
  pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
    RedisServer {
      host: host.into(),
      port,
      ..Default::default()
    }
  }

  /// Set the logical name, returning the modified server.
  pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Set the quorum, returning the modified server.
  pub fn with_quorum(mut self, quorum: u64) -> Self {
    self.quorum = Some(quorum);
    self
  }

  /// Whether the sentinel reports this node as a master.
  pub fn is_master(&self) -> bool {
    self.flags.iter().any(|f| f == "master")
  }

  /// Whether the sentinel reports this node as subjectively or objectively down.
  pub fn is_down(&self) -> bool {
    self.flags.iter().any(|f| f == "s_down" || f == "o_down")
  }

  /// Read a property from the reply by its key.
  pub fn property(&self, key: &str) -> Option<&str> {
    self.properties.get(key).map(|s| s.as_str())
  }
}

impl NamedNode for RedisServer {
  fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

fn parse_count(properties: &HashMap<String, String>, key: &str) -> Result<Option<u64>, RedisError> {
  match properties.get(key) {
    Some(value) => value
      .parse::<u64>()
      .map(Some)
      .map_err(|_| RedisError::new_parse(format!("Invalid {} value: {}", key, value))),
    None => Ok(None),
  }
}

impl TryFrom<HashMap<String, String>> for RedisServer {
  type Error = RedisError;

  fn try_from(properties: HashMap<String, String>) -> Result<Self, Self::Error> {
    let host = match properties.get("ip") {
      Some(ip) => ip.clone(),
      None => {
        return Err(RedisError::new(
          RedisErrorKind::Parse,
          "Failed to read server IP address.",
        ))
      },
    };
    let port = match properties.get("port") {
      Some(port) => port.parse::<u16>()?,
      None => return Err(RedisError::new(RedisErrorKind::Parse, "Failed to read server port.")),
    };
    let flags = properties
      .get("flags")
      .map(|flags| {
        flags
          .split(',')
          .filter(|s| !s.is_empty())
          .map(|s| s.to_owned())
          .collect()
      })
      .unwrap_or_default();

    Ok(RedisServer {
      name: properties.get("name").cloned(),
      run_id: properties.get("runid").cloned(),
      role: properties.get("role-reported").cloned(),
      num_replicas: parse_count(&properties, "num-slaves")?,
      num_other_sentinels: parse_count(&properties, "num-other-sentinels")?,
      quorum: parse_count(&properties, "quorum")?,
      host,
      port,
      flags,
      properties,
    })
  }
}
