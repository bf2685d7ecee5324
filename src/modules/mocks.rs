//! An interface for mocking sentinel nodes.
//!
//! There are several patterns for utilizing a mocking layer in tests. In some cases callers only need to buffer the
//! commands sent to a sentinel before performing any assertions, while others need a node that keeps track of the
//! masters it monitors.
//!
//! This interface exposes several structs for supporting the above use cases:
//! * `Buffer` - A mocking struct that buffers commands internally, returning `OK` to each command. Callers can then
//!   drain or inspect the buffer later.
//! * `MockSentinel` - A mocking struct that implements `PING` and the `SENTINEL` subcommands against an in-memory
//!   list of masters and replicas.
//! * `MockTransport` - A [Transport](crate::interfaces::Transport) that sends commands to a `Mocks` implementation.
//! * `MockBinding` - A [SentinelBinding](crate::interfaces::SentinelBinding) with a configurable set of active nodes
//!   that records every probe.
//!
//! The base `Mocks` trait is directly exposed so callers can implement their own mocking layer as well.

use crate::{
  clients::SentinelConnection,
  error::{RedisError, RedisErrorKind},
  interfaces::{RedisResult, SentinelBinding, Transport},
  protocol::command::SentinelCommand,
  types::{RedisServer, Server},
};
use bytes::Bytes;
use parking_lot::Mutex;
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::{
  collections::{HashMap, HashSet, VecDeque},
  fmt::Debug,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
};

/// A wrapper type for the parts of a sentinel command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MockCommand {
  pub cmd:        String,
  pub subcommand: Option<String>,
  pub args:       Vec<String>,
}

impl From<&SentinelCommand> for MockCommand {
  fn from(command: &SentinelCommand) -> Self {
    MockCommand {
      cmd:        command.kind.cmd_str().to_owned(),
      subcommand: command.kind.subcommand_str().map(|s| s.to_owned()),
      args:       command.args_lossy(),
    }
  }
}

/// An interface for intercepting and processing sentinel commands in a mocking layer.
pub trait Mocks: Debug + Send + Sync + 'static {
  /// Intercept and process a command, returning the reply frame.
  ///
  /// Error replies should be returned as `Ok(Resp2Frame::Error(..))`. Returning `Err` simulates a network failure.
  fn process_command(&self, command: MockCommand) -> Result<Resp2Frame, RedisError>;
}

fn ok_frame() -> Resp2Frame {
  Resp2Frame::SimpleString(Bytes::from_static(b"OK"))
}

fn error_frame(message: &'static str) -> Resp2Frame {
  Resp2Frame::Error(message.into())
}

/// A mocking layer that buffers the commands internally and returns `OK` to the caller.
#[derive(Debug, Default)]
pub struct Buffer {
  commands: Mutex<VecDeque<MockCommand>>,
}

impl Buffer {
  /// Create a new empty `Buffer`.
  pub fn new() -> Self {
    Buffer {
      commands: Mutex::new(VecDeque::new()),
    }
  }

  /// Read the length of the internal buffer.
  pub fn len(&self) -> usize {
    self.commands.lock().len()
  }

  /// Whether the internal buffer is empty.
  pub fn is_empty(&self) -> bool {
    self.commands.lock().is_empty()
  }

  /// Clear the inner buffer.
  pub fn clear(&self) {
    self.commands.lock().clear();
  }

  /// Drain and return the internal command buffer.
  pub fn take(&self) -> Vec<MockCommand> {
    self.commands.lock().drain(..).collect()
  }

  /// Read a copy of the internal command buffer without modifying the contents.
  pub fn inner(&self) -> Vec<MockCommand> {
    self.commands.lock().iter().cloned().collect()
  }

  /// Push a new command onto the back of the internal buffer.
  pub fn push_back(&self, command: MockCommand) {
    self.commands.lock().push_back(command);
  }
}

impl Mocks for Buffer {
  fn process_command(&self, command: MockCommand) -> Result<Resp2Frame, RedisError> {
    self.push_back(command);
    Ok(ok_frame())
  }
}

/// A mocking layer that behaves like a sentinel node watching an in-memory list of masters.
///
/// Masters are reported in the order they were added. Every command is also recorded in an inner
/// [Buffer](Buffer).
#[derive(Debug, Default)]
pub struct MockSentinel {
  masters:  Mutex<Vec<RedisServer>>,
  replicas: Mutex<HashMap<String, Vec<RedisServer>>>,
  commands: Buffer,
}

impl MockSentinel {
  /// Create a new sentinel that does not monitor any masters.
  pub fn new() -> Self {
    MockSentinel::default()
  }

  /// Add a monitored master, returning the modified sentinel.
  pub fn with_master(self, master: RedisServer) -> Self {
    self.add_master(master);
    self
  }

  /// Add a monitored master. The `master` flag is added if the server has no flags.
  pub fn add_master(&self, mut master: RedisServer) {
    if master.flags.is_empty() {
      master.flags.push("master".into());
    }
    self.masters.lock().push(master);
  }

  /// Add a replica to the master with the provided name. The `slave` flag is added if the server has no flags.
  pub fn add_replica(&self, master: &str, mut replica: RedisServer) {
    if replica.flags.is_empty() {
      replica.flags.push("slave".into());
    }
    if replica.name.is_none() {
      replica.name = Some(format!("{}:{}", replica.host, replica.port));
    }
    self.replicas.lock().entry(master.to_owned()).or_default().push(replica);
  }

  /// Read a copy of the monitored masters.
  pub fn masters(&self) -> Vec<RedisServer> {
    self.masters.lock().clone()
  }

  /// Read the commands received by the sentinel.
  pub fn commands(&self) -> &Buffer {
    &self.commands
  }

  fn has_master(&self, name: &str) -> bool {
    self.masters.lock().iter().any(|m| m.name.as_deref() == Some(name))
  }

  fn server_to_frame(&self, server: &RedisServer) -> Resp2Frame {
    let mut pairs: Vec<(String, String)> = Vec::new();
    if let Some(ref name) = server.name {
      pairs.push(("name".into(), name.clone()));
    }
    pairs.push(("ip".into(), server.host.clone()));
    pairs.push(("port".into(), server.port.to_string()));
    if let Some(ref run_id) = server.run_id {
      pairs.push(("runid".into(), run_id.clone()));
    }
    pairs.push(("flags".into(), server.flags.join(",")));
    if let Some(ref role) = server.role {
      pairs.push(("role-reported".into(), role.clone()));
    }
    let num_replicas = match server.name {
      Some(ref name) if server.is_master() => self.replicas.lock().get(name).map(|r| r.len() as u64),
      _ => None,
    };
    if let Some(count) = num_replicas.or(server.num_replicas) {
      pairs.push(("num-slaves".into(), count.to_string()));
    }
    if let Some(count) = server.num_other_sentinels {
      pairs.push(("num-other-sentinels".into(), count.to_string()));
    }
    if let Some(quorum) = server.quorum {
      pairs.push(("quorum".into(), quorum.to_string()));
    }
    for (key, value) in server.properties.iter() {
      if !pairs.iter().any(|(k, _)| k == key) {
        pairs.push((key.clone(), value.clone()));
      }
    }

    let mut frames = Vec::with_capacity(pairs.len() * 2);
    for (key, value) in pairs.into_iter() {
      frames.push(Resp2Frame::BulkString(Bytes::from(key)));
      frames.push(Resp2Frame::BulkString(Bytes::from(value)));
    }
    Resp2Frame::Array(frames)
  }

  fn monitor(&self, args: &[String]) -> Resp2Frame {
    if args.len() != 4 {
      return error_frame("ERR wrong number of arguments for 'sentinel monitor'");
    }
    if self.has_master(&args[0]) {
      return error_frame("ERR Duplicated master name");
    }
    let (port, quorum) = match (args[2].parse::<u16>(), args[3].parse::<u64>()) {
      (Ok(port), Ok(quorum)) if quorum > 0 => (port, quorum),
      _ => return error_frame("ERR Invalid port or quorum"),
    };

    self.add_master(
      RedisServer::new(args[1].clone(), port)
        .with_name(args[0].clone())
        .with_quorum(quorum),
    );
    ok_frame()
  }

  fn remove(&self, name: &str) -> Resp2Frame {
    let mut masters = self.masters.lock();
    let before = masters.len();
    masters.retain(|m| m.name.as_deref() != Some(name));

    if masters.len() == before {
      error_frame("ERR No such master with that name")
    } else {
      self.replicas.lock().remove(name);
      ok_frame()
    }
  }
}

impl Mocks for MockSentinel {
  fn process_command(&self, command: MockCommand) -> Result<Resp2Frame, RedisError> {
    self.commands.push_back(command.clone());
    let name = command.args.first().map(|s| s.as_str()).unwrap_or("");

    let frame = match (command.cmd.as_str(), command.subcommand.as_deref()) {
      ("PING", None) => Resp2Frame::SimpleString(Bytes::from_static(b"PONG")),
      ("SENTINEL", Some("FAILOVER")) => {
        if self.has_master(name) {
          ok_frame()
        } else {
          error_frame("ERR No such master with that name")
        }
      },
      ("SENTINEL", Some("MASTERS")) => {
        let masters = self.masters();
        Resp2Frame::Array(masters.iter().map(|m| self.server_to_frame(m)).collect())
      },
      ("SENTINEL", Some("REPLICAS")) => {
        if self.has_master(name) {
          let replicas = self.replicas.lock().get(name).cloned().unwrap_or_default();
          Resp2Frame::Array(replicas.iter().map(|r| self.server_to_frame(r)).collect())
        } else {
          error_frame("ERR No such master with that name")
        }
      },
      ("SENTINEL", Some("REMOVE")) => self.remove(name),
      ("SENTINEL", Some("MONITOR")) => self.monitor(&command.args),
      _ => error_frame("ERR unknown command"),
    };

    Ok(frame)
  }
}

/// A [Transport](crate::interfaces::Transport) that sends every command to a [Mocks](Mocks) implementation.
#[derive(Debug)]
pub struct MockTransport {
  server:        Server,
  connected:     bool,
  connect_error: bool,
  request_error: bool,
  connects:      Arc<AtomicUsize>,
  requests:      Arc<AtomicUsize>,
  mocks:         Arc<dyn Mocks>,
}

impl MockTransport {
  /// Create a new transport that is not yet connected.
  pub fn new(server: Server, mocks: Arc<dyn Mocks>) -> Self {
    MockTransport {
      server,
      mocks,
      connected: false,
      connect_error: false,
      request_error: false,
      connects: Arc::new(AtomicUsize::new(0)),
      requests: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Create a new transport that is already connected.
  pub fn connected(server: Server, mocks: Arc<dyn Mocks>) -> Self {
    let mut transport = MockTransport::new(server, mocks);
    transport.connected = true;
    transport
  }

  /// Fail every call to `connect` with an `IO` error.
  pub fn with_connect_error(mut self) -> Self {
    self.connect_error = true;
    self
  }

  /// Fail every request with an `IO` error.
  pub fn with_request_error(mut self) -> Self {
    self.request_error = true;
    self
  }

  /// A counter of the calls to `connect`.
  pub fn connect_count(&self) -> Arc<AtomicUsize> {
    self.connects.clone()
  }

  /// A counter of the requests sent on the transport.
  pub fn request_count(&self) -> Arc<AtomicUsize> {
    self.requests.clone()
  }
}

#[async_trait]
impl Transport for MockTransport {
  fn server(&self) -> &Server {
    &self.server
  }

  fn is_connected(&self) -> bool {
    self.connected
  }

  async fn connect(&mut self) -> Result<(), RedisError> {
    self.connects.fetch_add(1, Ordering::SeqCst);

    if self.connect_error {
      Err(RedisError::new(
        RedisErrorKind::IO,
        format!("Connection refused by {}.", self.server),
      ))
    } else {
      self.connected = true;
      Ok(())
    }
  }

  async fn request_response(&mut self, command: SentinelCommand) -> Result<Resp2Frame, RedisError> {
    self.requests.fetch_add(1, Ordering::SeqCst);

    if !self.connected {
      Err(RedisError::new(
        RedisErrorKind::IO,
        format!("Not connected to {}.", self.server),
      ))
    } else if self.request_error {
      Err(RedisError::new(RedisErrorKind::IO, "Connection reset by peer."))
    } else {
      self.mocks.process_command(MockCommand::from(&command))
    }
  }

  async fn disconnect(&mut self) -> Result<(), RedisError> {
    self.connected = false;
    Ok(())
  }
}

/// A [SentinelBinding](crate::interfaces::SentinelBinding) that reports a configurable set of nodes as active and
/// connects to them with a [MockTransport](MockTransport).
///
/// Every probe and connection attempt is recorded in order.
#[derive(Debug)]
pub struct MockBinding {
  active:        Mutex<HashSet<Server>>,
  probes:        Mutex<Vec<Server>>,
  connects:      Mutex<Vec<Server>>,
  connect_error: bool,
  mocks:         Arc<dyn Mocks>,
}

impl MockBinding {
  /// Create a new binding where every node is inactive.
  pub fn new(mocks: Arc<dyn Mocks>) -> Self {
    MockBinding {
      active: Mutex::new(HashSet::new()),
      probes: Mutex::new(Vec::new()),
      connects: Mutex::new(Vec::new()),
      connect_error: false,
      mocks,
    }
  }

  /// Mark a node as active, returning the modified binding.
  pub fn with_active(self, server: Server) -> Self {
    self.set_active(server, true);
    self
  }

  /// Fail every connection attempt with an `IO` error, returning the modified binding.
  pub fn with_connect_error(mut self) -> Self {
    self.connect_error = true;
    self
  }

  /// Change whether a node is active.
  pub fn set_active(&self, server: Server, active: bool) {
    if active {
      self.active.lock().insert(server);
    } else {
      self.active.lock().remove(&server);
    }
  }

  /// Read the nodes probed so far, in order.
  pub fn probes(&self) -> Vec<Server> {
    self.probes.lock().clone()
  }

  /// Read the nodes connected to so far, in order.
  pub fn connects(&self) -> Vec<Server> {
    self.connects.lock().clone()
  }
}

#[async_trait]
impl SentinelBinding for MockBinding {
  type Connection = SentinelConnection<MockTransport>;

  async fn is_active(&self, server: &Server) -> bool {
    self.probes.lock().push(server.clone());
    self.active.lock().contains(server)
  }

  async fn connect(&self, server: &Server) -> RedisResult<Self::Connection> {
    self.connects.lock().push(server.clone());

    let mut transport = MockTransport::new(server.clone(), self.mocks.clone());
    if self.connect_error {
      transport = transport.with_connect_error();
    }
    SentinelConnection::new(transport).await
  }
}
