use crate::{
  error::{RedisError, RedisErrorKind},
  protocol::{
    codec::RedisCodec,
    command::{SentinelCommand, SentinelCommandKind},
    utils as protocol_utils,
  },
  types::{ConnectionConfig, Server},
  utils,
};
use futures::{SinkExt, StreamExt};
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::{fmt, sync::Arc};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// A single point-to-point connection to a sentinel node.
///
/// Each client binding provides its own implementation. A transport may be handed to
/// [SentinelConnection::new](crate::clients::SentinelConnection::new) either before or after it connects.
#[async_trait]
pub trait Transport: Send + 'static {
  /// The sentinel node associated with the transport.
  fn server(&self) -> &Server;

  /// Whether the transport is currently connected.
  fn is_connected(&self) -> bool;

  /// Connect to the server.
  async fn connect(&mut self) -> Result<(), RedisError>;

  /// Send a command and wait for the response.
  ///
  /// Error replies from the server are returned as `Ok` frames. Network failures are returned as errors.
  async fn request_response(&mut self, command: SentinelCommand) -> Result<Resp2Frame, RedisError>;

  /// Close the connection.
  async fn disconnect(&mut self) -> Result<(), RedisError>;

  /// Send `PING` and check for a `PONG` response.
  async fn ping(&mut self) -> Result<(), RedisError> {
    let frame = self
      .request_response(SentinelCommand::new(SentinelCommandKind::Ping, Vec::new()))
      .await?;
    protocol_utils::expect_pong(frame)
  }
}

/// A RESP2 transport over TCP.
pub struct TcpTransport {
  id:     Arc<String>,
  server: Server,
  config: ConnectionConfig,
  framed: Option<Framed<TcpStream, RedisCodec>>,
}

impl fmt::Debug for TcpTransport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TcpTransport")
      .field("id", &self.id)
      .field("server", &self.server)
      .field("connected", &self.is_connected())
      .finish()
  }
}

impl TcpTransport {
  /// Create a new transport without connecting to the server.
  pub fn new(server: Server, config: ConnectionConfig) -> Self {
    TcpTransport {
      id: utils::new_id(),
      framed: None,
      server,
      config,
    }
  }

  /// Create a new transport and connect to the server.
  pub async fn connected(server: Server, config: ConnectionConfig) -> Result<Self, RedisError> {
    let mut transport = TcpTransport::new(server, config);
    transport.connect().await?;
    Ok(transport)
  }

  /// An identifier for the transport used in logs.
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Read the timeouts used by the transport.
  pub fn config(&self) -> &ConnectionConfig {
    &self.config
  }
}

#[async_trait]
impl Transport for TcpTransport {
  fn server(&self) -> &Server {
    &self.server
  }

  fn is_connected(&self) -> bool {
    self.framed.is_some()
  }

  async fn connect(&mut self) -> Result<(), RedisError> {
    _debug!(self, "Creating TCP connection to {}", self.server);
    let addr = (&*self.server.host, self.server.port);
    let socket = utils::timeout(TcpStream::connect(addr), self.config.connection_timeout).await?;
    socket.set_nodelay(true)?;

    let codec = RedisCodec::new(&self.id, self.server.to_string());
    self.framed = Some(Framed::new(socket, codec));
    Ok(())
  }

  async fn request_response(&mut self, command: SentinelCommand) -> Result<Resp2Frame, RedisError> {
    _trace!(self, "Sending {} to {}", command, self.server);
    let frame = command.to_frame();
    let framed = match self.framed.as_mut() {
      Some(framed) => framed,
      None => {
        return Err(RedisError::new(
          RedisErrorKind::IO,
          format!("Not connected to {}.", self.server),
        ))
      },
    };

    let result = utils::timeout(
      async move {
        framed.send(frame).await?;
        match framed.next().await {
          Some(result) => result,
          None => Err(RedisError::new(RedisErrorKind::IO, "Connection closed.")),
        }
      },
      self.config.command_timeout,
    )
    .await;

    // a reply that arrives after this point can no longer be matched to its command
    if let Err(ref error) = result {
      _debug!(self, "Dropping connection to {} after error: {:?}", self.server, error);
      self.framed = None;
    }
    result
  }

  async fn disconnect(&mut self) -> Result<(), RedisError> {
    if let Some(mut framed) = self.framed.take() {
      _debug!(self, "Disconnecting from {}", self.server);
      SinkExt::<Resp2Frame>::close(&mut framed).await?;
    }

    Ok(())
  }
}
