use crate::{
  error::{RedisError, RedisErrorKind},
  interfaces::*,
  protocol::connection::TcpTransport,
  types::{ConnectionConfig, ConnectionState, Server},
  utils,
};
use std::{fmt, sync::Arc};

/// A connection to a single sentinel node.
///
/// This struct **will not** communicate with Redis servers behind the sentinel interface, but rather with the
/// sentinel node itself. The connection is exclusively owned by the caller that created it and moves through
/// `Unopened -> Open -> Closed` exactly once.
///
/// See the [sentinel API docs](https://redis.io/docs/management/sentinel/#sentinel-api) for more information.
pub struct SentinelConnection<T: Transport = TcpTransport> {
  id:        Arc<String>,
  state:     ConnectionState,
  transport: T,
}

impl<T: Transport> fmt::Debug for SentinelConnection<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SentinelConnection")
      .field("id", &self.id)
      .field("server", self.transport.server())
      .field("state", &self.state)
      .finish()
  }
}

impl<T: Transport> SentinelConnection<T> {
  /// Create a new connection from a transport, connecting the transport first if it is not already connected.
  ///
  /// A transport that was connected elsewhere is used as-is.
  pub async fn new(transport: T) -> Result<Self, RedisError> {
    let mut connection = SentinelConnection {
      id: utils::new_id(),
      state: ConnectionState::Unopened,
      transport,
    };
    connection.init().await?;

    Ok(connection)
  }

  async fn init(&mut self) -> Result<(), RedisError> {
    if self.transport.is_connected() {
      _trace!(self, "Using existing connection to {}", self.transport.server());
    } else {
      _debug!(self, "Connecting to sentinel {}", self.transport.server());
      self.transport.connect().await?;
    }

    self.state = ConnectionState::Open;
    Ok(())
  }

  /// Read the current state of the connection.
  pub fn state(&self) -> ConnectionState {
    self.state
  }

  /// The sentinel node associated with this connection.
  pub fn server(&self) -> &Server {
    self.transport.server()
  }

  /// Read the underlying transport without checking the connection state.
  pub fn inner(&self) -> &T {
    &self.transport
  }
}

impl SentinelConnection<TcpTransport> {
  /// Create a new TCP connection to the provided sentinel node.
  pub async fn from_server(server: Server, config: ConnectionConfig) -> Result<Self, RedisError> {
    SentinelConnection::new(TcpTransport::new(server, config)).await
  }
}

#[async_trait]
impl<T: Transport> SentinelLike for SentinelConnection<T> {
  fn id(&self) -> &str {
    &self.id
  }

  #[doc(hidden)]
  fn transport(&mut self) -> Result<&mut dyn Transport, RedisError> {
    match self.state {
      ConnectionState::Open => Ok(&mut self.transport),
      ConnectionState::Closed => Err(RedisError::new_closed()),
      ConnectionState::Unopened => Err(RedisError::new(RedisErrorKind::IO, "Connection is not open.")),
    }
  }

  async fn close(&mut self) -> RedisResult<()> {
    if self.state == ConnectionState::Closed {
      return Err(RedisError::new_closed());
    }

    _debug!(self, "Closing connection to {}", self.transport.server());
    self.state = ConnectionState::Closed;
    self.transport.disconnect().await
  }
}

impl<T: Transport> SentinelInterface for SentinelConnection<T> {}
