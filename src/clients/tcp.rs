use crate::{
  clients::SentinelConnection,
  error::RedisError,
  interfaces::*,
  protocol::connection::TcpTransport,
  types::{ConnectionConfig, Server},
  utils,
};
use std::{fmt, sync::Arc};

/// The default [SentinelBinding](crate::interfaces::SentinelBinding) that talks RESP2 over TCP.
///
/// The liveness probe opens a fresh connection, sends `PING`, and closes the connection again. The whole probe is
/// bounded by `internal_command_timeout`.
#[derive(Clone)]
pub struct TcpBinding {
  id:     Arc<String>,
  config: ConnectionConfig,
}

impl fmt::Debug for TcpBinding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TcpBinding")
      .field("id", &self.id)
      .field("config", &self.config)
      .finish()
  }
}

impl Default for TcpBinding {
  fn default() -> Self {
    TcpBinding::new(ConnectionConfig::default())
  }
}

impl TcpBinding {
  /// Create a new binding with the provided timeouts.
  pub fn new(config: ConnectionConfig) -> Self {
    TcpBinding {
      id: utils::new_id(),
      config,
    }
  }

  /// An identifier for the binding used in logs.
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Read the timeouts used by the binding.
  pub fn config(&self) -> &ConnectionConfig {
    &self.config
  }

  async fn probe(&self, server: &Server) -> Result<(), RedisError> {
    let mut transport = TcpTransport::new(server.clone(), self.config.clone());
    let result = utils::timeout(
      async {
        transport.connect().await?;
        transport.ping().await
      },
      self.config.internal_command_timeout,
    )
    .await;

    if let Err(e) = transport.disconnect().await {
      _trace!(self, "Error closing probe connection to {}: {:?}", server, e);
    }
    result
  }
}

#[async_trait]
impl SentinelBinding for TcpBinding {
  type Connection = SentinelConnection<TcpTransport>;

  async fn is_active(&self, server: &Server) -> bool {
    match self.probe(server).await {
      Ok(_) => {
        _trace!(self, "Sentinel {} is active.", server);
        true
      },
      Err(e) => {
        _debug!(self, "Sentinel {} is not active: {:?}", server, e);
        false
      },
    }
  }

  async fn connect(&self, server: &Server) -> RedisResult<Self::Connection> {
    SentinelConnection::from_server(server.clone(), self.config.clone()).await
  }
}
