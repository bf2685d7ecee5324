use crate::{
  commands,
  error::RedisError,
  types::{NamedNode, RedisServer, Server},
};

pub use crate::protocol::connection::Transport;

/// Type alias for `Result<T, RedisError>`.
pub type RedisResult<T> = Result<T, RedisError>;

/// Any connection to a single sentinel node that can issue commands.
#[async_trait]
pub trait SentinelLike: Send {
  /// An identifier for the connection used in logs.
  fn id(&self) -> &str;

  /// Read the underlying transport, or a `Closed` error if the connection was closed.
  #[doc(hidden)]
  fn transport(&mut self) -> Result<&mut dyn Transport, RedisError>;

  /// Close the connection.
  ///
  /// Any later command returns a `Closed` error, including a second call to `close`.
  async fn close(&mut self) -> RedisResult<()>;
}

/// Functions that implement the [sentinel](https://redis.io/docs/management/sentinel/#sentinel-commands) interface.
///
/// Every function is a single blocking round trip on the connection's transport. Nothing is retried.
#[async_trait]
pub trait SentinelInterface: SentinelLike + Sized {
  /// Force a failover as if the master was not reachable, and without asking for agreement to other Sentinels.
  ///
  /// Returns a `Config` error without sending anything if the master has no name or a blank name.
  async fn failover<N>(&mut self, master: &N) -> RedisResult<()>
  where
    N: NamedNode + Sync + ?Sized,
  {
    commands::sentinel::failover(self, master).await
  }

  /// Show a list of monitored masters and their state, in the order reported by the sentinel.
  async fn masters(&mut self) -> RedisResult<Vec<RedisServer>> {
    commands::sentinel::masters(self).await
  }

  /// Show a list of replicas for this master, and their state.
  async fn replicas<N>(&mut self, master: &N) -> RedisResult<Vec<RedisServer>>
  where
    N: NamedNode + Sync + ?Sized,
  {
    commands::sentinel::replicas(self, master).await
  }

  /// Stop Sentinel's monitoring.
  ///
  /// <https://redis.io/docs/management/sentinel/#reconfiguring-sentinel-at-runtime>
  async fn remove<N>(&mut self, master: &N) -> RedisResult<()>
  where
    N: NamedNode + Sync + ?Sized,
  {
    commands::sentinel::remove(self, master).await
  }

  /// Start Sentinel's monitoring. The server must have a name, a host, and a quorum.
  ///
  /// <https://redis.io/docs/management/sentinel/#reconfiguring-sentinel-at-runtime>
  async fn monitor(&mut self, server: &RedisServer) -> RedisResult<()> {
    commands::sentinel::monitor(self, server).await
  }
}

/// The capabilities a client binding provides to the [SentinelRouter](crate::router::SentinelRouter).
///
/// There is no default liveness probe. Each binding decides what "active" means for its transport.
#[async_trait]
pub trait SentinelBinding: Send + Sync + 'static {
  /// The connection type returned to callers.
  type Connection: SentinelInterface;

  /// Check whether the sentinel node is reachable and responsive.
  ///
  /// Any failure, including timeouts, should be reported as `false`.
  async fn is_active(&self, server: &Server) -> bool;

  /// Open a new connection to the sentinel node.
  async fn connect(&self, server: &Server) -> RedisResult<Self::Connection>;
}
