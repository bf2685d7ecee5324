use crate::integration::utils::{closed_server, default_masters, FakeSentinel, SERVICE_NAME};
use fred_sentinel::{clients::TcpTransport, prelude::*};
use std::time::Duration;

fn binding() -> TcpBinding {
  TcpBinding::new(ConnectionConfig {
    connection_timeout: Duration::from_millis(1_000),
    internal_command_timeout: Duration::from_millis(500),
    command_timeout: Duration::from_millis(1_000),
  })
}

fn config(hosts: Vec<Server>) -> SentinelConfig {
  let mut config = SentinelConfig::new::<_, String>(SERVICE_NAME, vec![]);
  for server in hosts.into_iter() {
    config.add_sentinel(server);
  }
  config
}

pub async fn should_select_first_active_sentinel(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let down = closed_server().await;
  let other = FakeSentinel::start(Vec::new()).await;
  let router = SentinelRouter::with_config(config(vec![down, sentinel.server(), other.server()]), binding());

  let mut connection = router.sentinel_commands().await?;
  assert_eq!(connection.server(), &sentinel.server());
  assert_eq!(connection.state(), ConnectionState::Open);
  // one liveness probe on the selected node
  assert_eq!(sentinel.commands(), vec![vec!["PING".to_owned()]]);
  assert!(other.commands().is_empty());

  connection.close().await?;
  Ok(())
}

pub async fn should_fail_discovery_when_all_sentinels_down(_: FakeSentinel) -> Result<(), RedisError> {
  let router = SentinelRouter::with_config(
    config(vec![closed_server().await, closed_server().await]),
    binding(),
  );

  let error = router.sentinel_commands().await.unwrap_err();
  assert!(error.is_discovery());
  Ok(())
}

pub async fn should_skip_unresponsive_sentinel(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let silent = FakeSentinel::silent().await;
  let router = SentinelRouter::with_config(config(vec![silent.server(), sentinel.server()]), binding());

  let connection = router.sentinel_commands().await?;
  assert_eq!(connection.server(), &sentinel.server());
  assert_eq!(silent.commands(), vec![vec!["PING".to_owned()]]);
  Ok(())
}

pub async fn should_list_masters(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let router = SentinelRouter::with_config(config(vec![sentinel.server()]), binding());
  let mut connection = router.sentinel_commands().await?;

  let masters = connection.masters().await?;
  assert_eq!(masters.len(), 2);
  assert_eq!(masters[0].name.as_deref(), Some(SERVICE_NAME));
  assert_eq!(masters[0].host, "10.0.0.1");
  assert_eq!(masters[0].port, 6379);
  assert_eq!(masters[0].run_id.as_deref(), Some("4ac2d6e3f8c1b0a9"));
  assert_eq!(masters[0].role.as_deref(), Some("master"));
  assert_eq!(masters[0].num_replicas, Some(2));
  assert_eq!(masters[0].num_other_sentinels, Some(2));
  assert_eq!(masters[0].quorum, Some(2));
  assert!(masters[0].is_master());
  assert!(!masters[0].is_down());

  assert_eq!(masters[1].name.as_deref(), Some("redis-sentinel-other"));
  assert_eq!(masters[1].port, 6380);
  assert!(masters[1].is_down());

  assert_eq!(sentinel.sentinel_commands(), vec![vec![
    "SENTINEL".to_owned(),
    "MASTERS".to_owned()
  ]]);
  connection.close().await?;
  Ok(())
}

pub async fn should_trigger_failover(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let config = config(vec![sentinel.server()]);
  let router = SentinelRouter::with_config(config.clone(), binding());
  let mut connection = router.sentinel_commands().await?;

  connection.failover(&config.master()).await?;
  let error = connection.failover("unknown").await.unwrap_err();
  assert_eq!(error.kind(), &RedisErrorKind::Sentinel);
  assert_eq!(error.details(), "ERR No such master with that name");

  assert_eq!(sentinel.sentinel_commands(), vec![
    vec!["SENTINEL".to_owned(), "FAILOVER".to_owned(), SERVICE_NAME.to_owned()],
    vec!["SENTINEL".to_owned(), "FAILOVER".to_owned(), "unknown".to_owned()],
  ]);
  Ok(())
}

pub async fn should_reject_blank_master_without_sending(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let mut connection = SentinelConnection::from_server(sentinel.server(), ConnectionConfig::default()).await?;

  let missing: Option<MasterNode> = None;
  assert!(connection.failover(&missing).await.unwrap_err().is_config());
  assert!(connection.failover(&MasterNode::new(" ")).await.unwrap_err().is_config());
  assert!(sentinel.commands().is_empty());
  Ok(())
}

pub async fn should_error_after_close(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let mut connection = SentinelConnection::from_server(sentinel.server(), ConnectionConfig::default()).await?;
  connection.close().await?;

  assert!(connection.masters().await.unwrap_err().is_closed());
  assert!(connection.failover(SERVICE_NAME).await.unwrap_err().is_closed());
  assert!(connection.close().await.unwrap_err().is_closed());
  assert!(sentinel.commands().is_empty());
  Ok(())
}

pub async fn should_time_out_commands(_: FakeSentinel) -> Result<(), RedisError> {
  let silent = FakeSentinel::silent().await;
  let config = ConnectionConfig {
    command_timeout: Duration::from_millis(100),
    ..Default::default()
  };
  let mut connection = SentinelConnection::from_server(silent.server(), config).await?;

  let error = connection.masters().await.unwrap_err();
  assert_eq!(error.kind(), &RedisErrorKind::Timeout);
  assert!(error.is_transport());
  Ok(())
}

pub async fn should_drop_connection_after_command_timeout(_: FakeSentinel) -> Result<(), RedisError> {
  let delayed = FakeSentinel::delayed(default_masters(), Duration::from_millis(300)).await;
  let config = ConnectionConfig {
    command_timeout: Duration::from_millis(100),
    ..Default::default()
  };
  let mut connection = SentinelConnection::from_server(delayed.server(), config).await?;

  let error = connection.failover(SERVICE_NAME).await.unwrap_err();
  assert_eq!(error.kind(), &RedisErrorKind::Timeout);
  assert!(!connection.inner().is_connected());

  // the late reply must not be read as the reply to a later command
  tokio::time::sleep(Duration::from_millis(400)).await;
  let error = connection.failover(SERVICE_NAME).await.unwrap_err();
  assert_eq!(error.kind(), &RedisErrorKind::IO);
  assert!(error.is_transport());
  let error = connection.masters().await.unwrap_err();
  assert_eq!(error.kind(), &RedisErrorKind::IO);

  assert_eq!(delayed.sentinel_commands(), vec![vec![
    "SENTINEL".to_owned(),
    "FAILOVER".to_owned(),
    SERVICE_NAME.to_owned()
  ]]);
  Ok(())
}

pub async fn should_use_connected_transport_without_reconnecting(sentinel: FakeSentinel) -> Result<(), RedisError> {
  let transport = TcpTransport::connected(sentinel.server(), ConnectionConfig::default()).await?;
  assert!(transport.is_connected());
  let mut connection = SentinelConnection::new(transport).await?;

  assert_eq!(connection.state(), ConnectionState::Open);
  assert_eq!(connection.masters().await?.len(), 2);
  assert_eq!(sentinel.connections(), 1);

  connection.close().await?;
  Ok(())
}

pub async fn should_error_connecting_to_closed_port(_: FakeSentinel) -> Result<(), RedisError> {
  let error = SentinelConnection::from_server(closed_server().await, ConnectionConfig::default())
    .await
    .unwrap_err();

  assert!(error.is_transport());
  Ok(())
}
