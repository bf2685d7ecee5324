use crate::{
  error::{RedisError, RedisErrorKind},
  interfaces::SentinelLike,
  protocol::{
    command::{SentinelCommand, SentinelCommandKind},
    utils as protocol_utils,
  },
  types::{NamedNode, RedisServer},
  utils,
};
use bytes::Bytes;

fn name_arg(name: &str) -> Bytes {
  Bytes::from(name.to_owned())
}

pub async fn failover<C, N>(client: &mut C, master: &N) -> Result<(), RedisError>
where
  C: SentinelLike,
  N: NamedNode + Sync + ?Sized,
{
  let transport = client.transport()?;
  let name = utils::read_node_name(master, "failover")?;
  let command = SentinelCommand::new(SentinelCommandKind::Failover, vec![name_arg(name)]);

  let frame = transport.request_response(command).await?;
  protocol_utils::expect_ok(frame)
}

pub async fn masters<C: SentinelLike>(client: &mut C) -> Result<Vec<RedisServer>, RedisError> {
  let transport = client.transport()?;
  let command = SentinelCommand::new(SentinelCommandKind::Masters, Vec::new());

  let frame = transport.request_response(command).await?;
  protocol_utils::frame_to_servers(frame)
}

pub async fn replicas<C, N>(client: &mut C, master: &N) -> Result<Vec<RedisServer>, RedisError>
where
  C: SentinelLike,
  N: NamedNode + Sync + ?Sized,
{
  let transport = client.transport()?;
  let name = utils::read_node_name(master, "replicas")?;
  let command = SentinelCommand::new(SentinelCommandKind::Replicas, vec![name_arg(name)]);

  let frame = transport.request_response(command).await?;
  protocol_utils::frame_to_servers(frame)
}

pub async fn remove<C, N>(client: &mut C, master: &N) -> Result<(), RedisError>
where
  C: SentinelLike,
  N: NamedNode + Sync + ?Sized,
{
  let transport = client.transport()?;
  let name = utils::read_node_name(master, "remove")?;
  let command = SentinelCommand::new(SentinelCommandKind::Remove, vec![name_arg(name)]);

  let frame = transport.request_response(command).await?;
  protocol_utils::expect_ok(frame)
}

pub async fn monitor<C: SentinelLike>(client: &mut C, server: &RedisServer) -> Result<(), RedisError> {
  let transport = client.transport()?;
  let name = utils::read_node_name(server, "monitor")?;
  if server.host.trim().is_empty() {
    return Err(RedisError::new(
      RedisErrorKind::Config,
      "Host must not be empty for monitor.",
    ));
  }
  let quorum = match server.quorum {
    Some(quorum) if quorum > 0 => quorum,
    _ => {
      return Err(RedisError::new(
        RedisErrorKind::Config,
        "Quorum must be greater than zero for monitor.",
      ))
    },
  };

  let command = SentinelCommand::new(SentinelCommandKind::Monitor, vec![
    name_arg(name),
    Bytes::from(server.host.clone()),
    Bytes::from(server.port.to_string()),
    Bytes::from(quorum.to_string()),
  ]);
  let frame = transport.request_response(command).await?;
  protocol_utils::expect_ok(frame)
}
