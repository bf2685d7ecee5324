use crate::{
  error::{RedisError, RedisErrorKind},
  types::{NamedNode, Server},
};
use bytes::Bytes;
use futures::Future;
use rand::{self, distributions::Alphanumeric, Rng};
use std::{sync::Arc, time::Duration};
use url::Url;

const REDIS_SENTINEL_SCHEME_SUFFIX: &str = "-sentinel";
const SENTINEL_NAME_QUERY: &str = "sentinelServiceName";
const SENTINEL_NODE_QUERY: &str = "node";
/// The port used when a sentinel URL or node string omits one.
pub const DEFAULT_SENTINEL_PORT: u16 = 26379;
const ID_PREFIX: &str = "fred-sentinel";
const ID_LEN: usize = 8;

/// Create a `Bytes` from static bytes without copying.
pub fn static_bytes(b: &'static [u8]) -> Bytes {
  Bytes::from_static(b)
}

pub fn random_string(len: usize) -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(len)
    .map(char::from)
    .collect()
}

/// Create a new identifier used to associate log lines with a router, connection, or transport.
pub fn new_id() -> Arc<String> {
  Arc::new(format!("{}-{}", ID_PREFIX, random_string(ID_LEN)))
}

/// Run the provided future with a timeout. A zero duration disables the timeout.
pub async fn timeout<T, Fut, E>(f: Fut, duration: Duration) -> Result<T, RedisError>
where
  E: Into<RedisError>,
  Fut: Future<Output = Result<T, E>>,
{
  if duration.is_zero() {
    f.await.map_err(|e| e.into())
  } else {
    match tokio::time::timeout(duration, f).await {
      Ok(result) => result.map_err(|e| e.into()),
      Err(_) => Err(RedisError::new(
        RedisErrorKind::Timeout,
        format!("Request timed out after {} ms.", duration.as_millis()),
      )),
    }
  }
}

/// Read the name of the provided node, returning a `Config` error if it is missing or blank.
pub fn read_node_name<'a, N>(node: &'a N, operation: &str) -> Result<&'a str, RedisError>
where
  N: NamedNode + ?Sized,
{
  match node.name() {
    Some(name) if !name.trim().is_empty() => Ok(name),
    Some(_) => Err(RedisError::new(
      RedisErrorKind::Config,
      format!("Redis master name must not be empty for {}.", operation),
    )),
    None => Err(RedisError::new(
      RedisErrorKind::Config,
      format!("Redis master node must not be empty for {}.", operation),
    )),
  }
}

/// Parse a `host:port` string, using the default sentinel port if the port is missing.
pub fn parse_host_port(value: &str) -> Result<Server, RedisError> {
  let value = value.trim();
  let (host, port) = match value.rsplit_once(':') {
    _ if value.starts_with('[') && value.ends_with(']') => (value, DEFAULT_SENTINEL_PORT),
    Some((host, port)) => (host, port.trim().parse::<u16>().map_err(|_| invalid_node(value))?),
    None => (value, DEFAULT_SENTINEL_PORT),
  };
  let host = host.trim().trim_start_matches('[').trim_end_matches(']');

  // IPv6 hosts must be bracketed
  if host.is_empty() || (host.contains(':') && !value.starts_with('[')) {
    Err(invalid_node(value))
  } else {
    Ok(Server::new(host, port))
  }
}

fn invalid_node(value: &str) -> RedisError {
  RedisError::new(
    RedisErrorKind::Config,
    format!("Invalid host:port for sentinel node: {}", value),
  )
}

pub fn url_is_sentinel(url: &Url) -> bool {
  url.scheme().ends_with(REDIS_SENTINEL_SCHEME_SUFFIX)
}

pub fn parse_url(url: &str) -> Result<(Url, Server), RedisError> {
  let url = Url::parse(url)?;
  if !url_is_sentinel(&url) {
    return Err(RedisError::new(
      RedisErrorKind::Url,
      format!("Expected a sentinel URL scheme, found {}.", url.scheme()),
    ));
  }

  let host = match url.host_str() {
    Some(host) => host.trim_start_matches('[').trim_end_matches(']').to_owned(),
    None => return Err(RedisError::new(RedisErrorKind::Config, "Invalid or missing host.")),
  };
  let port = url.port().unwrap_or(DEFAULT_SENTINEL_PORT);

  Ok((url, Server::new(host, port)))
}

pub fn parse_url_other_nodes(url: &Url) -> Result<Vec<Server>, RedisError> {
  let mut out = Vec::new();

  for (key, value) in url.query_pairs() {
    if key == SENTINEL_NODE_QUERY {
      out.push(parse_host_port(&value)?);
    }
  }

  Ok(out)
}

pub fn parse_url_sentinel_service_name(url: &Url) -> Result<String, RedisError> {
  for (key, value) in url.query_pairs() {
    if key == SENTINEL_NAME_QUERY {
      return Ok(value.to_string());
    }
  }

  Err(RedisError::new(
    RedisErrorKind::Config,
    "Invalid or missing sentinel service name query parameter.",
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::MasterNode;

  #[test]
  fn should_parse_host_and_port() {
    assert_eq!(parse_host_port("127.0.0.1:26380").unwrap(), Server::new("127.0.0.1", 26380));
    assert_eq!(parse_host_port(" sentinel-1 ").unwrap(), Server::new("sentinel-1", 26379));
    assert_eq!(parse_host_port("[::1]:26381").unwrap(), Server::new("::1", 26381));
    assert_eq!(parse_host_port("[fe80::1]").unwrap(), Server::new("fe80::1", 26379));
  }

  #[test]
  fn should_error_on_malformed_host_and_port() {
    assert!(parse_host_port("localhost:abc").unwrap_err().is_config());
    assert!(parse_host_port(":26379").unwrap_err().is_config());
    assert!(parse_host_port("localhost:99999").unwrap_err().is_config());
    assert!(parse_host_port("::1").unwrap_err().is_config());
    assert!(parse_host_port("fe80::1:26379").unwrap_err().is_config());
    assert!(parse_host_port("[::1]:").unwrap_err().is_config());
  }

  #[test]
  fn should_read_node_names() {
    let master = MasterNode::new("mymaster");
    assert_eq!(read_node_name(&master, "failover").unwrap(), "mymaster");

    let missing: Option<MasterNode> = None;
    assert!(read_node_name(&missing, "failover").unwrap_err().is_config());
    assert!(read_node_name("  ", "failover").unwrap_err().is_config());
  }

  #[tokio::test]
  async fn should_time_out_slow_futures() {
    let result: Result<(), RedisError> = timeout(
      async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, RedisError>(())
      },
      Duration::from_millis(10),
    )
    .await;

    assert_eq!(result.unwrap_err().kind(), &RedisErrorKind::Timeout);
  }

  #[tokio::test]
  async fn should_not_time_out_with_zero_duration() {
    let result = timeout(async { Ok::<_, RedisError>(1) }, Duration::from_millis(0)).await;
    assert_eq!(result.unwrap(), 1);
  }
}
