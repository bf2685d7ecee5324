use bytes::Bytes;
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::{fmt, str};

pub static SENTINEL: &str = "SENTINEL";
pub static PING: &str = "PING";
pub static FAILOVER: &str = "FAILOVER";
pub static MASTERS: &str = "MASTERS";
pub static REPLICAS: &str = "REPLICAS";
pub static REMOVE: &str = "REMOVE";
pub static MONITOR: &str = "MONITOR";

/// The commands sent to sentinel nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SentinelCommandKind {
  Ping,
  Failover,
  Masters,
  Replicas,
  Remove,
  Monitor,
}

impl SentinelCommandKind {
  /// The command name.
  pub fn cmd_str(&self) -> &'static str {
    match *self {
      SentinelCommandKind::Ping => PING,
      _ => SENTINEL,
    }
  }

  /// The subcommand name, if any.
  pub fn subcommand_str(&self) -> Option<&'static str> {
    match *self {
      SentinelCommandKind::Ping => None,
      SentinelCommandKind::Failover => Some(FAILOVER),
      SentinelCommandKind::Masters => Some(MASTERS),
      SentinelCommandKind::Replicas => Some(REPLICAS),
      SentinelCommandKind::Remove => Some(REMOVE),
      SentinelCommandKind::Monitor => Some(MONITOR),
    }
  }
}

/// A command and its arguments, not including the subcommand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentinelCommand {
  pub kind: SentinelCommandKind,
  pub args: Vec<Bytes>,
}

impl SentinelCommand {
  pub fn new(kind: SentinelCommandKind, args: Vec<Bytes>) -> Self {
    SentinelCommand { kind, args }
  }

  /// Convert the command to a RESP2 array of bulk strings.
  pub fn to_frame(&self) -> Resp2Frame {
    let mut frames = Vec::with_capacity(self.args.len() + 2);
    frames.push(Resp2Frame::BulkString(static_val!(self.kind.cmd_str())));
    if let Some(subcommand) = self.kind.subcommand_str() {
      frames.push(Resp2Frame::BulkString(static_val!(subcommand)));
    }
    for arg in self.args.iter() {
      frames.push(Resp2Frame::BulkString(arg.clone()));
    }

    Resp2Frame::Array(frames)
  }

  /// Read the arguments as UTF-8 strings, replacing invalid sequences.
  pub fn args_lossy(&self) -> Vec<String> {
    self.args.iter().map(|arg| String::from_utf8_lossy(arg).into_owned()).collect()
  }
}

impl fmt::Display for SentinelCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind.subcommand_str() {
      Some(subcommand) => write!(f, "{} {}", self.kind.cmd_str(), subcommand),
      None => write!(f, "{}", self.kind.cmd_str()),
    }
  }
}
