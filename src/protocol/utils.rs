use crate::{
  error::{RedisError, RedisErrorKind},
  types::RedisServer,
};
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::{borrow::Cow, collections::HashMap, str};

/// The contents of a simplestring OK response.
pub const OK: &str = "OK";
/// The contents of a simplestring PONG response.
pub const PONG: &str = "PONG";

#[cfg(feature = "network-logs")]
#[derive(Debug)]
pub enum DebugFrame {
  String(String),
  Bytes(Vec<u8>),
  Integer(i64),
  Array(Vec<DebugFrame>),
}

#[cfg(feature = "network-logs")]
impl<'a> From<&'a Resp2Frame> for DebugFrame {
  fn from(f: &'a Resp2Frame) -> Self {
    match f {
      Resp2Frame::Error(s) => DebugFrame::String(s.to_string()),
      Resp2Frame::SimpleString(b) | Resp2Frame::BulkString(b) => match str::from_utf8(b) {
        Ok(s) => DebugFrame::String(s.to_owned()),
        Err(_) => DebugFrame::Bytes(b.to_vec()),
      },
      Resp2Frame::Integer(i) => DebugFrame::Integer(*i),
      Resp2Frame::Null => DebugFrame::String("nil".into()),
      Resp2Frame::Array(frames) => DebugFrame::Array(frames.iter().map(|f| f.into()).collect()),
    }
  }
}

/// Convert an error reply from a sentinel into a `RedisError`.
pub fn pretty_error(resp: &str) -> RedisError {
  let details = if resp.is_empty() {
    Cow::Borrowed("No response!")
  } else {
    Cow::Owned(resp.to_owned())
  };

  RedisError::new(RedisErrorKind::Sentinel, details)
}

/// Return an error if the frame is an error reply, otherwise return the frame.
pub fn check_error(frame: Resp2Frame) -> Result<Resp2Frame, RedisError> {
  match frame {
    Resp2Frame::Error(ref s) => Err(pretty_error(s)),
    _ => Ok(frame),
  }
}

/// Read a simplestring or bulk string frame as a `str`.
pub fn frame_as_str(frame: &Resp2Frame) -> Option<&str> {
  match frame {
    Resp2Frame::SimpleString(ref b) | Resp2Frame::BulkString(ref b) => str::from_utf8(b).ok(),
    _ => None,
  }
}

fn expect_simple_string(frame: Resp2Frame, expected: &'static str) -> Result<(), RedisError> {
  let frame = check_error(frame)?;
  if frame_as_str(&frame) == Some(expected) {
    Ok(())
  } else {
    Err(RedisError::new(
      RedisErrorKind::Protocol,
      format!("Expected {}, found {:?}.", expected, frame),
    ))
  }
}

/// Check that the frame is an `OK` reply.
pub fn expect_ok(frame: Resp2Frame) -> Result<(), RedisError> {
  expect_simple_string(frame, OK)
}

/// Check that the frame is a `PONG` reply.
pub fn expect_pong(frame: Resp2Frame) -> Result<(), RedisError> {
  expect_simple_string(frame, PONG)
}

/// Convert a flat array of alternating keys and values into a map.
pub fn frame_to_map(frame: Resp2Frame) -> Result<HashMap<String, String>, RedisError> {
  let frames = match frame {
    Resp2Frame::Array(frames) => frames,
    _ => return Err(RedisError::new_parse("Expected array of key/value pairs.")),
  };
  if frames.len() % 2 != 0 {
    return Err(RedisError::new_parse("Expected an even number of frames."));
  }

  let mut out = HashMap::with_capacity(frames.len() / 2);
  let mut frames = frames.into_iter();
  while let (Some(key), Some(value)) = (frames.next(), frames.next()) {
    let key = match frame_as_str(&key) {
      Some(key) => key.to_owned(),
      None => return Err(RedisError::new_parse("Expected string key.")),
    };
    let value = match value {
      Resp2Frame::Integer(i) => i.to_string(),
      Resp2Frame::Null => continue,
      ref other => match frame_as_str(other) {
        Some(value) => value.to_owned(),
        None => return Err(RedisError::new_parse(format!("Invalid value for {}.", key))),
      },
    };

    out.insert(key, value);
  }

  Ok(out)
}

/// Convert a `SENTINEL MASTERS` or `SENTINEL REPLICAS` reply into server descriptions, preserving the reply order.
pub fn frame_to_servers(frame: Resp2Frame) -> Result<Vec<RedisServer>, RedisError> {
  let records = match check_error(frame)? {
    Resp2Frame::Array(records) => records,
    Resp2Frame::Null => return Ok(Vec::new()),
    other => {
      return Err(RedisError::new(
        RedisErrorKind::Protocol,
        format!("Expected array of servers, found {:?}.", other),
      ))
    },
  };

  let mut out = Vec::with_capacity(records.len());
  for record in records.into_iter() {
    out.push(RedisServer::try_from(frame_to_map(record)?)?);
  }
  Ok(out)
}
