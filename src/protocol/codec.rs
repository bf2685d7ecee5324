use crate::error::RedisError;
use bytes::BytesMut;
use redis_protocol::resp2::{
  decode::decode_bytes_mut as resp2_decode,
  encode::extend_encode as resp2_encode,
  types::BytesFrame as Resp2Frame,
};
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};

#[cfg(feature = "network-logs")]
use crate::protocol::utils::DebugFrame;

#[cfg(not(feature = "network-logs"))]
fn log_resp2_frame(_: &str, _: &Resp2Frame, _: bool) {}

#[cfg(feature = "network-logs")]
fn log_resp2_frame(name: &str, frame: &Resp2Frame, encode: bool) {
  let prefix = if encode { "Encoded" } else { "Decoded" };
  trace!("{}: {} {:?}", name, prefix, DebugFrame::from(frame))
}

fn resp2_encode_frame(codec: &RedisCodec, item: Resp2Frame, dst: &mut BytesMut) -> Result<(), RedisError> {
  let offset = dst.len();
  let res = resp2_encode(dst, &item)?;
  let len = res.saturating_sub(offset);

  trace!(
    "{}: Encoded {} bytes to {}. Buffer len: {}",
    codec.name,
    len,
    codec.server,
    res
  );
  log_resp2_frame(&codec.name, &item, true);
  Ok(())
}

fn resp2_decode_frame(codec: &RedisCodec, src: &mut BytesMut) -> Result<Option<Resp2Frame>, RedisError> {
  trace!("{}: Recv {} bytes from {}.", codec.name, src.len(), codec.server);
  if src.is_empty() {
    return Ok(None);
  }

  if let Some((frame, amt, _)) = resp2_decode(src)? {
    trace!("{}: Parsed {} bytes from {}", codec.name, amt, codec.server);
    log_resp2_frame(&codec.name, &frame, false);
    Ok(Some(frame))
  } else {
    Ok(None)
  }
}

/// A RESP2 codec for sentinel connections.
pub struct RedisCodec {
  pub name:   Arc<String>,
  pub server: String,
}

impl RedisCodec {
  pub fn new(name: &Arc<String>, server: String) -> Self {
    RedisCodec {
      name: name.clone(),
      server,
    }
  }
}

impl Encoder<Resp2Frame> for RedisCodec {
  type Error = RedisError;

  fn encode(&mut self, item: Resp2Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
    resp2_encode_frame(self, item, dst)
  }
}

impl Decoder for RedisCodec {
  type Error = RedisError;
  type Item = Resp2Frame;

  fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
    resp2_decode_frame(self, src)
  }
}
