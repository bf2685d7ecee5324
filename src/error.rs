use bytes_utils::string::Utf8Error as BytesUtf8Error;
use redis_protocol::error::RedisProtocolError;
use std::{
  borrow::{Borrow, Cow},
  error::Error,
  fmt,
  io::Error as IoError,
  num::ParseIntError,
  str::Utf8Error,
  string::FromUtf8Error,
};
use url::ParseError;

/// An enum representing the type of error from a sentinel operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RedisErrorKind {
  /// Invalid or missing input supplied by the caller. These errors are always detected before any network call
  /// and are never retried.
  Config,
  /// Every configured sentinel failed its liveness probe.
  Discovery,
  /// An IO error with the underlying connection.
  IO,
  /// A timeout error.
  Timeout,
  /// A protocol error such as an invalid or unexpected frame from the server.
  Protocol,
  /// An operation was attempted on a connection after it was closed.
  Closed,
  /// An error reply from a sentinel node.
  Sentinel,
  /// A parser error.
  Parse,
  /// An invalid URL error.
  Url,
  /// An unknown error.
  Unknown,
}

impl RedisErrorKind {
  pub fn to_str(&self) -> &'static str {
    match *self {
      RedisErrorKind::Config => "Config Error",
      RedisErrorKind::Discovery => "Discovery Error",
      RedisErrorKind::IO => "IO Error",
      RedisErrorKind::Timeout => "Timeout Error",
      RedisErrorKind::Protocol => "Protocol Error",
      RedisErrorKind::Closed => "Closed Connection",
      RedisErrorKind::Sentinel => "Sentinel Error",
      RedisErrorKind::Parse => "Parse Error",
      RedisErrorKind::Url => "Url Error",
      RedisErrorKind::Unknown => "Unknown Error",
    }
  }
}

/// An error from a sentinel operation.
pub struct RedisError {
  /// Details about the specific error condition.
  details: Cow<'static, str>,
  /// The kind of error.
  kind:    RedisErrorKind,
}

impl Clone for RedisError {
  fn clone(&self) -> Self {
    RedisError::new(self.kind.clone(), self.details.clone())
  }
}

impl PartialEq for RedisError {
  fn eq(&self, other: &Self) -> bool {
    self.kind == other.kind && self.details == other.details
  }
}

impl Eq for RedisError {}

impl fmt::Debug for RedisError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Redis Error - kind: {:?}, details: {}", self.kind, self.details)
  }
}

impl fmt::Display for RedisError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.kind.to_str(), self.details)
  }
}

#[doc(hidden)]
impl From<RedisProtocolError> for RedisError {
  fn from(e: RedisProtocolError) -> Self {
    RedisError::new(RedisErrorKind::Protocol, format!("{}", e))
  }
}

#[doc(hidden)]
impl From<IoError> for RedisError {
  fn from(e: IoError) -> Self {
    RedisError::new(RedisErrorKind::IO, format!("{:?}", e))
  }
}

#[doc(hidden)]
impl From<ParseError> for RedisError {
  fn from(e: ParseError) -> Self {
    RedisError::new(RedisErrorKind::Url, format!("{:?}", e))
  }
}

#[doc(hidden)]
impl From<ParseIntError> for RedisError {
  fn from(_: ParseIntError) -> Self {
    RedisError::new(RedisErrorKind::Parse, "Invalid integer string.")
  }
}

#[doc(hidden)]
impl From<FromUtf8Error> for RedisError {
  fn from(_: FromUtf8Error) -> Self {
    RedisError::new(RedisErrorKind::Parse, "Invalid UTF-8 string.")
  }
}

#[doc(hidden)]
impl From<Utf8Error> for RedisError {
  fn from(_: Utf8Error) -> Self {
    RedisError::new(RedisErrorKind::Parse, "Invalid UTF-8 string.")
  }
}

#[doc(hidden)]
impl<S> From<BytesUtf8Error<S>> for RedisError {
  fn from(e: BytesUtf8Error<S>) -> Self {
    e.utf8_error().into()
  }
}

impl RedisError {
  /// Create a new error with the provided details.
  pub fn new<T>(kind: RedisErrorKind, details: T) -> RedisError
  where
    T: Into<Cow<'static, str>>,
  {
    RedisError {
      kind,
      details: details.into(),
    }
  }

  /// Read the type of error without any associated data.
  pub fn kind(&self) -> &RedisErrorKind {
    &self.kind
  }

  /// Read details about the error.
  pub fn details(&self) -> &str {
    self.details.borrow()
  }

  /// Create a new parse error with the provided details.
  pub(crate) fn new_parse<T>(details: T) -> Self
  where
    T: Into<Cow<'static, str>>,
  {
    RedisError::new(RedisErrorKind::Parse, details)
  }

  /// Create a new error indicating the connection was already closed.
  pub(crate) fn new_closed() -> Self {
    RedisError::new(RedisErrorKind::Closed, "Connection already closed.")
  }

  /// Whether the error is a `Config` error.
  pub fn is_config(&self) -> bool {
    matches!(self.kind, RedisErrorKind::Config)
  }

  /// Whether the error is a `Discovery` error.
  pub fn is_discovery(&self) -> bool {
    matches!(self.kind, RedisErrorKind::Discovery)
  }

  /// Whether the error is a `Closed` error.
  pub fn is_closed(&self) -> bool {
    matches!(self.kind, RedisErrorKind::Closed)
  }

  /// Whether the error came from the network layer of an open connection.
  ///
  /// Callers that want to recover from these typically run discovery again with
  /// [sentinel_commands](crate::router::SentinelRouter::sentinel_commands).
  pub fn is_transport(&self) -> bool {
    matches!(
      self.kind,
      RedisErrorKind::IO | RedisErrorKind::Timeout | RedisErrorKind::Protocol
    )
  }
}

impl Error for RedisError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    None
  }
}
