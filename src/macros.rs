#![allow(unused_macros)]

macro_rules! _trace(
  ($inner:tt, $($arg:tt)*) => { {
    if log::log_enabled!(log::Level::Trace) {
      log::trace!("{}: {}", $inner.id(), format!($($arg)*));
    }
   } }
);

macro_rules! _debug(
  ($inner:tt, $($arg:tt)*) => { {
    if log::log_enabled!(log::Level::Debug) {
      log::debug!("{}: {}", $inner.id(), format!($($arg)*));
    }
   } }
);

macro_rules! _warn(
  ($inner:tt, $($arg:tt)*) => { {
    if log::log_enabled!(log::Level::Warn) {
      log::warn!("{}: {}", $inner.id(), format!($($arg)*));
    }
   } }
);

macro_rules! _error(
  ($inner:tt, $($arg:tt)*) => { {
    if log::log_enabled!(log::Level::Error) {
      log::error!("{}: {}", $inner.id(), format!($($arg)*));
    }
   } }
);

/// Create a `Bytes` argument from a static string without copying.
macro_rules! static_val(
  ($val:expr) => {
    crate::utils::static_bytes($val.as_bytes())
  }
);
