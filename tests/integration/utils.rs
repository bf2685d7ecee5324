#![allow(dead_code)]

use bytes::{Bytes, BytesMut};
use fred_sentinel::{error::RedisError, types::Server};
use futures::Future;
use maplit::hashmap;
use parking_lot::Mutex;
use redis_protocol::resp2::{
  decode::decode_bytes_mut,
  encode::extend_encode,
  types::BytesFrame as Resp2Frame,
};
use std::{
  collections::HashMap,
  str,
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
  },
  time::Duration,
};
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::{TcpListener, TcpStream},
  task::JoinHandle,
  time::sleep,
};

/// The service name used by the default fake sentinel.
pub const SERVICE_NAME: &str = "redis-sentinel-main";

#[derive(Debug, Default)]
struct State {
  silent:      bool,
  delay_first: Option<Duration>,
  delayed:     AtomicBool,
  connections: AtomicUsize,
  masters:     Mutex<Vec<Vec<(String, String)>>>,
  commands:    Mutex<Vec<Vec<String>>>,
}

impl State {
  fn has_master(&self, name: &str) -> bool {
    self
      .masters
      .lock()
      .iter()
      .any(|record| record.iter().any(|(k, v)| k == "name" && v == name))
  }

  fn reply(&self, args: &[String]) -> Resp2Frame {
    let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    match args.as_slice() {
      ["PING"] => Resp2Frame::SimpleString(Bytes::from_static(b"PONG")),
      ["SENTINEL", "MASTERS"] => Resp2Frame::Array(
        self
          .masters
          .lock()
          .iter()
          .map(|record| {
            Resp2Frame::Array(
              record
                .iter()
                .flat_map(|(k, v)| {
                  vec![
                    Resp2Frame::BulkString(Bytes::from(k.clone())),
                    Resp2Frame::BulkString(Bytes::from(v.clone())),
                  ]
                })
                .collect(),
            )
          })
          .collect(),
      ),
      ["SENTINEL", "FAILOVER", name] => {
        if self.has_master(name) {
          Resp2Frame::SimpleString(Bytes::from_static(b"OK"))
        } else {
          Resp2Frame::Error("ERR No such master with that name".into())
        }
      },
      _ => Resp2Frame::Error("ERR unknown command".into()),
    }
  }
}

/// A sentinel node speaking RESP2 on a local port.
pub struct FakeSentinel {
  server: Server,
  state:  Arc<State>,
  task:   JoinHandle<()>,
}

impl Drop for FakeSentinel {
  fn drop(&mut self) {
    self.task.abort();
  }
}

impl FakeSentinel {
  /// Start a sentinel that monitors the provided masters, in order.
  pub async fn start(masters: Vec<HashMap<&'static str, String>>) -> FakeSentinel {
    FakeSentinel::start_with(masters, false, None).await
  }

  /// Start a sentinel that accepts connections and reads commands but never replies.
  pub async fn silent() -> FakeSentinel {
    FakeSentinel::start_with(Vec::new(), true, None).await
  }

  /// Start a sentinel that holds its first reply for `delay` before writing it.
  pub async fn delayed(masters: Vec<HashMap<&'static str, String>>, delay: Duration) -> FakeSentinel {
    FakeSentinel::start_with(masters, false, Some(delay)).await
  }

  async fn start_with(
    masters: Vec<HashMap<&'static str, String>>,
    silent: bool,
    delay_first: Option<Duration>,
  ) -> FakeSentinel {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to read local addr").port();
    let masters: Vec<Vec<(String, String)>> = masters
      .into_iter()
      .map(|record| {
        let mut record: Vec<(String, String)> = record.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
        record.sort();
        record
      })
      .collect();
    let state = Arc::new(State {
      silent,
      delay_first,
      delayed: AtomicBool::new(false),
      connections: AtomicUsize::new(0),
      masters: Mutex::new(masters),
      commands: Mutex::new(Vec::new()),
    });

    let _state = state.clone();
    let task = tokio::spawn(async move {
      while let Ok((socket, _)) = listener.accept().await {
        _state.connections.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(handle_connection(socket, _state.clone()));
      }
    });

    FakeSentinel {
      server: Server::new("127.0.0.1", port),
      state,
      task,
    }
  }

  pub fn server(&self) -> Server {
    self.server.clone()
  }

  /// The number of connections accepted so far.
  pub fn connections(&self) -> usize {
    self.state.connections.load(Ordering::SeqCst)
  }

  /// Read the commands received so far, as lists of strings.
  pub fn commands(&self) -> Vec<Vec<String>> {
    self.state.commands.lock().clone()
  }

  /// Read the commands received so far, not including `PING`.
  pub fn sentinel_commands(&self) -> Vec<Vec<String>> {
    self
      .commands()
      .into_iter()
      .filter(|args| args.first().map(|s| s.as_str()) != Some("PING"))
      .collect()
  }
}

fn frame_to_args(frame: Resp2Frame) -> Vec<String> {
  match frame {
    Resp2Frame::Array(frames) => frames
      .into_iter()
      .filter_map(|frame| match frame {
        Resp2Frame::BulkString(b) | Resp2Frame::SimpleString(b) => str::from_utf8(&b).ok().map(|s| s.to_owned()),
        _ => None,
      })
      .collect(),
    _ => Vec::new(),
  }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<State>) {
  let mut buf = BytesMut::new();

  loop {
    match socket.read_buf(&mut buf).await {
      Ok(0) | Err(_) => return,
      Ok(_) => {},
    };

    while let Ok(Some((frame, _, _))) = decode_bytes_mut(&mut buf) {
      let args = frame_to_args(frame);
      state.commands.lock().push(args.clone());
      if state.silent {
        continue;
      }

      if let Some(delay) = state.delay_first {
        if !state.delayed.swap(true, Ordering::SeqCst) {
          sleep(delay).await;
        }
      }

      let mut out = BytesMut::new();
      if extend_encode(&mut out, &state.reply(&args)).is_err() {
        return;
      }
      if socket.write_all(&out).await.is_err() {
        return;
      }
    }
  }
}

/// Bind and drop a listener, returning an address that refuses connections.
pub async fn closed_server() -> Server {
  let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener");
  let port = listener.local_addr().expect("Failed to read local addr").port();
  drop(listener);

  Server::new("127.0.0.1", port)
}

/// The masters reported by the default fake sentinel.
pub fn default_masters() -> Vec<HashMap<&'static str, String>> {
  vec![
    hashmap! {
      "name" => SERVICE_NAME.to_owned(),
      "ip" => "10.0.0.1".to_owned(),
      "port" => "6379".to_owned(),
      "runid" => "4ac2d6e3f8c1b0a9".to_owned(),
      "flags" => "master".to_owned(),
      "role-reported" => "master".to_owned(),
      "num-slaves" => "2".to_owned(),
      "num-other-sentinels" => "2".to_owned(),
      "quorum" => "2".to_owned(),
    },
    hashmap! {
      "name" => "redis-sentinel-other".to_owned(),
      "ip" => "10.0.0.2".to_owned(),
      "port" => "6380".to_owned(),
      "flags" => "master,s_down".to_owned(),
      "num-slaves" => "0".to_owned(),
      "quorum" => "1".to_owned(),
    },
  ]
}

pub async fn run_sentinel<F, Fut>(func: F)
where
  F: Fn(FakeSentinel) -> Fut,
  Fut: Future<Output = Result<(), RedisError>>,
{
  let sentinel = FakeSentinel::start(default_masters()).await;

  if let Err(e) = func(sentinel).await {
    panic!("{:?}", e);
  }
}

macro_rules! sentinel_test(
  ($module:tt, $name:tt) => {
    #[tokio::test(flavor = "multi_thread")]
    async fn $name() {
      let _ = pretty_env_logger::try_init();
      crate::integration::utils::run_sentinel(crate::integration::$module::$name).await;
    }
  }
);
