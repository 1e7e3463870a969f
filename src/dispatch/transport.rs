//! Wire transport (§AS.6): length-prefixed frames over TCP, behind a
//! narrow `Frontend` trait so the LRU dispatch loop is transport-agnostic
//! and testable with an in-process fake. Mirrors the original's ZeroMQ
//! ROUTER/ROUTER `[client_id][empty][payload]` framing at the byte level
//! without requiring a ZeroMQ binding.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, warn};

use crate::{err_at, Error, Result};

/// The reply channel for one in-flight request, tagged with a stable
/// per-connection label used for `status`'s `conn` column. Because this
/// transport is strictly request/reply per connection, routing a reply
/// back is just sending on that request's own reply channel.
pub struct ClientId(Sender<Vec<u8>>, String);

impl ClientId {
    pub fn conn_id(&self) -> &str {
        &self.1
    }

    /// Wrap an existing reply channel as a `ClientId`. Used by
    /// [`TcpFrontend`]'s connection loop and by in-process fake frontends
    /// in tests (§AS.6: the dispatcher must be testable without a socket).
    pub fn new(reply_tx: Sender<Vec<u8>>, conn_id: String) -> ClientId {
        ClientId(reply_tx, conn_id)
    }

    /// Send a reply payload directly on this client's channel. Any
    /// [`Frontend`] implementation can delegate `send_reply` to this.
    pub fn send(&self, payload: Vec<u8>) -> Result<()> {
        self.0.send(payload).map_err(|_| {
            Error::ProtocolViolation("connection dropped before reply could be sent".to_string())
        })
    }
}

/// A request/reply transport the dispatcher (§4.K) pulls work from.
pub trait Frontend: Send + Sync {
    fn recv_request(&self) -> Result<(ClientId, Vec<u8>)>;
    fn send_reply(&self, client: ClientId, payload: Vec<u8>) -> Result<()>;
}

/// A `TcpListener`-backed frontend: one acceptor thread, one reader/writer
/// thread per connection, feeding a single shared request queue. Only the
/// dispatcher's broker thread ever calls `recv_request` — the idle-worker
/// FIFO (§4.K) lives there, not in this transport — so the `Mutex` below
/// exists purely for interior mutability, not for fairness.
pub struct TcpFrontend {
    rx: Mutex<Receiver<(ClientId, Vec<u8>)>>,
}

impl TcpFrontend {
    pub fn bind(addr: &str) -> Result<TcpFrontend> {
        let listener = err_at!(IoError, TcpListener::bind(addr), "binding {}", addr)?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || accept_loop(listener, tx));
        Ok(TcpFrontend { rx: Mutex::new(rx) })
    }
}

impl Frontend for TcpFrontend {
    fn recv_request(&self) -> Result<(ClientId, Vec<u8>)> {
        let guard = self.rx.lock().unwrap();
        guard.recv().map_err(|_| Error::ProtocolViolation("frontend channel closed".to_string()))
    }

    fn send_reply(&self, client: ClientId, payload: Vec<u8>) -> Result<()> {
        client.send(payload)
    }
}

fn accept_loop(listener: TcpListener, tx: Sender<(ClientId, Vec<u8>)>) {
    let next_conn = AtomicU64::new(1);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let tx = tx.clone();
                let conn_id = format!("conn-{}", next_conn.fetch_add(1, Ordering::SeqCst));
                thread::spawn(move || connection_loop(stream, tx, conn_id));
            }
            Err(err) => warn!(%err, "accept failed"),
        }
    }
}

fn connection_loop(mut stream: TcpStream, tx: Sender<(ClientId, Vec<u8>)>, conn_id: String) {
    loop {
        let frame = match read_frame(&mut stream) {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(err) => {
                debug!(%err, "closing connection after read error");
                return;
            }
        };
        let (reply_tx, reply_rx) = mpsc::channel();
        if tx.send((ClientId::new(reply_tx, conn_id.clone()), frame)).is_err() {
            return;
        }
        match reply_rx.recv() {
            Ok(reply) => {
                if write_frame(&mut stream, &reply).is_err() {
                    return;
                }
            }
            Err(_) => return,
        }
    }
}

fn read_frame(stream: &mut TcpStream) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return err_at!(IoError, Err(err)),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut payload = vec![0u8; len];
    err_at!(IoError, stream.read_exact(&mut payload))?;
    Ok(Some(payload))
}

fn write_frame(stream: &mut TcpStream, payload: &[u8]) -> Result<()> {
    let len = (payload.len() as u32).to_be_bytes();
    err_at!(IoError, stream.write_all(&len))?;
    err_at!(IoError, stream.write_all(payload))?;
    Ok(())
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;
