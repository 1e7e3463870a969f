//! Request dispatcher (§4.K): a fixed-size worker pool draws requests from
//! a [`transport::Frontend`] through a broker that hands each request to
//! whichever worker has been idle longest.
//!
//! The original's LRU broker (`Daemon.cpp`'s `ROUTER`/`ROUTER` poll loop)
//! hands a request to whichever worker announced `READY` longest ago. This
//! dispatcher builds the same idle-worker FIFO explicitly instead of
//! approximating it: every worker has its own private request channel, and
//! announces readiness by sending its id on one shared `mpsc` channel whose
//! single consumer is the broker thread. `mpsc`'s queue preserves send
//! order, so the broker's `ready_rx.recv()` always returns the
//! longest-idle worker first; it then pulls the next request off
//! `frontend` and routes it to that worker's channel. No worker ever
//! contends with another for a lock on the work queue.

pub mod transport;
pub mod worker;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::instrument;

use crate::db::Database;

pub use transport::{ClientId, Frontend};

/// A fixed pool of worker threads plus the broker thread that feeds them,
/// in front of a [`Frontend`].
pub struct Dispatcher {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawn `workers` worker threads and one broker thread. The broker
    /// pulls `(ClientId, request bytes)` pairs from `frontend` and hands
    /// each to the worker that has been idle longest, until the frontend's
    /// channel closes.
    #[instrument(skip(frontend, db))]
    pub fn run<F: Frontend + 'static>(frontend: Arc<F>, db: Arc<Database>, workers: usize) -> Dispatcher {
        let workers = workers.max(1);
        let (ready_tx, ready_rx) = mpsc::channel::<usize>();
        let mut req_txs = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers + 1);

        for worker_id in 0..workers {
            let (req_tx, req_rx) = mpsc::channel::<(ClientId, Vec<u8>)>();
            req_txs.push(req_tx);
            let frontend = Arc::clone(&frontend);
            let db = Arc::clone(&db);
            let ready_tx = ready_tx.clone();
            handles.push(thread::spawn(move || worker_loop(worker_id, ready_tx, req_rx, frontend, db)));
        }
        drop(ready_tx);

        let broker_frontend = Arc::clone(&frontend);
        handles.push(thread::spawn(move || broker_loop(broker_frontend, ready_rx, req_txs)));

        Dispatcher { handles }
    }

    /// Block until the broker and every worker thread exit (the
    /// frontend's channel closed, e.g. on shutdown).
    pub fn join(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

/// Matches idle-worker announcements to incoming requests in strict FIFO
/// order (§4.K). Returning — on a closed frontend or a dead worker channel
/// — drops `req_txs`, which closes every worker's `req_rx` and lets them
/// exit in turn.
fn broker_loop<F: Frontend>(
    frontend: Arc<F>,
    ready_rx: Receiver<usize>,
    req_txs: Vec<Sender<(ClientId, Vec<u8>)>>,
) {
    loop {
        let worker_id = match ready_rx.recv() {
            Ok(id) => id,
            Err(_) => return,
        };
        let (client, payload) = match frontend.recv_request() {
            Ok(pair) => pair,
            Err(_) => return,
        };
        if req_txs[worker_id].send((client, payload)).is_err() {
            return;
        }
    }
}

fn worker_loop<F: Frontend>(
    worker_id: usize,
    ready_tx: Sender<usize>,
    req_rx: Receiver<(ClientId, Vec<u8>)>,
    frontend: Arc<F>,
    db: Arc<Database>,
) {
    loop {
        if ready_tx.send(worker_id).is_err() {
            return;
        }
        let (client, payload) = match req_rx.recv() {
            Ok(pair) => pair,
            Err(_) => return,
        };
        let request = String::from_utf8_lossy(&payload).into_owned();
        let reply = worker::handle_request(&db, client.conn_id(), &request);
        if frontend.send_reply(client, reply.into_bytes()).is_err() {
            return;
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
