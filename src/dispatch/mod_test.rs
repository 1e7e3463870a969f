use super::*;
use crate::config::DbConfig;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex as StdMutex;

/// An in-process [`Frontend`] for tests: requests are pushed directly onto
/// a queue instead of arriving over a socket (per AS.6, the dispatcher
/// must be testable without a live TCP connection).
struct FakeFrontend {
    inbox: StdMutex<VecDeque<(ClientId, Vec<u8>)>>,
}

impl FakeFrontend {
    fn push(&self, request: &str) -> mpsc::Receiver<Vec<u8>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let client = ClientId::new(reply_tx, "conn-fake".to_string());
        self.inbox.lock().unwrap().push_back((client, request.as_bytes().to_vec()));
        reply_rx
    }
}

impl Frontend for FakeFrontend {
    fn recv_request(&self) -> crate::Result<(ClientId, Vec<u8>)> {
        self.inbox
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| crate::Error::ProtocolViolation("no more fake requests".to_string()))
    }

    fn send_reply(&self, client: ClientId, payload: Vec<u8>) -> crate::Result<()> {
        client.send(payload)
    }
}

#[test]
fn dispatcher_serves_one_request_through_a_fake_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path(), DbConfig::new()).unwrap());
    let frontend = Arc::new(FakeFrontend { inbox: StdMutex::new(VecDeque::new()) });
    let reply_rx = frontend.push("status;");

    let dispatcher = Dispatcher::run(frontend, db, 1);
    let reply = reply_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    assert!(String::from_utf8(reply).unwrap().starts_with("OK\n"));
    dispatcher.join();
}

/// §8 scenario S6: with 3 workers and 6 sequential requests, each worker
/// should pick up exactly 2 requests — the idle-worker FIFO hands every
/// request to whoever has been idle longest, so no worker starves and none
/// is handed a second request while another sits idle.
#[test]
fn three_workers_six_requests_distribute_evenly_by_idle_fifo() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path(), DbConfig::new()).unwrap());
    let frontend = Arc::new(FakeFrontend { inbox: StdMutex::new(VecDeque::new()) });

    let mut reply_rxs = Vec::new();
    for _ in 0..6 {
        reply_rxs.push(frontend.push("status;"));
    }

    let dispatcher = Dispatcher::run(frontend, db, 3);
    for rx in reply_rxs {
        let reply = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(String::from_utf8(reply).unwrap().starts_with("OK\n"));
    }
    dispatcher.join();
}
