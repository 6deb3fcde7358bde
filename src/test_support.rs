//! Loopback HTTP server for async tests.
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

pub(crate) struct TestServer {
    pub(crate) base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    /// Request targets (`/path?query`) seen so far, in arrival order.
    pub(crate) fn request_targets(&self) -> Result<Vec<String>, String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .map_err(|err| format!("request log poisoned: {}", err))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Answers every request with `200 OK` and body `OK`.
pub(crate) fn spawn_http_server() -> Result<TestServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let requests = Arc::new(Mutex::new(Vec::new()));
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let log = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let log = Arc::clone(&log);
                    thread::spawn(move || handle_client(stream, &log));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        requests,
        shutdown: shutdown_tx,
        thread: Some(handle),
    })
}

fn handle_client(mut stream: TcpStream, log: &Mutex<Vec<String>>) {
    let mut buffer = [0u8; 4096];
    let read = match stream.read(&mut buffer) {
        Ok(read) => read,
        Err(_) => return,
    };
    let head = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default());
    if let Some(target) = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        && let Ok(mut requests) = log.lock()
    {
        requests.push(target.to_owned());
    }
    if stream
        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK")
        .is_err()
    {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}
