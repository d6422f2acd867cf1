//! A local TCP server that speaks the routing engine line protocol.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Background server answering every request line with a fixed document.
///
/// The accept loop is aborted when the stub is dropped.
pub struct EngineStub {
    addr: SocketAddr,
    served: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl EngineStub {
    /// Start a stub on an ephemeral localhost port.
    pub async fn start(answer: serde_json::Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind engine stub");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let served = Arc::new(AtomicUsize::new(0));
        let line = format!("{}\n", answer);

        let counter = served.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let line = line.clone();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut request = String::new();
                    // Counted before answering so callers see it once the reply lands.
                    if matches!(BufReader::new(read).read_line(&mut request).await, Ok(n) if n > 0) {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _ = write.write_all(line.as_bytes()).await;
                    }
                });
            }
        });

        Self {
            addr,
            served,
            handle,
        }
    }

    /// Target string for a routing client, `tcp://127.0.0.1:<port>`.
    pub fn target(&self) -> String {
        format!("tcp://{}", self.addr)
    }

    /// Number of requests answered so far.
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl Drop for EngineStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
