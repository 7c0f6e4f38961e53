//! Request router: the accept loop and per-exchange dispatch.
//!
//! The loop is the only serialized point. It reads one datagram at a
//! time and hands each decoded query to an independent task; it never
//! waits on an exchange. Replies are written back through the shared
//! listening socket (datagram sends are atomic, concurrent writers
//! cannot interleave within one reply).

use burrow_dns_application::ports::MessageCodec;
use burrow_dns_application::use_cases::ForwardQueryUseCase;
use burrow_dns_domain::ClientQuery;
use hickory_proto::op::ResponseCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Maximum inbound datagram the listener reads. EDNS(0) payloads top out
/// here in practice.
const MAX_DATAGRAM_SIZE: usize = 4096;

pub struct Router {
    socket: Arc<UdpSocket>,
    use_case: Arc<ForwardQueryUseCase>,
    codec: Arc<dyn MessageCodec>,
    in_flight: Arc<Semaphore>,
    shutdown: CancellationToken,
    drain_grace: Duration,
}

impl Router {
    pub fn new(
        socket: Arc<UdpSocket>,
        use_case: Arc<ForwardQueryUseCase>,
        codec: Arc<dyn MessageCodec>,
        max_in_flight: usize,
        shutdown: CancellationToken,
        drain_grace: Duration,
    ) -> Self {
        Self {
            socket,
            use_case,
            codec,
            in_flight: Arc::new(Semaphore::new(max_in_flight)),
            shutdown,
            drain_grace,
        }
    }

    /// Run the accept loop until cancellation, then drain in-flight
    /// exchanges for up to the configured grace period.
    pub async fn run(self) {
        let tracker = TaskTracker::new();
        let mut recv_buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting queries");
                    break;
                }
                received = self.socket.recv_from(&mut recv_buf) => {
                    match received {
                        Ok((len, client_addr)) => {
                            self.dispatch(&recv_buf[..len], client_addr, &tracker);
                        }
                        Err(e) => {
                            error!(error = %e, "UDP recv error");
                        }
                    }
                }
            }
        }

        tracker.close();
        if tokio::time::timeout(self.drain_grace, tracker.wait())
            .await
            .is_err()
        {
            warn!(
                abandoned = tracker.len(),
                "Drain grace elapsed, abandoning in-flight exchanges"
            );
        }
    }

    fn dispatch(&self, datagram: &[u8], client_addr: SocketAddr, tracker: &TaskTracker) {
        let query = match self.codec.decode(datagram, client_addr) {
            Ok(query) => query,
            Err(e) => {
                // No reply: a malformed datagram carries no ID or
                // address we can trust.
                warn!(client = %client_addr, error = %e, "Dropping undecodable datagram");
                return;
            }
        };

        debug!(
            client = %client_addr,
            id = query.id,
            domain = %query.first_question().display_name(),
            record_type = %query.first_question().record_type,
            "Query received"
        );

        let permit = match Arc::clone(&self.in_flight).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    client = %client_addr,
                    id = query.id,
                    "In-flight cap reached, answering SERVFAIL"
                );
                self.refuse(query, tracker);
                return;
            }
        };

        let socket = Arc::clone(&self.socket);
        let use_case = Arc::clone(&self.use_case);
        tracker.spawn(async move {
            let client_addr = query.client_addr;
            if let Some(reply) = use_case.execute(query).await {
                if let Err(e) = socket.send_to(&reply, client_addr).await {
                    warn!(client = %client_addr, error = %e, "Failed to write reply");
                }
            }
            drop(permit);
        });
    }

    /// Overload answer, sent without occupying an in-flight slot.
    fn refuse(&self, query: ClientQuery, tracker: &TaskTracker) {
        match self.codec.encode_failure(&query, ResponseCode::ServFail) {
            Ok(reply) => {
                let socket = Arc::clone(&self.socket);
                let client_addr = query.client_addr;
                tracker.spawn(async move {
                    if let Err(e) = socket.send_to(&reply, client_addr).await {
                        warn!(client = %client_addr, error = %e, "Failed to write overload reply");
                    }
                });
            }
            Err(e) => error!(error = %e, "Failed to encode overload reply"),
        }
    }
}
