//! UDP upstream client (RFC 1035 §4.2.1)
//!
//! One ephemeral socket per exchange. The outbound leg always runs under
//! a locally assigned transaction ID so upstream-visible IDs never depend
//! on what concurrent clients happened to pick; the reply is correlated
//! by that ID and by the echoed question before it is accepted.

use super::wire;
use async_trait::async_trait;
use burrow_dns_application::ports::{UpstreamAnswer, UpstreamClient};
use burrow_dns_domain::{ClientQuery, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpUpstreamClient {
    upstream_addr: SocketAddr,
    timeout: Duration,
}

impl UdpUpstreamClient {
    pub fn new(upstream_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            upstream_addr,
            timeout,
        }
    }

    fn build_outbound(query: &ClientQuery, upstream_id: u16) -> Result<Vec<u8>, DomainError> {
        let mut message = Message::new(upstream_id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);

        for question in &query.questions {
            message.add_query(wire::to_wire_question(question)?);
        }

        wire::serialize_message(&message)
    }

    /// Defensive check on top of the ID match: the reply must echo the
    /// question we sent.
    fn echoes_question(query: &ClientQuery, reply: &Message) -> bool {
        let ours = query.first_question();
        reply.queries().first().is_some_and(|echoed| {
            echoed.name().to_utf8().eq_ignore_ascii_case(&ours.name)
                && u16::from(echoed.query_type()) == ours.record_type.to_u16()
        })
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::UpstreamTimeout {
            upstream: self.upstream_addr.to_string(),
        }
    }

    fn transport_error(&self, detail: impl Into<String>) -> DomainError {
        DomainError::Transport {
            upstream: self.upstream_addr.to_string(),
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl UpstreamClient for UdpUpstreamClient {
    async fn forward(&self, query: &ClientQuery) -> Result<UpstreamAnswer, DomainError> {
        let upstream_id = fastrand::u16(..);
        let outbound = Self::build_outbound(query, upstream_id)?;

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.upstream_addr.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.transport_error(format!("bind: {}", e)))?;

        let deadline = Instant::now() + self.timeout;

        timeout_at(deadline, socket.send_to(&outbound, self.upstream_addr))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.transport_error(format!("send: {}", e)))?;

        debug!(
            upstream = %self.upstream_addr,
            upstream_id = upstream_id,
            "Query forwarded"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        // Non-matching datagrams are discarded and the wait continues
        // until the deadline.
        loop {
            let (len, from) = timeout_at(deadline, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| self.timeout_error())?
                .map_err(|e| self.transport_error(format!("recv: {}", e)))?;

            if from.ip() != self.upstream_addr.ip() {
                warn!(
                    expected = %self.upstream_addr,
                    received_from = %from,
                    "Response from unexpected source, discarding"
                );
                continue;
            }

            let reply = Message::from_vec(&recv_buf[..len])
                .map_err(|e| DomainError::UpstreamDecode(e.to_string()))?;

            if reply.id() != upstream_id {
                debug!(
                    got = reply.id(),
                    want = upstream_id,
                    "Mismatched transaction ID, discarding"
                );
                continue;
            }

            if !Self::echoes_question(query, &reply) {
                debug!("Reply does not echo our question, discarding");
                continue;
            }

            debug!(
                upstream = %self.upstream_addr,
                rcode = ?reply.response_code(),
                answers = reply.answers().len(),
                "Correlated response received"
            );

            return Ok(UpstreamAnswer::from_message(reply, upstream_id));
        }
    }

    fn upstream_addr(&self) -> SocketAddr {
        self.upstream_addr
    }
}
