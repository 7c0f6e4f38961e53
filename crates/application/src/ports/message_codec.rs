use super::upstream::UpstreamAnswer;
use burrow_dns_domain::{ClientQuery, DomainError};
use hickory_proto::op::ResponseCode;
use std::net::SocketAddr;

/// Wire-format boundary. Decoding and encoding are pure CPU work, so the
/// port is synchronous; the adapter supplies the actual DNS codec.
pub trait MessageCodec: Send + Sync {
    /// Decode one inbound datagram into a query. Rejects truncated or
    /// malformed wire data and messages with an empty question section.
    fn decode(&self, bytes: &[u8], client_addr: SocketAddr) -> Result<ClientQuery, DomainError>;

    /// Encode a correlated upstream answer, restamped with the client's
    /// own transaction ID so it can match the reply to its request.
    fn encode_answer(
        &self,
        answer: &UpstreamAnswer,
        client_id: u16,
    ) -> Result<Vec<u8>, DomainError>;

    /// Synthesize a reply (SERVFAIL and friends) for a query the
    /// forwarder could not answer, echoing the question section.
    fn encode_failure(
        &self,
        query: &ClientQuery,
        code: ResponseCode,
    ) -> Result<Vec<u8>, DomainError>;
}
