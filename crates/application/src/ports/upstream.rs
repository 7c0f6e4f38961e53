use async_trait::async_trait;
use burrow_dns_domain::{ClientQuery, DomainError};
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;

/// The correlated reply from the upstream resolver for one exchange.
///
/// Carries the decoded message as the reply payload plus the summary
/// fields the use case logs and tests assert on.
#[derive(Debug, Clone)]
pub struct UpstreamAnswer {
    pub message: Message,
    pub response_code: ResponseCode,
    pub authoritative: bool,
    pub answer_count: usize,
    /// Transaction ID used on the outbound leg; not the client's ID.
    pub upstream_id: u16,
}

impl UpstreamAnswer {
    pub fn from_message(message: Message, upstream_id: u16) -> Self {
        let response_code = message.response_code();
        let authoritative = message.authoritative();
        let answer_count = message.answers().len();
        Self {
            message,
            response_code,
            authoritative,
            answer_count,
            upstream_id,
        }
    }
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Forward one query to the configured upstream and wait for the
    /// correlated reply, up to the client's forward timeout.
    async fn forward(&self, query: &ClientQuery) -> Result<UpstreamAnswer, DomainError>;

    /// Address queries are forwarded to, for logs.
    fn upstream_addr(&self) -> SocketAddr;
}
