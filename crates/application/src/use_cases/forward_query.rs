use crate::ports::{MessageCodec, UpstreamClient};
use burrow_dns_domain::{ClientQuery, DomainError, Exchange};
use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Drives one exchange to a terminal state.
///
/// The upstream round trip either yields a correlated answer, which is
/// re-encoded under the client's original transaction ID, or a forward
/// error, which is recovered as a synthesized SERVFAIL so the client is
/// never left hanging on a healthy forwarder.
pub struct ForwardQueryUseCase {
    upstream: Arc<dyn UpstreamClient>,
    codec: Arc<dyn MessageCodec>,
    query_timeout: Duration,
}

impl ForwardQueryUseCase {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        codec: Arc<dyn MessageCodec>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            upstream,
            codec,
            query_timeout,
        }
    }

    /// Returns the reply bytes to write back to the client, or `None`
    /// when the exchange is abandoned (reply encoding failed).
    pub async fn execute(&self, query: ClientQuery) -> Option<Vec<u8>> {
        let question = query.first_question().clone();
        let mut exchange = Exchange::new(query, self.query_timeout);

        let encoded = match self.upstream.forward(exchange.query()).await {
            Ok(answer) => {
                exchange.set_upstream_id(answer.upstream_id);
                exchange.answer();
                info!(
                    domain = %question.display_name(),
                    record_type = %question.record_type,
                    client = %exchange.query().client_addr,
                    rcode = ?answer.response_code,
                    answers = answer.answer_count,
                    elapsed_ms = exchange.elapsed().as_millis() as u64,
                    "Query answered"
                );
                self.codec.encode_answer(&answer, exchange.query().id)
            }
            Err(err) if err.is_forward_error() => {
                if matches!(err, DomainError::UpstreamTimeout { .. }) {
                    exchange.time_out();
                } else {
                    exchange.fail();
                }
                warn!(
                    domain = %question.display_name(),
                    record_type = %question.record_type,
                    client = %exchange.query().client_addr,
                    upstream = %self.upstream.upstream_addr(),
                    state = %exchange.state(),
                    error = %err,
                    "Upstream exchange failed, answering SERVFAIL"
                );
                self.codec
                    .encode_failure(exchange.query(), ResponseCode::ServFail)
            }
            Err(err) => {
                exchange.fail();
                warn!(
                    domain = %question.display_name(),
                    client = %exchange.query().client_addr,
                    error = %err,
                    "Forwarding error, answering SERVFAIL"
                );
                self.codec
                    .encode_failure(exchange.query(), ResponseCode::ServFail)
            }
        };

        match encoded {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                error!(
                    client = %exchange.query().client_addr,
                    error = %err,
                    "Failed to encode reply, abandoning exchange"
                );
                None
            }
        }
    }
}
