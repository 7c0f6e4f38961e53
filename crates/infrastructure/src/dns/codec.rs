//! DNS wire codec (RFC 1035 §4)
//!
//! Boundary between raw datagrams and the domain model, built on
//! `hickory-proto`. Inbound decoding is strict: truncated wire data and
//! empty question sections are rejected before a query is constructed.

use super::wire;
use burrow_dns_application::ports::{MessageCodec, UpstreamAnswer};
use burrow_dns_domain::{ClientQuery, DnsQuestion, DomainError, RecordClass, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::SocketAddr;

#[derive(Default)]
pub struct WireCodec;

impl WireCodec {
    pub fn new() -> Self {
        Self
    }
}

impl MessageCodec for WireCodec {
    fn decode(&self, bytes: &[u8], client_addr: SocketAddr) -> Result<ClientQuery, DomainError> {
        let message =
            Message::from_vec(bytes).map_err(|e| DomainError::MalformedQuery(e.to_string()))?;

        if message.queries().is_empty() {
            return Err(DomainError::EmptyQuestion);
        }

        let questions = message
            .queries()
            .iter()
            .map(|q| {
                DnsQuestion::new(
                    q.name().to_utf8(),
                    RecordType::from_u16(u16::from(q.query_type())),
                    RecordClass::from_u16(u16::from(q.query_class())),
                )
            })
            .collect();

        Ok(ClientQuery::new(
            message.id(),
            questions,
            client_addr,
            message.recursion_desired(),
        ))
    }

    fn encode_answer(
        &self,
        answer: &UpstreamAnswer,
        client_id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        let mut message = answer.message.clone();
        let mut header = *message;
        header.set_id(client_id);
        message.set_header(header);
        wire::serialize_message(&message)
    }

    fn encode_failure(
        &self,
        query: &ClientQuery,
        code: ResponseCode,
    ) -> Result<Vec<u8>, DomainError> {
        let mut message = Message::new(query.id, MessageType::Response, OpCode::Query);
        message.set_response_code(code);
        message.set_recursion_desired(query.recursion_desired);
        message.set_recursion_available(true);

        for question in &query.questions {
            message.add_query(wire::to_wire_question(question)?);
        }

        wire::serialize_message(&message)
    }
}
