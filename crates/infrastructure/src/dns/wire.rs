//! Shared hickory-proto assembly helpers for the codec and the upstream
//! client.

use burrow_dns_domain::{DnsQuestion, DomainError};
use hickory_proto::op::{Message, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub(crate) fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);

    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::EncodeFailure(e.to_string()))?;

    Ok(buf)
}

/// Rebuild a wire question from the domain triple.
pub(crate) fn to_wire_question(question: &DnsQuestion) -> Result<Query, DomainError> {
    let name = Name::from_utf8(&question.name)
        .map_err(|e| DomainError::InvalidName(format!("{}: {}", question.name, e)))?;

    let mut query = Query::new();
    query.set_name(name);
    query.set_query_type(RecordType::from(question.record_type.to_u16()));
    query.set_query_class(DNSClass::from(question.record_class.to_u16()));
    Ok(query)
}
