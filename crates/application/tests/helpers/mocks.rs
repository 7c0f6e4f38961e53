#![allow(dead_code)]

use async_trait::async_trait;
use burrow_dns_application::ports::{MessageCodec, UpstreamAnswer, UpstreamClient};
use burrow_dns_domain::{ClientQuery, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

pub struct MockUpstreamClient {
    addr: SocketAddr,
    response: Mutex<Option<Result<UpstreamAnswer, DomainError>>>,
    delay: Mutex<Option<Duration>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self {
            addr: "198.51.100.1:53".parse().unwrap(),
            response: Mutex::new(None),
            delay: Mutex::new(None),
        }
    }

    pub fn set_answer(&self, upstream_id: u16) {
        let message = Message::new(upstream_id, MessageType::Response, OpCode::Query);
        let answer = UpstreamAnswer::from_message(message, upstream_id);
        *self.response.lock().unwrap() = Some(Ok(answer));
    }

    pub fn set_error(&self, error: DomainError) {
        *self.response.lock().unwrap() = Some(Err(error));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn timeout_error(&self) -> DomainError {
        DomainError::UpstreamTimeout {
            upstream: self.addr.to_string(),
        }
    }

    pub fn transport_error(&self) -> DomainError {
        DomainError::Transport {
            upstream: self.addr.to_string(),
            detail: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn forward(&self, _query: &ClientQuery) -> Result<UpstreamAnswer, DomainError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.response
            .lock()
            .unwrap()
            .clone()
            .expect("mock upstream response not configured")
    }

    fn upstream_addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Records every encode call so tests can assert which path ran and
/// which transaction ID the reply was stamped with.
pub struct MockCodec {
    pub encoded_answers: Mutex<Vec<u16>>,
    pub encoded_failures: Mutex<Vec<(u16, ResponseCode)>>,
    fail_encoding: Mutex<bool>,
}

impl MockCodec {
    pub fn new() -> Self {
        Self {
            encoded_answers: Mutex::new(Vec::new()),
            encoded_failures: Mutex::new(Vec::new()),
            fail_encoding: Mutex::new(false),
        }
    }

    pub fn fail_encoding(&self) {
        *self.fail_encoding.lock().unwrap() = true;
    }

    pub fn answer_ids(&self) -> Vec<u16> {
        self.encoded_answers.lock().unwrap().clone()
    }

    pub fn failure_calls(&self) -> Vec<(u16, ResponseCode)> {
        self.encoded_failures.lock().unwrap().clone()
    }
}

impl MessageCodec for MockCodec {
    fn decode(&self, _bytes: &[u8], _client_addr: SocketAddr) -> Result<ClientQuery, DomainError> {
        Err(DomainError::MalformedQuery(
            "mock codec does not decode".to_string(),
        ))
    }

    fn encode_answer(
        &self,
        _answer: &UpstreamAnswer,
        client_id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        if *self.fail_encoding.lock().unwrap() {
            return Err(DomainError::EncodeFailure("mock encode failure".to_string()));
        }
        self.encoded_answers.lock().unwrap().push(client_id);
        Ok(client_id.to_be_bytes().to_vec())
    }

    fn encode_failure(
        &self,
        query: &ClientQuery,
        code: ResponseCode,
    ) -> Result<Vec<u8>, DomainError> {
        if *self.fail_encoding.lock().unwrap() {
            return Err(DomainError::EncodeFailure("mock encode failure".to_string()));
        }
        self.encoded_failures.lock().unwrap().push((query.id, code));
        Ok(query.id.to_be_bytes().to_vec())
    }
}
