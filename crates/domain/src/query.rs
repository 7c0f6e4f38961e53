use crate::question::DnsQuestion;
use std::net::SocketAddr;

/// One decoded inbound DNS request.
///
/// `client_addr` is the address the datagram arrived from and the sole
/// routing key for the reply; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct ClientQuery {
    pub id: u16,
    pub questions: Vec<DnsQuestion>,
    pub client_addr: SocketAddr,
    pub recursion_desired: bool,
}

impl ClientQuery {
    /// `questions` must be non-empty; the codec rejects empty question
    /// sections before a query is ever constructed.
    pub fn new(
        id: u16,
        questions: Vec<DnsQuestion>,
        client_addr: SocketAddr,
        recursion_desired: bool,
    ) -> Self {
        debug_assert!(!questions.is_empty());
        Self {
            id,
            questions,
            client_addr,
            recursion_desired,
        }
    }

    pub fn first_question(&self) -> &DnsQuestion {
        &self.questions[0]
    }
}
