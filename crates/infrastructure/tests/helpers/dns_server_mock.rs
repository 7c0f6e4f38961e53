#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock upstream reacts to each query it receives.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Echo the query back as a response with one A record.
    Answer,
    /// Answer, but only after the given delay.
    DelayedAnswer(Duration),
    /// Send a response with a wrong transaction ID first, then the
    /// correct one.
    WrongIdThenAnswer,
    /// Never respond.
    Silent,
    /// Respond with bytes that do not parse as a DNS message.
    Garbage,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<(Self, SocketAddr), std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let local_addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&received);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let query = buf[..len].to_vec();
                            captured.lock().unwrap().push(query.clone());

                            match behavior {
                                MockBehavior::Answer => {
                                    let response = Self::build_mock_response(&query);
                                    let _ = socket.send_to(&response, peer).await;
                                }
                                MockBehavior::DelayedAnswer(delay) => {
                                    tokio::time::sleep(delay).await;
                                    let response = Self::build_mock_response(&query);
                                    let _ = socket.send_to(&response, peer).await;
                                }
                                MockBehavior::WrongIdThenAnswer => {
                                    let mut wrong = Self::build_mock_response(&query);
                                    wrong[0] ^= 0xFF;
                                    let _ = socket.send_to(&wrong, peer).await;
                                    let response = Self::build_mock_response(&query);
                                    let _ = socket.send_to(&response, peer).await;
                                }
                                MockBehavior::Silent => {}
                                MockBehavior::Garbage => {
                                    let _ = socket.send_to(&[0xde, 0xad, 0xbe], peer).await;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok((
            Self {
                addr: local_addr,
                shutdown_tx: Some(shutdown_tx),
                received,
            },
            local_addr,
        ))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Raw queries this server has received so far.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }

    /// Minimal hand-built response: echo the header ID and question,
    /// flags NOERROR/RA, one A record pointing at 93.184.216.34.
    fn build_mock_response(query: &[u8]) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);

        response.push(0x81);
        response.push(0x80);

        // QDCOUNT copied from the query
        response.extend_from_slice(&query[4..6]);

        // ANCOUNT = 1
        response.extend_from_slice(&[0x00, 0x01]);

        // NSCOUNT, ARCOUNT = 0
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);

        // question section, verbatim
        if query.len() > 12 {
            response.extend_from_slice(&query[12..]);
        }

        response.extend_from_slice(&[
            0xc0, 0x0c, // name pointer to the question
            0x00, 0x01, // TYPE A
            0x00, 0x01, // CLASS IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04, // RDLENGTH
            93, 184, 216, 34,
        ]);

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
