use sluice_dns_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, write_with_length_prefix,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER: [u8; 4] = [93, 184, 216, 34];
pub const MOCK_TTL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// One A record for whatever was asked.
    Answer,
    /// TC set over UDP; the full answer is only available over TCP.
    Truncated,
    ServFail,
    /// Never replies.
    Silent,
    /// Replies with a mismatched transaction ID.
    WrongId,
    /// A mismatched-ID datagram first, then the real answer.
    StrayThenAnswer,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// UDP and TCP on the same ephemeral loopback port.
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = udp_queries.clone();
        let tcp_count = tcp_queries.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if behavior == MockBehavior::Silent {
                                continue;
                            }
                            if behavior == MockBehavior::StrayThenAnswer {
                                let stray = build_mock_response(&buf[..len], MockBehavior::WrongId);
                                let _ = socket.send_to(&stray, peer).await;
                            }
                            let response = build_mock_response(&buf[..len], behavior);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                if let Ok(query) = read_with_length_prefix(&mut stream).await {
                                    let response = build_mock_response(&query, MockBehavior::Answer);
                                    let _ = write_with_length_prefix(&mut stream, &response).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
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

/// Echo the question of a single-question query that carries no
/// additional records, and append the answer `behavior` asks for.
fn build_mock_response(query: &[u8], behavior: MockBehavior) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let mut response = Vec::with_capacity(512);

    let id = u16::from_be_bytes([query[0], query[1]]);
    let id = if behavior == MockBehavior::WrongId { !id } else { id };
    response.extend_from_slice(&id.to_be_bytes());

    let (flags, with_answer) = match behavior {
        MockBehavior::Answer
        | MockBehavior::WrongId
        | MockBehavior::StrayThenAnswer
        | MockBehavior::Silent => {
            ([0x81, 0x80], true)
        }
        MockBehavior::Truncated => ([0x83, 0x80], false),
        MockBehavior::ServFail => ([0x81, 0x82], false),
    };
    response.extend_from_slice(&flags);

    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(if with_answer { &[0x00, 0x01] } else { &[0x00, 0x00] });
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);

    response.extend_from_slice(&query[12..]);

    if with_answer {
        response.extend_from_slice(&[
            0xc0, 0x0c, // pointer to question name
            0x00, 0x01, // A
            0x00, 0x01, // IN
        ]);
        response.extend_from_slice(&MOCK_TTL.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x04]);
        response.extend_from_slice(&MOCK_ANSWER);
    }

    response
}
