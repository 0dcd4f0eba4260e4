use crate::transport::{ExchangeError, Transport};
use async_trait::async_trait;
use hickory_client::op::{Message, MessageType};
use log::debug;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

const MAX_RECEIVE_SIZE: usize = 4096;
/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Plain UDP transport, one ephemeral socket per exchange.
#[derive(Clone, Debug)]
pub struct UdpTransport {
    timeout: Duration,
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(&self, request: &Message, server: SocketAddr) -> Result<Message, ExchangeError> {
        let local: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(server).await?;
        socket.send(&request.to_vec()?).await?;
        let now = Instant::now();
        let deadline = now.checked_add(self.timeout).unwrap_or(now + FAR_FUTURE);
        let mut buf = vec![0u8; MAX_RECEIVE_SIZE];
        loop {
            let len = match timeout_at(deadline, socket.recv(&mut buf)).await {
                Ok(res) => res?,
                Err(_) => return Err(ExchangeError::Timeout),
            };
            let response = Message::from_vec(&buf[..len])?;
            if response.id() != request.id() {
                debug!("{}: discarding reply with id {} (expected {})", server, response.id(), request.id());
                continue;
            }
            if response.message_type() != MessageType::Response {
                return Err(ExchangeError::Mismatch(request.id()));
            }
            return Ok(response);
        }
    }
}
