use crate::transport::{build_query, ExchangeError, Transport};
use hickory_client::op::Message;
use hickory_client::rr::{Name, RecordType};
use log::debug;
use std::net::SocketAddr;

/// Outcome of one exchange. Only `TimedOut` earns another attempt.
#[derive(Debug)]
pub enum Attempt {
    Answered(Message),
    TimedOut(ExchangeError),
    Failed(ExchangeError),
}

impl From<Result<Message, ExchangeError>> for Attempt {
    fn from(res: Result<Message, ExchangeError>) -> Self {
        match res {
            Ok(message) => Attempt::Answered(message),
            Err(e) if e.is_timeout() => Attempt::TimedOut(e),
            Err(e) => Attempt::Failed(e),
        }
    }
}

/// Queries a server directly, without recursion, retrying on timeout.
pub struct Prober<'a> {
    transport: &'a dyn Transport,
}

impl<'a> Prober<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub async fn query(&self, message: &Message, server: SocketAddr, max_attempts: u32) -> Result<Message, ExchangeError> {
        let mut attempt = 1;
        loop {
            match Attempt::from(self.transport.exchange(message, server).await) {
                Attempt::Answered(response) => return Ok(response),
                Attempt::Failed(e) => return Err(e),
                Attempt::TimedOut(e) if attempt >= max_attempts => return Err(e),
                Attempt::TimedOut(_) => {
                    debug!("{}: attempt {}/{} timed out", server, attempt, max_attempts);
                    attempt += 1;
                }
            }
        }
    }
}

/// SOA query for `zone` with recursion disabled.
pub fn soa_query(zone: &Name) -> Message {
    build_query(zone, RecordType::SOA, false)
}
