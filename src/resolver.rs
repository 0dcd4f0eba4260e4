use crate::transport::{build_query, Transport};
use hickory_client::op::{Message, ResponseCode};
use hickory_client::rr::{Name, RecordType};
use log::debug;
use std::net::SocketAddr;
use thiserror::Error;

pub mod conf;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No name server to answer the question")]
    NoAnswer,
}

/// Client for the host's recursive resolvers. Tries each one in order and
/// stops at the first definitive answer (NOERROR or NXDOMAIN).
pub struct LocalResolver<'a> {
    transport: &'a dyn Transport,
    servers: Vec<SocketAddr>,
}

impl<'a> LocalResolver<'a> {
    pub fn new(transport: &'a dyn Transport, servers: Vec<SocketAddr>) -> Self {
        Self { transport, servers }
    }

    pub async fn resolve(&self, name: &Name, record_type: RecordType) -> Result<Message, ResolveError> {
        let request = build_query(name, record_type, true);
        for server in &self.servers {
            match self.transport.exchange(&request, *server).await {
                Ok(response) => match response.response_code() {
                    ResponseCode::NoError | ResponseCode::NXDomain => return Ok(response),
                    code => debug!("{} answered {} for {} {}, trying next", server, code, name, record_type),
                },
                Err(e) => debug!("{} failed for {} {}: {}, trying next", server, name, record_type, e),
            }
        }
        Err(ResolveError::NoAnswer)
    }
}
