use async_trait::async_trait;
use hickory_client::op::{Message, MessageType, OpCode, Query};
use hickory_client::proto::error::ProtoError;
use hickory_client::rr::{DNSClass, Name, RecordType};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

pub mod udp;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("i/o timeout")]
    Timeout,
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Proto(#[from] ProtoError),
    #[error("response does not match query {0}")]
    Mismatch(u16),
}

impl ExchangeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExchangeError::Timeout)
    }
}

/// One request/response exchange against a single server address. The
/// read deadline is a property of the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: &Message, server: SocketAddr) -> Result<Message, ExchangeError>;
}

/// Builds an IN-class query for `name`/`record_type`.
pub fn build_query(name: &Name, record_type: RecordType, recursion_desired: bool) -> Message {
    let mut query = Query::query(name.clone(), record_type);
    query.set_query_class(DNSClass::IN);
    let mut message = Message::new();
    message
        .set_id(rand::random())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(recursion_desired)
        .add_query(query);
    message
}
