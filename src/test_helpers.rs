//! In-memory transport and message builders for unit tests.

use crate::transport::{ExchangeError, Transport};
use async_trait::async_trait;
use hickory_client::op::{Message, MessageType, ResponseCode};
use hickory_client::rr::rdata::{A, AAAA, CNAME, NS, SOA};
use hickory_client::rr::{Name, RData, Record, RecordType};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Mutex;

#[derive(Clone)]
enum Reply {
    Answer(Message),
    Timeout,
    Refused,
}

type Key = (SocketAddr, String, RecordType);

/// Replays scripted replies per (server, name, type). The last reply of a
/// sequence repeats; unscripted exchanges are refused.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<Key, VecDeque<Reply>>>,
    calls: Mutex<Vec<(SocketAddr, bool)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, server: &str, qname: &str, record_type: RecordType, reply: Reply) {
        let key = (server.parse().unwrap(), qname.to_lowercase(), record_type);
        self.script.lock().unwrap().entry(key).or_default().push_back(reply);
    }

    pub fn answer(&self, server: &str, qname: &str, record_type: RecordType, message: Message) {
        self.push(server, qname, record_type, Reply::Answer(message));
    }

    pub fn timeout(&self, server: &str, qname: &str, record_type: RecordType) {
        self.push(server, qname, record_type, Reply::Timeout);
    }

    pub fn refuse(&self, server: &str, qname: &str, record_type: RecordType) {
        self.push(server, qname, record_type, Reply::Refused);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, server: &str) -> usize {
        let server: SocketAddr = server.parse().unwrap();
        self.calls.lock().unwrap().iter().filter(|(s, _)| *s == server).count()
    }

    pub fn recursion_desired(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(_, rd)| *rd).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: &Message, server: SocketAddr) -> Result<Message, ExchangeError> {
        self.calls.lock().unwrap().push((server, request.recursion_desired()));
        let query = &request.queries()[0];
        let key = (server, query.name().to_string().to_lowercase(), query.query_type());
        let reply = {
            let mut script = self.script.lock().unwrap();
            match script.get_mut(&key) {
                Some(replies) if replies.len() > 1 => replies.pop_front(),
                Some(replies) => replies.front().cloned(),
                None => None,
            }
        };
        match reply {
            Some(Reply::Answer(mut message)) => {
                message.set_id(request.id());
                Ok(message)
            }
            Some(Reply::Timeout) => Err(ExchangeError::Timeout),
            Some(Reply::Refused) | None => Err(ExchangeError::Io(io::Error::from(io::ErrorKind::ConnectionRefused))),
        }
    }
}

pub fn name(value: &str) -> Name {
    Name::from_str(value).unwrap()
}

pub fn response(code: ResponseCode) -> Message {
    let mut message = Message::new();
    message
        .set_message_type(MessageType::Response)
        .set_response_code(code);
    message
}

pub fn answer_with(code: ResponseCode, authoritative: bool, records: Vec<Record>) -> Message {
    let mut message = response(code);
    message.set_authoritative(authoritative);
    for record in records {
        message.add_answer(record);
    }
    message
}

pub fn ns_record(zone: &str, server: &str) -> Record {
    Record::from_rdata(name(zone), 300, RData::NS(NS(name(server))))
}

pub fn a_record(owner: &str, address: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::A(A(address.parse().unwrap())))
}

pub fn aaaa_record(owner: &str, address: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::AAAA(AAAA(address.parse().unwrap())))
}

pub fn cname_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn soa_record(zone: &str, serial: u32) -> Record {
    let soa = SOA::new(
        name(&format!("ns1.{}", zone)),
        name(&format!("hostmaster.{}", zone)),
        serial,
        7200,
        3600,
        1209600,
        300,
    );
    Record::from_rdata(name(zone), 300, RData::SOA(soa))
}
