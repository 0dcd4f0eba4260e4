use hickory_client::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};

/// The record kinds the checker looks at. Everything else is kept as its
/// type so callers can still report what they got.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    Ns(Name),
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Soa { serial: u32 },
    Other(RecordType),
}

impl Answer {
    pub fn from_record(record: &Record) -> Self {
        match record.data() {
            Some(RData::NS(ns)) => Answer::Ns(ns.0.clone()),
            Some(RData::A(a)) => Answer::A(a.0),
            Some(RData::AAAA(aaaa)) => Answer::Aaaa(aaaa.0),
            Some(RData::SOA(soa)) => Answer::Soa { serial: soa.serial() },
            _ => Answer::Other(record.record_type()),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Answer::Ns(_) => RecordType::NS,
            Answer::A(_) => RecordType::A,
            Answer::Aaaa(_) => RecordType::AAAA,
            Answer::Soa { .. } => RecordType::SOA,
            Answer::Other(record_type) => *record_type,
        }
    }
}

pub fn answers(records: &[Record]) -> impl Iterator<Item = Answer> + '_ {
    records.iter().map(Answer::from_record)
}
