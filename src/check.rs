use crate::config::{Family, Settings};
use crate::probe::{soa_query, Prober};
use crate::record::{answers, Answer};
use crate::resolver::{LocalResolver, ResolveError};
use crate::transport::{ExchangeError, Transport};
use crate::util::bounded::BoundedList;
use hickory_client::op::{Message, ResponseCode};
use hickory_client::rr::{Name, RecordType};
use log::{debug, info};
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

pub const MAX_ERRORS: usize = 10;
pub const MAX_INFOS: usize = 100;
const DNS_PORT: u16 = 53;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Cannot retrieve the list of name servers for {zone}: {source}")]
    Lookup { zone: Name, source: ResolveError },
    #[error("No such domain {0}")]
    NoSuchDomain(Name),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub num_ns: u32,
    pub available_servers: u32,
    pub broken_servers: u32,
}

/// Everything learned about a zone in one run.
#[derive(Debug)]
pub struct ZoneReport {
    pub tally: Tally,
    pub errors: BoundedList<String>,
    pub infos: BoundedList<String>,
}

impl ZoneReport {
    pub fn new() -> Self {
        Self::with_caps(MAX_ERRORS, MAX_INFOS)
    }

    pub fn with_caps(max_errors: usize, max_infos: usize) -> Self {
        Self {
            tally: Tally::default(),
            errors: BoundedList::new(max_errors),
            infos: BoundedList::new(max_infos),
        }
    }

    fn fail(&mut self, broken: &mut bool, message: String) {
        info!("{}", message);
        *broken = true;
        self.errors.push(message);
    }
}

impl Default for ZoneReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of asking one address of a name server for the zone's SOA.
#[derive(Debug)]
pub enum SoaResult {
    Serial(u32),
    Unreachable(ExchangeError),
    Rcode(ResponseCode),
    NoAnswer,
    NotAuthoritative,
    NotSoa(RecordType),
}

impl SoaResult {
    pub fn classify(res: Result<Message, ExchangeError>) -> Self {
        let response = match res {
            Ok(response) => response,
            Err(e) => return SoaResult::Unreachable(e),
        };
        if response.response_code() != ResponseCode::NoError {
            return SoaResult::Rcode(response.response_code());
        }
        // a recursor queried with RD=0 typically answers with nothing
        let first = match answers(response.answers()).next() {
            Some(first) => first,
            None => return SoaResult::NoAnswer,
        };
        match (first, response.authoritative()) {
            (_, false) => SoaResult::NotAuthoritative,
            (Answer::Soa { serial }, true) => SoaResult::Serial(serial),
            (other @ (Answer::Ns(_) | Answer::A(_) | Answer::Aaaa(_) | Answer::Other(_)), true) => {
                SoaResult::NotSoa(other.record_type())
            }
        }
    }

    /// Error line for a failed check, `None` on success.
    pub fn describe(&self, server: &Name, address: &IpAddr) -> Option<String> {
        match self {
            SoaResult::Serial(_) => None,
            SoaResult::Unreachable(e) => Some(format!("Cannot get SOA from {}/{}: {}", server, address, e)),
            SoaResult::Rcode(code) => Some(format!("{}/{} answered {}", server, address, code)),
            SoaResult::NoAnswer => Some(format!("Cannot get SOA from {}/{}: 0 answer", server, address)),
            SoaResult::NotAuthoritative => Some(format!("{}/{} is not authoritative", server, address)),
            SoaResult::NotSoa(record_type) => Some(format!(
                "{}/{} answered with {} instead of SOA",
                server, address, record_type
            )),
        }
    }
}

pub struct Verifier<'a> {
    settings: &'a Settings,
    resolver: LocalResolver<'a>,
    prober: Prober<'a>,
}

impl<'a> Verifier<'a> {
    pub fn new(settings: &'a Settings, transport: &'a dyn Transport, resolvers: Vec<SocketAddr>) -> Self {
        Self {
            settings,
            resolver: LocalResolver::new(transport, resolvers),
            prober: Prober::new(transport),
        }
    }

    pub async fn run(&self) -> Result<ZoneReport, ZoneError> {
        self.run_with(ZoneReport::new()).await
    }

    /// Checks every name server of the zone, folding results into `report`.
    pub async fn run_with(&self, mut report: ZoneReport) -> Result<ZoneReport, ZoneError> {
        let zone = &self.settings.zone;
        let response = self
            .resolver
            .resolve(zone, RecordType::NS)
            .await
            .map_err(|source| ZoneError::Lookup {
                zone: zone.clone(),
                source,
            })?;
        if response.response_code() == ResponseCode::NXDomain {
            return Err(ZoneError::NoSuchDomain(zone.clone()));
        }
        let servers: Vec<Name> = answers(response.answers())
            .filter_map(|answer| match answer {
                Answer::Ns(server) => Some(server),
                Answer::A(_) | Answer::Aaaa(_) | Answer::Soa { .. } | Answer::Other(_) => None,
            })
            .collect();
        debug!("{} has {} NS records", zone, servers.len());
        let query = soa_query(zone);
        for server in &servers {
            report.tally.num_ns += 1;
            self.check_server(server, &query, &mut report).await;
        }
        if report.errors.is_truncated() || report.infos.is_truncated() {
            debug!("{}: detail lines past the cap were dropped", zone);
        }
        Ok(report)
    }

    async fn check_server(&self, server: &Name, query: &Message, report: &mut ZoneReport) {
        let family = self.settings.family;
        let mut broken = false;
        let mut addresses = Vec::new();
        if family.wants_v4() {
            addresses.extend(self.addresses(server, RecordType::A, report, &mut broken).await);
        }
        if family.wants_v6() {
            addresses.extend(self.addresses(server, RecordType::AAAA, report, &mut broken).await);
        }

        if addresses.is_empty() {
            if self.settings.require_all || !family.is_filtered() {
                let suffix = match family {
                    Family::Any => "",
                    Family::V4 => "v4",
                    Family::V6 => "v6",
                };
                report.fail(&mut broken, format!("No IP{} address for this server {}", suffix, server));
            } else {
                debug!("{} has no address of the requested family, skipped", server);
            }
        } else {
            report.tally.available_servers += 1;
            let mut line = format!("{} : ", server);
            for address in &addresses {
                let target = SocketAddr::new(*address, DNS_PORT);
                let res = self.prober.query(query, target, self.settings.max_attempts).await;
                let result = SoaResult::classify(res);
                debug!("{}/{}: {:?}", server, address, result);
                match result.describe(server, address) {
                    Some(message) => report.fail(&mut broken, message),
                    None => {
                        if let SoaResult::Serial(serial) = result {
                            line.push_str(&format!("{} ({}) ", address, serial));
                        }
                    }
                }
            }
            report.infos.push(line);
        }

        if broken {
            report.tally.broken_servers += 1;
        }
    }

    /// Addresses of `server` for one family. A failed lookup marks the
    /// server broken and yields nothing for that family.
    async fn addresses(
        &self,
        server: &Name,
        record_type: RecordType,
        report: &mut ZoneReport,
        broken: &mut bool,
    ) -> Vec<IpAddr> {
        let label = if record_type == RecordType::AAAA { "IPv6" } else { "IPv4" };
        let response = match self.resolver.resolve(server, record_type).await {
            Ok(response) => response,
            Err(e) => {
                report.fail(broken, format!("Error getting the {} address of {}: {}", label, server, e));
                return Vec::new();
            }
        };
        if response.response_code() != ResponseCode::NoError {
            report.fail(
                broken,
                format!("Error getting the {} address of {}: {}", label, server, response.response_code()),
            );
            return Vec::new();
        }
        answers(response.answers())
            .filter_map(|answer| match answer {
                Answer::A(ip) => Some(IpAddr::V4(ip)),
                Answer::Aaaa(ip) => Some(IpAddr::V6(ip)),
                Answer::Ns(_) | Answer::Soa { .. } | Answer::Other(_) => None,
            })
            .collect()
    }
}
