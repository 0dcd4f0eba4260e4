use simple_error::SimpleError;
use std::error::Error;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Recursive resolvers of the host, in the order they are configured.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConf {
    pub servers: Vec<IpAddr>,
    pub port: u16,
}

impl ResolverConf {
    pub fn load<P: AsRef<Path>>(path: P, port: u16) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SimpleError::new(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content, port)
    }

    pub fn parse(content: &str, port: u16) -> Result<Self> {
        let mut servers = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let mut fields = line.split_whitespace();
            if fields.next() != Some("nameserver") {
                continue;
            }
            let value = match fields.next() {
                Some(value) => value,
                None => return Err(Box::from(SimpleError::new("nameserver line without address"))),
            };
            // fe80::1%eth0
            let address = value.split('%').next().unwrap_or(value);
            let ip: IpAddr = address
                .parse()
                .map_err(|_| SimpleError::new(format!("invalid nameserver address {}", value)))?;
            servers.push(ip);
        }
        if servers.is_empty() {
            return Err(Box::from(SimpleError::new("no nameserver configured")));
        }
        Ok(Self { servers, port })
    }

    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.servers
            .iter()
            .map(|ip| SocketAddr::new(*ip, self.port))
            .collect()
    }
}
