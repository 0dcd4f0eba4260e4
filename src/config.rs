use clap::Parser;
use hickory_client::rr::Name;
use simple_error::SimpleError;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub const MAX_VERBOSITY: u8 = 3;
pub const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Parser, Clone, Debug)]
#[clap(name = "check_dns_soa", version, about = "Checks that every name server of a zone answers its SOA authoritatively")]
pub struct Config {
    /// DNS zone name
    #[clap(long, short = 'H', env = "CHECK_ZONE")]
    pub zone: Option<String>,

    /// Verbosity (from 0 to 3)
    #[clap(long, short = 'v', default_value = "0")]
    pub verbosity: u32,

    /// Number of name servers broken to trigger a Warning
    #[clap(long, short = 'w', default_value = "1")]
    pub warning: u32,

    /// Number of name servers broken to trigger a Critical situation
    #[clap(long, short = 'c', default_value = "1")]
    pub critical: u32,

    /// Timeout (in seconds, at most one hour)
    #[clap(long, short = 't', default_value = "3")]
    pub timeout: u64,

    /// Maximum number of tests per name server
    #[clap(long, short = 'i', default_value = "3")]
    pub tries: u32,

    /// Use IPv4 only
    #[clap(long = "ipv4", short = '4')]
    pub ipv4: bool,

    /// Use IPv6 only
    #[clap(long = "ipv6", short = '6')]
    pub ipv6: bool,

    /// When using -4 or -6, requires that all servers have an address of this family
    #[clap(long, short = 'r')]
    pub require_all: bool,

    /// Resolver configuration listing the local recursive resolvers
    #[clap(long, default_value = "/etc/resolv.conf", env = "RESOLV_CONF")]
    pub resolv_conf: PathBuf,

    /// Port of the local recursive resolvers
    #[clap(long, default_value = "53", env = "RESOLVER_PORT")]
    pub resolver_port: u16,
}

impl Config {
    pub fn clamped_verbosity(&self) -> u8 {
        self.verbosity.min(u32::from(MAX_VERBOSITY)) as u8
    }
}

/// Address families whose addresses get probed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Any,
    V4,
    V6,
}

impl Family {
    pub fn wants_v4(self) -> bool {
        self != Family::V6
    }

    pub fn wants_v6(self) -> bool {
        self != Family::V4
    }

    pub fn is_filtered(self) -> bool {
        self != Family::Any
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: u32,
    pub critical: u32,
}

impl Thresholds {
    /// Both values are raised to at least 1; `warning` may not exceed `critical`.
    pub fn new(warning: u32, critical: u32) -> Result<Self> {
        let warning = warning.max(1);
        let critical = critical.max(1);
        if warning > critical {
            return Err(Box::from(SimpleError::new(
                "Critical threshold must be superior to warning threshold",
            )));
        }
        Ok(Self { warning, critical })
    }
}

/// Validated run parameters, built once from the command line.
#[derive(Clone, Debug)]
pub struct Settings {
    pub zone: Name,
    pub verbosity: u8,
    pub thresholds: Thresholds,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub family: Family,
    pub require_all: bool,
    pub resolv_conf: PathBuf,
    pub resolver_port: u16,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.ipv4 && config.ipv6 {
            return Err(Box::from(SimpleError::new("-4 and -6 are not compatible")));
        }
        if config.require_all && !config.ipv4 && !config.ipv6 {
            return Err(Box::from(SimpleError::new("-r does not make sense without -4 or -6")));
        }
        let zone = match config.zone.as_deref().map(str::trim) {
            Some(zone) if !zone.is_empty() => parse_zone(zone)?,
            _ => return Err(Box::from(SimpleError::new("Usage: check_dns_soa -H ZONE"))),
        };
        let family = if config.ipv4 {
            Family::V4
        } else if config.ipv6 {
            Family::V6
        } else {
            Family::Any
        };
        Ok(Self {
            zone,
            verbosity: config.clamped_verbosity(),
            thresholds: Thresholds::new(config.warning, config.critical)?,
            timeout: Duration::from_secs(config.timeout.clamp(1, MAX_TIMEOUT_SECS)),
            max_attempts: config.tries.max(1),
            family,
            require_all: config.require_all,
            resolv_conf: config.resolv_conf.clone(),
            resolver_port: config.resolver_port,
        })
    }
}

fn parse_zone(zone: &str) -> Result<Name> {
    let fqdn = if zone.ends_with('.') {
        zone.to_string()
    } else {
        format!("{}.", zone)
    };
    let name = Name::from_str(&fqdn).map_err(|e| SimpleError::new(format!("Invalid zone name {}: {}", zone, e)))?;
    Ok(name)
}
