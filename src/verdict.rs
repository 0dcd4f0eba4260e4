use crate::check::{ZoneError, ZoneReport};
use crate::config::{Family, Settings};
use crate::report::{Report, Status};

/// Turns the outcome of a run into the plugin verdict.
pub fn evaluate(settings: &Settings, outcome: Result<ZoneReport, ZoneError>) -> Report {
    match outcome {
        Ok(report) => decide(settings, report),
        Err(e) => Report::new(Status::Critical, e.to_string()),
    }
}

pub fn decide(settings: &Settings, report: ZoneReport) -> Report {
    let tally = report.tally;
    let zone = &settings.zone;
    if tally.num_ns == 0 {
        return Report::new(
            Status::Critical,
            format!("No NS records for \"{}\". It is probably a CNAME to a domain but not a zone", zone),
        );
    }
    if tally.available_servers == 0 {
        return match settings.family {
            Family::Any => Report::new(
                Status::Unknown,
                "Internal error: no available name servers, even without -4 and -6",
            ),
            Family::V4 => Report::new(Status::Critical, "No name servers with the requested address family IPv4"),
            Family::V6 => Report::new(Status::Critical, "No name servers with the requested address family IPv6"),
        };
    }

    let thresholds = settings.thresholds;
    if tally.broken_servers < thresholds.warning {
        let note = if tally.broken_servers > 0 {
            format!(" (but {} broken name servers)", tally.broken_servers)
        } else {
            String::new()
        };
        return Report::new(Status::Ok, format!("Zone {} is fine{}", zone, note)).with_details(report.infos.into_vec());
    }

    let status = if tally.broken_servers < thresholds.critical {
        Status::Warning
    } else {
        Status::Critical
    };
    let mut errors = report.errors.into_vec().into_iter();
    let headline = errors
        .next()
        .unwrap_or_else(|| format!("{} broken name servers", tally.broken_servers));
    Report::new(status, headline).with_details(errors.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Tally;
    use crate::config::Thresholds;
    use crate::resolver::ResolveError;
    use crate::test_helpers::name;
    use std::path::PathBuf;
    use std::time::Duration;

    fn settings(warning: u32, critical: u32, family: Family) -> Settings {
        Settings {
            zone: name("example.org."),
            verbosity: 0,
            thresholds: Thresholds { warning, critical },
            timeout: Duration::from_secs(3),
            max_attempts: 3,
            family,
            require_all: false,
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
            resolver_port: 53,
        }
    }

    fn zone_report(num_ns: u32, available_servers: u32, broken_servers: u32) -> ZoneReport {
        let mut report = ZoneReport::new();
        report.tally = Tally {
            num_ns,
            available_servers,
            broken_servers,
        };
        for i in 0..broken_servers {
            report.errors.push(format!("error {}", i));
        }
        for i in 0..available_servers {
            report.infos.push(format!("ns{}.example.org. : 192.0.2.{} (1) ", i, i));
        }
        report
    }

    #[test]
    fn test_ok() {
        let verdict = decide(&settings(1, 1, Family::Any), zone_report(5, 5, 0));
        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.headline, "Zone example.org. is fine");
        assert_eq!(verdict.details.len(), 5);
    }

    #[test]
    fn test_ok_with_broken_below_warning() {
        let verdict = decide(&settings(3, 4, Family::Any), zone_report(5, 5, 2));
        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.headline, "Zone example.org. is fine (but 2 broken name servers)");
    }

    #[test]
    fn test_warning_and_critical() {
        let verdict = decide(&settings(1, 2, Family::Any), zone_report(5, 5, 1));
        assert_eq!(verdict.status, Status::Warning);
        assert_eq!(verdict.headline, "error 0");
        assert!(verdict.details.is_empty());

        let verdict = decide(&settings(1, 2, Family::Any), zone_report(5, 5, 2));
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.headline, "error 0");
        assert_eq!(verdict.details, vec!["error 1".to_string()]);

        let verdict = decide(&settings(1, 2, Family::Any), zone_report(5, 5, 5));
        assert_eq!(verdict.status, Status::Critical);
    }

    #[test]
    fn test_no_ns_records() {
        let verdict = decide(&settings(1, 1, Family::Any), zone_report(0, 0, 0));
        assert_eq!(verdict.status, Status::Critical);
        assert!(verdict.headline.starts_with("No NS records for \"example.org.\""));
    }

    #[test]
    fn test_no_available_servers() {
        let verdict = decide(&settings(1, 1, Family::Any), zone_report(2, 0, 2));
        assert_eq!(verdict.status, Status::Unknown);

        let verdict = decide(&settings(1, 1, Family::V6), zone_report(2, 0, 0));
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.headline, "No name servers with the requested address family IPv6");

        let verdict = decide(&settings(1, 1, Family::V4), zone_report(2, 0, 0));
        assert_eq!(verdict.headline, "No name servers with the requested address family IPv4");
    }

    #[test]
    fn test_missing_error_lines_fallback() {
        let mut report = ZoneReport::with_caps(0, 0);
        report.tally = Tally {
            num_ns: 3,
            available_servers: 3,
            broken_servers: 3,
        };
        let verdict = decide(&settings(1, 1, Family::Any), report);
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.headline, "3 broken name servers");
    }

    #[test]
    fn test_zone_errors_are_critical() {
        let settings = settings(1, 1, Family::Any);
        let verdict = evaluate(&settings, Err(ZoneError::NoSuchDomain(name("example.org."))));
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.headline, "No such domain example.org.");

        let verdict = evaluate(
            &settings,
            Err(ZoneError::Lookup {
                zone: name("example.org."),
                source: ResolveError::NoAnswer,
            }),
        );
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(
            verdict.headline,
            "Cannot retrieve the list of name servers for example.org.: No name server to answer the question"
        );
    }
}
