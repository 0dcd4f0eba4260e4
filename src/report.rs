use std::fmt::{Display, Formatter};
use std::process;

pub const SERVICE: &str = "CHECK_DNS_SOA";

/// Plugin status. The discriminant is the process exit code the
/// monitoring supervisor interprets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub status: Status,
    pub headline: String,
    pub details: Vec<String>,
    pub force_display: bool,
}

impl Report {
    pub fn new(status: Status, headline: impl Into<String>) -> Self {
        Self {
            status,
            headline: headline.into(),
            details: Vec::new(),
            force_display: false,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force_display = true;
        self
    }

    pub fn render(&self, verbosity: u8) -> String {
        let mut out = format!("{} {}: {}\n", SERVICE, self.status, self.headline);
        if self.force_display || verbosity >= 2 {
            for line in &self.details {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    pub fn exit(&self, verbosity: u8) -> ! {
        print!("{}", self.render(verbosity));
        process::exit(self.status.code())
    }
}
