use crate::check::Verifier;
use crate::config::{Config, Settings, MAX_VERBOSITY};
use crate::report::{Report, Status};
use crate::resolver::conf::ResolverConf;
use crate::transport::udp::UdpTransport;
use crate::transport::Transport;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::net::SocketAddr;

mod check;
mod config;
mod probe;
mod record;
mod report;
mod resolver;
mod transport;
mod util;
mod verdict;

#[cfg(test)]
mod test_helpers;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => usage_report(&e).exit(0),
    };
    let verbosity = config.clamped_verbosity();
    init_logging(verbosity);
    let settings = match prepare(&config) {
        Ok(settings) => settings,
        Err(report) => report.exit(verbosity),
    };
    let conf = match ResolverConf::load(&settings.resolv_conf, settings.resolver_port) {
        Ok(conf) => conf,
        Err(e) => Report::new(Status::Unknown, format!("Cannot initialize the local resolver: {}", e))
            .exit(settings.verbosity),
    };
    debug!("local resolvers: {:?}", conf.servers);
    let transport = UdpTransport::new(settings.timeout);
    run(&settings, &transport, conf.addresses()).await.exit(settings.verbosity)
}

fn init_logging(verbosity: u8) {
    let level = if verbosity >= MAX_VERBOSITY { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn prepare(config: &Config) -> Result<Settings, Report> {
    Settings::from_config(config).map_err(|e| Report::new(Status::Unknown, e.to_string()))
}

async fn run(settings: &Settings, transport: &dyn Transport, resolvers: Vec<SocketAddr>) -> Report {
    info!("Checking zone {}", settings.zone);
    let verifier = Verifier::new(settings, transport, resolvers);
    verdict::evaluate(settings, verifier.run().await)
}

fn usage_report(e: &clap::Error) -> Report {
    let help = Config::command().render_help().to_string();
    match e.kind() {
        ErrorKind::DisplayHelp => Report::new(Status::Unknown, "Help requested")
            .with_details(vec![help])
            .forced(),
        ErrorKind::DisplayVersion => Report::new(
            Status::Unknown,
            format!("Version of plugin {} is {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        ),
        _ => {
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            Report::new(
                Status::Unknown,
                format!("Error when parsing arguments: {}", first.trim_start_matches("error: ")),
            )
            .with_details(vec![help])
            .forced()
        }
    }
}
