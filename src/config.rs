use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};

use crate::error::ConfigError;
use crate::scrapers::Scraper;

/// Environment variable holding the Pulumi access token.
///
/// When set and non-empty it wins over `--access-token`.
pub const ACCESS_TOKEN_ENV: &str = "PULUMI_ACCESS_TOKEN";

// ------------------------------------------------------------
// Command line
// ------------------------------------------------------------
//
// Static flags live on `Cli`. Per-scraper `--collect.<name>`
// flags are generated from the scraper registry at parse time
// (see `try_parse_from`), so they never need to be listed here.
//
/// Prometheus exporter for the Pulumi Service
#[derive(Parser, Debug, Clone)]
#[command(name = "pulumiservice_exporter", version, about, long_about = None)]
pub struct Cli {
    /// API address of the pulumi service (prefix with https:// to connect over HTTPS)
    #[arg(long, default_value = "https://api.pulumi.com")]
    pub address: String,

    /// Pulumi access token (PULUMI_ACCESS_TOKEN overrides this flag)
    #[arg(long = "access-token")]
    pub access_token: Option<String>,

    /// User agent of the pulumi service http client
    #[arg(long = "user-agent", default_value = crate::util::NAME)]
    pub user_agent: String,

    /// Timeout on HTTP requests to the pulumi service API
    #[arg(long, default_value = "1600ms", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Disable TLS host verification
    #[arg(long)]
    pub insecure: bool,

    /// Pulumi organization
    #[arg(long)]
    pub org: String,

    /// Address on which to expose metrics and web interface
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9414")]
    pub listen_address: String,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub telemetry_path: String,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Checks the values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            return Err(ConfigError::InvalidTelemetryPath(
                self.telemetry_path.clone(),
            ));
        }
        Ok(())
    }
}

/// Flag name controlling one scraper, e.g. `collect.rum`.
pub fn collect_flag(scraper_name: &str) -> String {
    format!("collect.{scraper_name}")
}

/// Parses the process arguments, exiting on `--help`, `--version` or bad input.
///
/// Returns the parsed flags and the scrapers enabled by them, in
/// registry order.
pub fn parse_args(registry: &[(Arc<dyn Scraper>, bool)]) -> (Cli, Vec<Arc<dyn Scraper>>) {
    try_parse_from(std::env::args_os(), registry).unwrap_or_else(|e| e.exit())
}

/// Same as [`parse_args`] but over an explicit argument list.
///
/// Each registry entry contributes one `--collect.<name>` flag.
/// The flag accepts `--collect.x`, `--collect.x=true` and
/// `--collect.x=false`; without it the registry default applies.
pub fn try_parse_from<I, T>(
    args: I,
    registry: &[(Arc<dyn Scraper>, bool)],
) -> Result<(Cli, Vec<Arc<dyn Scraper>>), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command().version(crate::util::version_line());
    for (scraper, enabled_by_default) in registry {
        let flag = collect_flag(scraper.name());
        command = command.arg(
            Arg::new(flag.clone())
                .long(flag)
                .help(scraper.help())
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(BoolishValueParser::new())
                .default_value(if *enabled_by_default { "true" } else { "false" })
                .default_missing_value("true"),
        );
    }

    let matches = command.try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;

    let enabled = registry
        .iter()
        .filter(|(scraper, _)| {
            matches
                .get_one::<bool>(&collect_flag(scraper.name()))
                .copied()
                .unwrap_or(false)
        })
        .map(|(scraper, _)| scraper.clone())
        .collect();

    Ok((cli, enabled))
}

// ------------------------------------------------------------
// Service options
// ------------------------------------------------------------
//
// Immutable after startup. Shared by every scrape task through
// the ServiceClient that owns it.
//
#[derive(Debug, Clone)]
pub struct ServiceOpts {
    /// Base URL as given on the command line; validated by `ServiceClient::new`
    pub url: String,

    /// Sent as `Authorization: token <access_token>`
    pub access_token: String,

    pub user_agent: String,

    /// Per-request timeout, the only timeout applied to a collection pass
    pub timeout: Duration,

    /// Skip TLS certificate verification
    pub insecure: bool,

    /// Organization used in the scraper endpoints
    pub org: String,
}

impl ServiceOpts {
    /// Builds the options from parsed flags and the process environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let access_token = resolve_access_token(
            cli.access_token.clone(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        )
        .ok_or(ConfigError::MissingAccessToken)?;

        Ok(Self {
            url: cli.address.clone(),
            access_token,
            user_agent: cli.user_agent.clone(),
            timeout: cli.timeout,
            insecure: cli.insecure,
            org: cli.org.clone(),
        })
    }
}

/// Picks the access token: a non-empty environment value wins over the flag.
pub fn resolve_access_token(flag: Option<String>, env: Option<String>) -> Option<String> {
    env.filter(|token| !token.is_empty())
        .or(flag.filter(|token| !token.is_empty()))
}
