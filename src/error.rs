use reqwest::StatusCode;

// ------------------------------------------------------------
// Error taxonomy
// ------------------------------------------------------------
//
// - ConfigError:  fatal, raised before the exporter starts serving
// - ClientError:  one outbound call to the Pulumi Service failed
// - ScrapeError:  one scraper failed; isolated to that scraper
//

/// Startup errors. The process exits when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `--address` value is not a usable http(s) URL.
    #[error("invalid pulumi service URL: {0}")]
    InvalidUrl(String),

    /// Neither `--access-token` nor `PULUMI_ACCESS_TOKEN` was provided.
    #[error("missing pulumi access token (use --access-token or PULUMI_ACCESS_TOKEN)")]
    MissingAccessToken,

    /// `--web.telemetry-path` is not an absolute, non-root path.
    #[error("invalid telemetry path: {0}")]
    InvalidTelemetryPath(String),

    /// Two registered scrapers share the same name.
    #[error("duplicate scraper name: {0}")]
    DuplicateScraper(&'static str),

    /// The outbound HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A metric could not be registered in the exporter registry.
    #[error("failed to register metric: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Errors returned by [`crate::client::ServiceClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or body read failure.
    #[error("error handling request for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with something other than 200.
    #[error("error handling request for {endpoint} http-statuscode: {status}")]
    UnexpectedStatus { endpoint: String, status: StatusCode },

    /// The liveness ping was rejected with 401.
    #[error("invalid pulumi access token")]
    Auth,
}

impl ClientError {
    /// True for network failures and non-200 answers, false for rejected credentials.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ClientError::Auth)
    }
}

/// Errors returned by a single [`crate::scrapers::Scraper`].
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The body was not valid JSON of the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but held no data to report.
    #[error("empty {0} in response")]
    EmptyData(&'static str),
}
