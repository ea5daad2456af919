use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::config::ServiceOpts;
use crate::error::{ClientError, ConfigError};

/// Media type selecting version 8 of the Pulumi Service API responses.
pub const ACCEPT_PULUMI: &str = "application/vnd.pulumi+8";

/// Endpoint used for the liveness ping.
pub const PING_ENDPOINT: &str = "/user";

/// Outbound client for the Pulumi Service REST API.
///
/// RESPONSIBILITIES:
/// - Compose `{base}/api{endpoint}` URLs
/// - Inject the authorization, accept and user agent headers
/// - Translate status codes into [`ClientError`]
///
/// NOT RESPONSIBLE FOR:
/// - Decoding bodies (scrapers do that)
/// - Retries; every call is a single attempt
///
/// THREADING:
/// - One instance per process, shared through `Arc`
/// - `reqwest::Client` pools connections and is safe to use
///   from many tasks at once
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    opts: ServiceOpts,
    base_url: String,
}

impl ServiceClient {
    /// Validates the base URL and builds the HTTP transport.
    ///
    /// Fails with [`ConfigError::InvalidUrl`] when the address is not
    /// an http(s) URL with a host.
    pub fn new(opts: ServiceOpts) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&opts.url)?;

        let http = reqwest::Client::builder()
            .timeout(opts.timeout)
            .danger_accept_invalid_certs(opts.insecure)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            opts,
            base_url,
        })
    }

    pub fn opts(&self) -> &ServiceOpts {
        &self.opts
    }

    /// Organization the scrapers report on.
    pub fn org(&self) -> &str {
        &self.opts.org
    }

    /// Organization percent-encoded for use in a path segment or query value.
    pub fn org_encoded(&self) -> String {
        urlencoding::encode(&self.opts.org).into_owned()
    }

    /// Normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `{base}/api{endpoint}` and returns the raw body on 200.
    pub async fn request(&self, endpoint: &str) -> Result<Vec<u8>, ClientError> {
        let resp = self.get(endpoint).await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }

    /// Pings the current user endpoint to check liveness.
    ///
    /// - 200 → `Ok(())`
    /// - 401 → [`ClientError::Auth`]
    /// - anything else → a transport-class error
    pub async fn ping(&self) -> Result<(), ClientError> {
        let resp = self.get(PING_ENDPOINT).await?;

        match resp.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ClientError::Auth),
            status => Err(ClientError::UnexpectedStatus {
                endpoint: PING_ENDPOINT.to_string(),
                status,
            }),
        }
    }

    async fn get(&self, endpoint: &str) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}/api{}", self.base_url, endpoint);
        log::debug!("GET {}", url);

        self.http
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.opts.access_token))
            .header(USER_AGENT, self.opts.user_agent.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_PULUMI)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

/// Normalizes the configured service address.
///
/// - `http://` is prepended when the string carries no scheme
/// - the scheme must be http or https and the host non-empty
/// - no query or fragment, since endpoints are appended to the string
/// - a trailing `/` is removed so endpoint joins stay clean
///
/// Examples:
/// - `"api.pulumi.com"`          -> `"http://api.pulumi.com"`
/// - `"https://api.pulumi.com/"` -> `"https://api.pulumi.com"`
/// - `"ftp://api.pulumi.com"`    -> error
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let uri = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed = Url::parse(&uri).map_err(|e| ConfigError::InvalidUrl(format!("{uri}: {e}")))?;

    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
    if !has_host || !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(uri));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(uri));
    }

    Ok(uri.trim_end_matches('/').to_string())
}
