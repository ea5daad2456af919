// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// - config:     CLI flags and the immutable service options
// - error:      Error enums shared across modules
// - client:     Outbound HTTP client for the Pulumi Service API
// - schema:     Strongly typed API response bodies
// - metrics:    Lifetime metrics bundle and per-pass samples
// - scrapers:   Scraper trait and the ordered scraper registry
// - collector:  Collection pass (ping + fan-out) and exposition
// - server:     Inbound HTTP routes (landing, metrics, readiness)
// - util:       Build/version helpers
//
pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod schema;
pub mod scrapers;
pub mod server;
pub mod util;

pub use client::ServiceClient;
pub use collector::exporter::Exporter;
pub use config::{Cli, ServiceOpts};
pub use error::{ClientError, ConfigError, ScrapeError};
pub use metrics::{Metrics, Sample, SampleSink};
pub use scrapers::Scraper;
