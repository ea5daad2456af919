use crate::client::ServiceClient;
use crate::error::ScrapeError;
use crate::metrics::SampleSink;

/// Scraper is the unit of work fanned out by a collection pass.
///
/// Each implementation must:
/// - Fetch exactly one Pulumi Service endpoint
/// - Decode the body into typed data
/// - Emit its samples into the pass's sink
///
/// DESIGN GOALS:
/// - No scraper-specific logic in the coordinator
/// - Stateless: the same instance serves every pass
///
/// THREAD SAFETY:
/// - Must be Send + Sync
/// - Instances are shared across concurrent tasks via `Arc`
///
#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    /// Stable identifier of the scraper.
    ///
    /// CONTRACT:
    /// - Unique within the registry
    /// - Used as the `collector` label value
    /// - Used as the `--collect.<name>` flag suffix
    ///
    fn name(&self) -> &'static str;

    /// Describes what the scraper collects.
    ///
    /// Shown as the help text of its `--collect.<name>` flag.
    fn help(&self) -> &'static str;

    /// Fetches the endpoint and sends the resulting samples.
    ///
    /// On error nothing should have been emitted; the coordinator
    /// counts the failure against this scraper's name.
    ///
    async fn scrape(&self, client: &ServiceClient, sink: &SampleSink) -> Result<(), ScrapeError>;
}
