use crate::client::ServiceClient;
use crate::error::ScrapeError;
use crate::metrics::{Sample, SampleDesc, SampleSink, emit};
use crate::schema::ResourceSummary;

use super::scraper::Scraper;

/// Resources under management for the configured org, latest hour.
pub static RESOURCES_HOURLY: SampleDesc = SampleDesc {
    name: "pulumiservice_resources_hourly",
    help: "Resources under management for an org.",
    labels: &["total"],
};

/// Reports resources under management (RUM).
///
/// Reads the hourly summary over a one day lookback and reports the
/// most recent bucket only.
pub struct ResourceCountScraper;

#[async_trait::async_trait]
impl Scraper for ResourceCountScraper {
    fn name(&self) -> &'static str {
        "rum"
    }

    fn help(&self) -> &'static str {
        "Collect the number of resources under management for an org."
    }

    async fn scrape(&self, client: &ServiceClient, sink: &SampleSink) -> Result<(), ScrapeError> {
        let endpoint = format!(
            "/orgs/{}/resources/summary?granularity=hourly&lookbackDays=1",
            client.org_encoded()
        );
        let body = client.request(&endpoint).await?;
        let resources = latest_resource_count(&body)?;

        emit(
            sink,
            Sample::new(&RESOURCES_HOURLY, resources as f64, &[self.name()]),
        );

        Ok(())
    }
}

/// Decodes a summary body and returns the last bucket's resource count.
///
/// An empty summary is an error rather than a zero: the series is
/// left out of the pass instead.
pub fn latest_resource_count(body: &[u8]) -> Result<i64, ScrapeError> {
    let data: ResourceSummary = serde_json::from_slice(body)?;

    data.summary
        .last()
        .map(|hour| hour.resources)
        .ok_or(ScrapeError::EmptyData("summary"))
}
