use crate::client::ServiceClient;
use crate::error::ScrapeError;
use crate::metrics::{Sample, SampleDesc, SampleSink, emit};
use crate::schema::StackList;

use super::scraper::Scraper;

pub static STACKS_TOTAL: SampleDesc = SampleDesc {
    name: "pulumiservice_stacks_total",
    help: "Number of stacks in an org.",
    labels: &["total"],
};

/// Reports how many stacks the org has.
pub struct StackCountScraper;

#[async_trait::async_trait]
impl Scraper for StackCountScraper {
    fn name(&self) -> &'static str {
        "stacks"
    }

    fn help(&self) -> &'static str {
        "Collect the number of stacks in an org."
    }

    async fn scrape(&self, client: &ServiceClient, sink: &SampleSink) -> Result<(), ScrapeError> {
        let endpoint = format!("/user/stacks?organization={}", client.org_encoded());
        let body = client.request(&endpoint).await?;
        let count = stack_count(&body)?;

        emit(sink, Sample::new(&STACKS_TOTAL, count as f64, &[self.name()]));

        Ok(())
    }
}

/// Decodes a stack list body and returns its length.
pub fn stack_count(body: &[u8]) -> Result<usize, ScrapeError> {
    let data: StackList = serde_json::from_slice(body)?;
    Ok(data.stacks.len())
}
