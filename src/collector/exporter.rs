use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::client::ServiceClient;
use crate::error::ConfigError;
use crate::metrics::{Metrics, SCRAPE_DURATION, Sample, SampleSink, emit};
use crate::scrapers::Scraper;

use super::exposition;

/// Label of the duration sample recorded for the liveness ping.
pub const REACH_LABEL: &str = "reach";

/// Runs collection passes against the Pulumi Service.
///
/// One pass:
/// 1. Counts the attempt
/// 2. Pings the service and records `up` / `last_scrape_error`
/// 3. Emits the `reach` duration
/// 4. Spawns one task per scraper
/// 5. Joins every task
///
/// GUARANTEES:
/// - The `reach` sample is always the first sample of a pass
/// - All scraper tasks have finished before the pass returns,
///   so lifetime metrics read afterwards include their updates
/// - A failing or panicking scraper never fails the pass
///
/// A failed ping does not skip the scrapers; they run anyway and
/// report their own errors.
pub struct Exporter {
    client: Arc<ServiceClient>,
    scrapers: Vec<Arc<dyn Scraper>>,
    metrics: Metrics,
}

impl Exporter {
    /// Fails with [`ConfigError::DuplicateScraper`] when two scrapers share a name.
    pub fn new(
        client: ServiceClient,
        metrics: Metrics,
        scrapers: Vec<Arc<dyn Scraper>>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for scraper in &scrapers {
            if !seen.insert(scraper.name()) {
                return Err(ConfigError::DuplicateScraper(scraper.name()));
            }
        }

        Ok(Self {
            client: Arc::new(client),
            scrapers,
            metrics,
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Names of the scrapers run on every pass, in registration order.
    pub fn scraper_names(&self) -> Vec<&'static str> {
        self.scrapers.iter().map(|s| s.name()).collect()
    }

    /// Runs one pass and returns its samples in emission order.
    pub async fn collect(&self) -> Vec<Sample> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        self.scrape(&tx).await;
        drop(tx);

        let mut samples = Vec::new();
        while let Some(sample) = rx.recv().await {
            samples.push(sample);
        }
        samples
    }

    /// Runs one pass and renders it together with the lifetime metrics.
    pub async fn render(&self) -> prometheus::Result<String> {
        let samples = self.collect().await;
        exposition::render(&samples, &self.metrics)
    }

    async fn scrape(&self, sink: &SampleSink) {
        self.metrics.total_scrapes.inc();

        let scrape_time = Instant::now();
        match self.client.ping().await {
            Ok(()) => self.metrics.record_ping(true),
            Err(e) => {
                error!("Pulumi Service ping failed: {}", e);
                self.metrics.record_ping(false);
            }
        }
        emit(
            sink,
            Sample::new(
                &SCRAPE_DURATION,
                scrape_time.elapsed().as_secs_f64(),
                &[REACH_LABEL],
            ),
        );

        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();

        for scraper in &self.scrapers {
            let scraper = scraper.clone();
            let client = self.client.clone();
            let metrics = self.metrics.clone();
            let sink = sink.clone();
            let label = scraper.name();

            let handle = tasks.spawn(async move {
                let scrape_time = Instant::now();
                if let Err(e) = scraper.scrape(&client, &sink).await {
                    error!("Scrape error [{}]: {}", label, e);
                    metrics.record_scrape_error(label);
                }
                emit(
                    &sink,
                    Sample::new(
                        &SCRAPE_DURATION,
                        scrape_time.elapsed().as_secs_f64(),
                        &[label],
                    ),
                );
            });
            names.insert(handle.id(), (label, Instant::now()));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                let (label, started) = names
                    .get(&e.id())
                    .copied()
                    .unwrap_or(("unknown", scrape_time));
                error!("Scrape task [{}] did not complete: {}", label, e);
                self.metrics.record_scrape_error(label);
                emit(
                    sink,
                    Sample::new(
                        &SCRAPE_DURATION,
                        started.elapsed().as_secs_f64(),
                        &[label],
                    ),
                );
            }
        }

        debug!("collection pass finished ({} scrapers)", self.scrapers.len());
    }
}
