use prometheus::{IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use tokio::sync::mpsc;

use crate::error::ConfigError;
use crate::util;

/// Metric namespace shared by every series the exporter emits.
pub const NAMESPACE: &str = "pulumiservice";

/// Subsystem for the exporter's own bookkeeping series.
pub const EXPORTER_SUBSYSTEM: &str = "exporter";

// ------------------------------------------------------------
// Per-pass samples
// ------------------------------------------------------------

/// Static descriptor of a per-pass gauge.
#[derive(Debug)]
pub struct SampleDesc {
    /// Fully qualified metric name
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

/// Duration of one collector (the ping or a scraper) during a pass.
pub static SCRAPE_DURATION: SampleDesc = SampleDesc {
    name: "pulumiservice_exporter_collector_duration_seconds",
    help: "Collector time duration.",
    labels: &["collector"],
};

/// One observation produced during a collection pass.
///
/// Samples live for a single pass: they are sent through the
/// pass's [`SampleSink`] and rendered once.
#[derive(Debug, Clone)]
pub struct Sample {
    pub desc: &'static SampleDesc,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl Sample {
    pub fn new(desc: &'static SampleDesc, value: f64, label_values: &[&str]) -> Self {
        Self {
            desc,
            value,
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Label value for `name`, if the descriptor declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

/// Output side of a collection pass.
pub type SampleSink = mpsc::UnboundedSender<Sample>;

/// Sends a sample, ignoring a closed sink.
///
/// The receiver outlives every scrape task of a pass, so a send
/// only fails if the pass itself was dropped.
pub fn emit(sink: &SampleSink, sample: Sample) {
    if sink.send(sample).is_err() {
        log::debug!("sample dropped: collection pass already finished");
    }
}

// ------------------------------------------------------------
// Lifetime metrics
// ------------------------------------------------------------

/// Counters and gauges carried across collection passes.
///
/// Design:
/// - Owns its own `Registry`; nothing touches the prometheus default registry
/// - Cheap to clone (the prometheus handles are reference counted)
/// - Atomic updates, safe from concurrent scrape tasks
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    /// Total number of collection passes
    pub total_scrapes: IntCounter,

    /// Scraper failures, labeled by scraper name
    pub scrape_errors: IntCounterVec,

    /// 1 if the last pass saw any error, 0 otherwise
    pub last_scrape_error: IntGauge,

    /// 1 if the last liveness ping succeeded
    pub up: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, ConfigError> {
        let registry = Registry::new();

        let total_scrapes = IntCounter::with_opts(
            Opts::new(
                "scrapes_total",
                "Total number of times the pulumi service was scraped for metrics.",
            )
            .namespace(NAMESPACE)
            .subsystem(EXPORTER_SUBSYSTEM),
        )?;

        let scrape_errors = IntCounterVec::new(
            Opts::new(
                "scrape_errors_total",
                "Total number of times an error occurred scraping the pulumi service.",
            )
            .namespace(NAMESPACE)
            .subsystem(EXPORTER_SUBSYSTEM),
            &["collector"],
        )?;

        let last_scrape_error = IntGauge::with_opts(
            Opts::new(
                "last_scrape_error",
                "Whether the last scrape of metrics from pulumi service resulted in an error (1 for error, 0 for success).",
            )
            .namespace(NAMESPACE)
            .subsystem(EXPORTER_SUBSYSTEM),
        )?;

        let up = IntGauge::with_opts(
            Opts::new("up", "Whether the pulumi service is up and responding.")
                .namespace(NAMESPACE),
        )?;

        let build_info = IntGaugeVec::new(
            Opts::new(
                "build_info",
                "A metric with a constant '1' value labeled by version and target of the exporter.",
            )
            .namespace(NAMESPACE)
            .subsystem(EXPORTER_SUBSYSTEM),
            &["version", "target"],
        )?;
        build_info
            .with_label_values(&[util::VERSION, util::target().as_str()])
            .set(1);

        registry.register(Box::new(total_scrapes.clone()))?;
        registry.register(Box::new(scrape_errors.clone()))?;
        registry.register(Box::new(last_scrape_error.clone()))?;
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(build_info.clone()))?;

        Ok(Self {
            registry,
            total_scrapes,
            scrape_errors,
            last_scrape_error,
            up,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Records a failed scraper: bumps its counter and flags the pass.
    pub fn record_scrape_error(&self, scraper: &str) {
        self.scrape_errors.with_label_values(&[scraper]).inc();
        self.last_scrape_error.set(1);
    }

    /// Records the liveness ping outcome.
    pub fn record_ping(&self, ok: bool) {
        if ok {
            self.up.set(1);
            self.last_scrape_error.set(0);
        } else {
            self.up.set(0);
            self.last_scrape_error.set(1);
        }
    }
}
