use prometheus::{GaugeVec, Opts, Registry, TextEncoder};

use crate::metrics::{Metrics, Sample};

/// Renders one pass's samples followed by the lifetime metrics.
///
/// Samples become gauges in a scratch registry that lives only for
/// this call, so series from a failed scraper are simply absent.
pub fn render(samples: &[Sample], metrics: &Metrics) -> prometheus::Result<String> {
    let scratch = Registry::new();
    let mut gauges: Vec<(&'static str, GaugeVec)> = Vec::new();

    for sample in samples {
        let gauge = match gauges.iter().find(|(name, _)| *name == sample.desc.name) {
            Some((_, gauge)) => gauge.clone(),
            None => {
                let gauge = GaugeVec::new(
                    Opts::new(sample.desc.name, sample.desc.help),
                    sample.desc.labels,
                )?;
                scratch.register(Box::new(gauge.clone()))?;
                gauges.push((sample.desc.name, gauge.clone()));
                gauge
            }
        };

        let labels: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(labels.as_slice())?.set(sample.value);
    }

    let mut families = scratch.gather();
    families.extend(metrics.registry().gather());

    TextEncoder::new().encode_to_string(&families)
}
