/// Collector module
///
/// This module groups the logic run on every inbound scrape:
/// - `exporter`:   one collection pass (ping, scraper fan-out, join)
/// - `exposition`: rendering a pass into the Prometheus text format
///
/// The collector layer sits between:
/// - Scrapers (endpoint-specific fetch + decode)
/// - The HTTP server (serves the rendered text)
///
/// Design notes:
/// - Scraper-specific logic MUST NOT live here
/// - A failing scraper never fails the pass
pub mod exporter;
pub mod exposition;
