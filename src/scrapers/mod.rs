//! Scraper trait and registry
//!
//! This module provides:
//! - The `Scraper` trait every metric source implements
//! - The ordered registry of built-in scrapers
//!
//! Endpoint-specific logic lives in the dedicated scraper modules.
//! The coordinator interacts with scrapers only through the trait.

pub mod resources;
pub mod scraper;
pub mod stacks;

use std::sync::Arc;

pub use resources::ResourceCountScraper;
pub use scraper::Scraper;
pub use stacks::StackCountScraper;

/// Returns every built-in scraper with its enabled-by-default flag.
///
/// DESIGN:
/// - Ordered list, so flag generation and iteration are deterministic
/// - One place to register a new scraper
///
/// CONTRACT:
/// - Names must be unique; `Exporter::new` rejects duplicates
///
pub fn registry() -> Vec<(Arc<dyn Scraper>, bool)> {
    vec![
        (Arc::new(ResourceCountScraper), true),
        (Arc::new(StackCountScraper), true),
    ]
}
