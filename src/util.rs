/// Build and version helpers.
///
/// Used by:
/// - the landing page
/// - the `build_info` gauge
/// - log lines emitted at startup
///
/// Everything here is resolved at compile time or from
/// `std::env::consts`, so the output is deterministic per binary.

use rustls::crypto::{CryptoProvider, ring};

/// Exporter name, used for the landing page title and the default user agent.
pub const NAME: &str = "pulumiservice_exporter";

/// Crate version as set in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the `os/arch` pair the binary was built for.
///
/// Example: `linux/x86_64`
pub fn target() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Version line printed by `--version`, e.g. `0.1.0 (linux/x86_64)`.
pub fn version_line() -> String {
    format!("{} ({})", VERSION, target())
}

/// Installs rustls' `ring` backend as the process-wide crypto provider.
///
/// rustls >= 0.23 needs an explicit provider once more than one
/// backend is compiled in. Call before any TLS client is built.
///
/// Returns `false` if a provider was already installed.
pub fn install_crypto_provider() -> bool {
    CryptoProvider::install_default(ring::default_provider()).is_ok()
}

/// Multi-line build summary shown on the landing page.
pub fn version_info() -> String {
    format!(
        "Name: {}\nVersion: {}\nPlatform: {}\n",
        NAME,
        VERSION,
        target()
    )
}
