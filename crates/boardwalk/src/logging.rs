//! Logging setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose spans and events the default filter lets through.
const CRATES: [&str; 5] = [
    "boardwalk",
    "boardwalk_transport",
    "boardwalk_protocol",
    "boardwalk_session",
    "boardwalk_room",
];

/// Installs a global `tracing` subscriber printing to stdout.
///
/// Every Boardwalk crate and `binary_name` log at `default_level`. Set
/// `RUST_LOG` to override the filter entirely.
///
/// # Panics
/// If a global subscriber is already installed.
pub fn init_tracing(binary_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, level: &str) -> String {
    CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={level}", target.replace('-', "_")))
        .collect::<Vec<_>>()
        .join(",")
}
