//! Tracing setup for the server binary.
//!
//! Reads `RUST_LOG`; without it, the server and agent crates log at `info`.
//! Output goes to stderr in compact format.
//!
//! # Example
//! ```bash
//! RUST_LOG=pit_agent=debug pit-server --agent engine
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "pit_server=info,pit_agent=info,tower_http=warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
