/// Ipse — prints its own source text.
///
/// Usage: ipse
///
/// Standard output carries the replica only. Diagnostics go to stderr,
/// filtered by `RUST_LOG` (default `warn`).

use ipse::core::replicator::reproduce;
use ipse::seed::{BODY, EPILOGUE, PROLOGUE};
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_tracing();

    if let Err(e) = reproduce(PROLOGUE, EPILOGUE, BODY) {
        tracing::error!(error = %e, "replica emission aborted");
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
