//! Logging and latency profiling for the CLI.
//!
//! Business code logs through the `log` facade; `tracing-subscriber` picks
//! those records up together with the CLI's own `tracing` spans. With
//! `--timing`, every `#[instrument]`ed command logs its duration when its span
//! closes (`FmtSpan::CLOSE`).
//!
//! `RUST_LOG` still wins over the defaults chosen here, e.g.
//! `RUST_LOG=lendsqr_business=trace lendsqr users`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default level when `RUST_LOG` is unset.
///
/// Span close events are logged at INFO, so `--timing` needs at least INFO.
pub fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    match (verbose, timing) {
        (true, _) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    }
}

fn span_events(timing: bool) -> FmtSpan {
    if timing { FmtSpan::CLOSE } else { FmtSpan::NONE }
}

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for tables and `--json` output.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events(timing))
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();

    if let Err(e) = installed {
        tracing::debug!("tracing already initialized: {e}");
    }
}
