use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_STDERR_FILTER: &str = "info,name_clean=warn";
const DEFAULT_FILE_FILTER: &str = "info,name_clean=debug";

/// Install the global subscriber: stderr always, plus a daily rolling file under
/// `log_dir` when one is given. `RUST_LOG` overrides the stderr filter.
pub fn configure_logging(log_dir: Option<&Path>) {
    // Stderr keeps stdout free for cleaned output
    let stderr_log = fmt::layer().with_writer(io::stderr).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_FILTER)),
    );

    let file_log = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "clean_names.log");
        fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
            .with_filter(EnvFilter::new(DEFAULT_FILE_FILTER))
    });

    tracing_subscriber::Registry::default()
        .with(stderr_log)
        .with(file_log)
        .init();
}
