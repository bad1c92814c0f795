//! Subscriber setup. Plain commands log to stderr; the interactive view
//! owns the terminal, so it logs to a file instead.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init_stderr(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(io::stderr)
        .try_init();
}

/// The returned guard flushes the background writer when dropped; hold
/// it until the view exits.
pub fn init_file(verbose: u8, path: &Path) -> WorkerGuard {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map_or_else(|| "elevation-profile.log".into(), |n| n.to_string_lossy());

    let appender = tracing_appender::rolling::never(dir, file_name.as_ref());
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}
