//! Logger module
//!
//! Line-oriented logging for the generator service:
//! - startup banner and configuration notes
//! - one access log line per request in a configurable format
//! - warnings and errors on the error stream
//!
//! Everything goes through the global [`writer`]; before `init()` runs, lines
//! fall back to stdout/stderr at `info` level. `logging.level` filters the
//! info, warning and error lines; access lines follow `logging.access_log`.

mod format;
mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

pub use writer::Level;

/// Destination stream of a log line
#[derive(Clone, Copy)]
enum Stream {
    Info,
    Access,
    Warning,
    Error,
}

impl Stream {
    /// Severity used for `logging.level` filtering; access lines have their own switch
    const fn level(self) -> Option<Level> {
        match self {
            Self::Access => None,
            Self::Info => Some(Level::Info),
            Self::Warning => Some(Level::Warn),
            Self::Error => Some(Level::Error),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Fails on an unknown
/// `logging.level` or an unopenable log file.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = Level::parse(&config.logging.level).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unknown log level '{}'", config.logging.level),
        )
    })?;

    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn emit(stream: Stream, message: &str) {
    let target = writer::get();
    let max_level = target.map_or(Level::Info, writer::LogWriter::max_level);
    if stream.level().is_some_and(|level| !level.enabled_at(max_level)) {
        return;
    }

    match (target, stream) {
        (Some(w), Stream::Info | Stream::Access) => w.write_access(message),
        (Some(w), Stream::Warning | Stream::Error) => w.write_error(message),
        (None, Stream::Info | Stream::Access) => println!("{message}"),
        (None, Stream::Warning | Stream::Error) => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let mut lines = vec![
        "======================================".to_string(),
        "Utility generator started".to_string(),
        format!("Listening on: http://{addr}"),
        format!("Log level: {}", config.logging.level),
    ];
    if let Some(workers) = config.server.workers {
        lines.push(format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        lines.push(format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        lines.push(format!("Error log: {path}"));
    }
    lines.extend([
        "Endpoints:".to_string(),
        format!("  GET http://{addr}/                   web UI"),
        format!("  GET http://{addr}/generate-uuid"),
        format!("  GET http://{addr}/generate-password  length, lowercase, uppercase, numbers, symbols"),
        format!("  GET http://{addr}/generate-qrcode    text"),
        "======================================\n".to_string(),
    ]);

    for line in &lines {
        emit(Stream::Info, line);
    }
}

pub fn log_config(message: &str) {
    emit(Stream::Info, &format!("[CONFIG] {message}"));
}

pub fn log_signal(message: &str) {
    emit(Stream::Info, &format!("[SIGNAL] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    emit(Stream::Info, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        emit(Stream::Info, &format!("[Headers] Count: {count}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    emit(Stream::Access, &entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    emit(Stream::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_warning(message: &str) {
    emit(Stream::Warning, &format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    emit(Stream::Error, &format!("[ERROR] {message}"));
}
