//! Logging Infrastructure
//!
//! Process-level `tracing` setup plus the injectable [`Logger`] capability
//! the order assembler depends on. Tests inject a recording or no-op logger
//! instead of touching the global subscriber.

/// Initialize the global tracing subscriber
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the global tracing subscriber with an explicit level
pub fn init_logger_with_level(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}

/// Minimal logging capability
///
/// The assembler logs through this instead of the global subscriber.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default logger, forwards to `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "orders", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "orders", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "orders", "{message}");
    }
}

/// Discards everything
#[derive(Debug, Clone, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
