//! # Logger Service
//!
//! Structured logging for the HLE substrate.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! The sink is an owned, inspectable value injected into the service
//! framework rather than a global: behaviors that only manifest as log
//! output (a stubbed handler answering with canned success, for
//! instance) stay testable.

use std::fmt;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Service port that produced the entry (if any)
    pub service: Option<&'static str>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            service: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the originating service port
    pub fn with_service(mut self, service: &'static str) -> Self {
        self.service = Some(service);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// An in-memory log sink.
///
/// Entries below `min_level` are dropped at the door. Everything kept is
/// retained in order and accessible afterwards.
#[derive(Debug)]
pub struct Logger {
    min_level: LogLevel,
    entries: Vec<LogEntry>,
}

impl Logger {
    /// Creates a logger that keeps Debug and above
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            entries: Vec::new(),
        }
    }

    /// Creates a logger with a minimum level
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            min_level,
            entries: Vec::new(),
        }
    }

    /// Records an entry if it clears the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            self.entries.push(entry);
        }
    }

    /// Records a debug message for a service
    pub fn debug(&mut self, service: &'static str, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Debug, message).with_service(service));
    }

    /// Records an info message for a service
    pub fn info(&mut self, service: &'static str, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, message).with_service(service));
    }

    /// Records a warning for a service
    pub fn warn(&mut self, service: &'static str, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Warn, message).with_service(service));
    }

    /// Records an error for a service
    pub fn error(&mut self, service: &'static str, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Error, message).with_service(service));
    }

    /// All retained entries, in order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Checks whether any retained entry satisfies a predicate
    pub fn has_entry<F: Fn(&LogEntry) -> bool>(&self, predicate: F) -> bool {
        self.entries.iter().any(predicate)
    }

    /// Counts retained entries at a level
    pub fn count_at_level(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// Discards all retained entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.service.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_service_and_fields() {
        let entry = LogEntry::new(LogLevel::Warn, "stubbed")
            .with_service("net:host")
            .with_field("command", "0x0F");
        assert_eq!(entry.service, Some("net:host"));
        assert_eq!(entry.fields, vec![("command".to_string(), "0x0F".to_string())]);
    }

    #[test]
    fn test_logger_retains_in_order() {
        let mut logger = Logger::new();
        logger.info("svc", "first");
        logger.warn("svc", "second");
        assert_eq!(logger.entries().len(), 2);
        assert_eq!(logger.entries()[0].message, "first");
        assert_eq!(logger.entries()[1].message, "second");
    }

    #[test]
    fn test_min_level_filtering() {
        let mut logger = Logger::with_min_level(LogLevel::Warn);
        logger.debug("svc", "dropped");
        logger.info("svc", "dropped");
        logger.warn("svc", "kept");
        logger.error("svc", "kept");
        assert_eq!(logger.entries().len(), 2);
        assert_eq!(logger.count_at_level(LogLevel::Warn), 1);
    }

    #[test]
    fn test_has_entry() {
        let mut logger = Logger::new();
        logger.warn("svc", "unimplemented command");
        assert!(logger.has_entry(|e| e.level == LogLevel::Warn
            && e.message.contains("unimplemented")));
        assert!(!logger.has_entry(|e| e.level == LogLevel::Error));
    }

    #[test]
    fn test_clear() {
        let mut logger = Logger::new();
        logger.info("svc", "x");
        logger.clear();
        assert!(logger.entries().is_empty());
    }
}
