//! Integration tests for the logging facade
//!
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use deferred_shading::deferred::Engine;
use deferred_shading::deferred::log::{DefaultLogger, Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Logger that keeps every entry for inspection
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger_receives_entries() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Info, "deferred::DeferredRenderer", "compile geometry-shaders".to_string());
    Engine::log(LogSeverity::Error, "deferred::RenderTargetSet", "framebuffer 'light' is incomplete".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "deferred::DeferredRenderer");
        assert_eq!(captured[0].message, "compile geometry-shaders");
        assert_eq!(captured[1].severity, LogSeverity::Error);
        assert!(captured[1].file.is_none());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_detailed_entries_carry_location() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "deferred::ShaderLoader",
        "0:1(1): error: syntax error".to_string(),
        file!(),
        line!(),
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some(file!()));
        assert!(captured[0].line.is_some());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_reset_logger_detaches_custom_logger() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Warn, "deferred::test", "dropped".to_string());
    assert!(entries.lock().unwrap().is_empty());
}

#[test]
fn test_integration_default_logger_plain_format() {
    let entry = LogEntry {
        severity: LogSeverity::Warn,
        timestamp: std::time::SystemTime::now(),
        source: "deferred::DeferredRenderer".to_string(),
        message: "point light at (0.00, 0.00, 0.00) has no bounding sphere, skipped".to_string(),
        file: None,
        line: None,
    };
    let line = DefaultLogger::format_plain(&entry);
    assert!(line.contains("deferred::DeferredRenderer"));
    assert!(line.contains("no bounding sphere"));
    assert!(line.contains(LogSeverity::Warn.label().trim()));
}
