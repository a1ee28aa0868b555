//! In-memory hierarchical engine
//!
//! The default engine for tests: records are captured to a buffer
//! together with a snapshot of the caller-location context keys taken
//! at emission time, so assertions can observe exactly what an output
//! layer would have seen.

use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;

use super::hierarchy::{Hierarchy, Sink};
use super::traits::{DiagnosticContext, Engine, EngineLogger};
use crate::context::{FILE_NAME_KEY, LINE_NUMBER_KEY, METHOD_NAME_KEY};
use crate::level::EngineLevel;

/// One record captured by [`MemoryEngine`]
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Fully-qualified name of the emitting logger
    pub logger: String,
    /// Engine level the record was emitted at
    pub level: EngineLevel,
    /// Rendered message text
    pub message: String,
    /// Rendered associated error, if one accompanied the record
    pub error: Option<String>,
    /// `fileName` context binding at emission time
    pub file_name: Option<String>,
    /// `lineNumber` context binding at emission time
    pub line_number: Option<String>,
    /// `methodName` context binding at emission time
    pub method_name: Option<String>,
}

struct RecordSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl Sink for RecordSink {
    fn emit(
        &self,
        logger: &str,
        level: EngineLevel,
        text: &str,
        error: Option<&(dyn Error + 'static)>,
        context: &dyn DiagnosticContext,
    ) {
        self.records.lock().push(LogRecord {
            logger: logger.to_string(),
            level,
            message: text.to_string(),
            error: error.map(|e| e.to_string()),
            file_name: context.get(FILE_NAME_KEY),
            line_number: context.get(LINE_NUMBER_KEY),
            method_name: context.get(METHOD_NAME_KEY),
        });
    }
}

/// Hierarchical engine that captures records in memory
pub struct MemoryEngine {
    hierarchy: Arc<Hierarchy>,
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryEngine {
    /// Create an empty engine; the hierarchy root starts at `Debug`
    pub fn new() -> Self {
        let records = Arc::new(Mutex::new(Vec::new()));
        Self {
            hierarchy: Hierarchy::new(Box::new(RecordSink {
                records: records.clone(),
            })),
            records,
        }
    }

    /// Snapshot of everything emitted so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Drop all captured records
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for MemoryEngine {
    fn logger(&self, name: &str) -> Arc<dyn EngineLogger> {
        Hierarchy::handle(&self.hierarchy, name)
    }

    fn diagnostic_context(&self) -> Arc<dyn DiagnosticContext> {
        self.hierarchy.mdc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_captured() {
        let engine = MemoryEngine::new();
        let logger = engine.logger("app.db");

        logger.log(EngineLevel::Info, "connected", None);

        let records = engine.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].logger, "app.db");
        assert_eq!(records[0].level, EngineLevel::Info);
        assert_eq!(records[0].message, "connected");
        assert_eq!(records[0].error, None);
    }

    #[test]
    fn test_log_ignores_threshold() {
        let engine = MemoryEngine::new();
        let logger = engine.logger("app");
        logger.set_level(EngineLevel::Off);

        // gating is the caller's job; the engine emits what it is handed
        logger.log(EngineLevel::Debug, "still recorded", None);

        assert_eq!(engine.records().len(), 1);
    }

    #[test]
    fn test_error_is_rendered() {
        let engine = MemoryEngine::new();
        let logger = engine.logger("app");
        let failure = std::io::Error::new(std::io::ErrorKind::Other, "disk full");

        logger.log(EngineLevel::Error, "write failed", Some(&failure));

        let records = engine.records();
        assert_eq!(records[0].error.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_context_snapshot_at_emission() {
        let engine = MemoryEngine::new();
        let context = engine.diagnostic_context();
        let logger = engine.logger("app");

        context.put(FILE_NAME_KEY, "main.rs");
        context.put(LINE_NUMBER_KEY, "7");
        logger.log(EngineLevel::Info, "hello", None);
        context.remove(FILE_NAME_KEY);
        context.remove(LINE_NUMBER_KEY);

        let records = engine.records();
        assert_eq!(records[0].file_name.as_deref(), Some("main.rs"));
        assert_eq!(records[0].line_number.as_deref(), Some("7"));
        assert_eq!(records[0].method_name, None);
    }

    #[test]
    fn test_clear() {
        let engine = MemoryEngine::new();
        engine.logger("app").log(EngineLevel::Info, "one", None);
        engine.clear();
        assert!(engine.records().is_empty());
    }
}
