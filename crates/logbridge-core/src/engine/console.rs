//! Console engine

use std::error::Error;
use std::sync::Arc;

use super::hierarchy::{Hierarchy, Sink};
use super::traits::{DiagnosticContext, Engine, EngineLogger};
use crate::context::{FILE_NAME_KEY, LINE_NUMBER_KEY};
use crate::level::EngineLevel;

struct StderrSink;

impl StderrSink {
    fn format(
        logger: &str,
        level: EngineLevel,
        text: &str,
        error: Option<&(dyn Error + 'static)>,
        context: &dyn DiagnosticContext,
    ) -> String {
        let mut line = format!("{level} {logger}: {text}");
        if let Some(error) = error {
            line.push_str(&format!(" ({error})"));
        }
        // caller location only shows up when tracing put a real file there
        if let Some(file) = context.get(FILE_NAME_KEY).filter(|file| !file.is_empty()) {
            let number = context.get(LINE_NUMBER_KEY).unwrap_or_default();
            line.push_str(&format!(" [{file}:{number}]"));
        }
        line
    }
}

impl Sink for StderrSink {
    fn emit(
        &self,
        logger: &str,
        level: EngineLevel,
        text: &str,
        error: Option<&(dyn Error + 'static)>,
        context: &dyn DiagnosticContext,
    ) {
        eprintln!("{}", Self::format(logger, level, text, error, context));
    }
}

/// Hierarchical engine that writes single-line records to stderr
pub struct ConsoleEngine {
    hierarchy: Arc<Hierarchy>,
}

impl ConsoleEngine {
    /// Create a console engine; the hierarchy root starts at `Debug`
    pub fn new() -> Self {
        Self {
            hierarchy: Hierarchy::new(Box::new(StderrSink)),
        }
    }
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ConsoleEngine {
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
    use crate::engine::mdc::ThreadLocalMdc;

    #[test]
    fn test_line_shape() {
        let mdc = ThreadLocalMdc::new();
        let line = StderrSink::format("app.db", EngineLevel::Warn, "slow query", None, &mdc);
        assert_eq!(line, "WARN app.db: slow query");
    }

    #[test]
    fn test_line_shape_with_error() {
        let mdc = ThreadLocalMdc::new();
        let failure = std::io::Error::new(std::io::ErrorKind::Other, "timed out");
        let line = StderrSink::format("app", EngineLevel::Error, "query failed", Some(&failure), &mdc);
        assert_eq!(line, "ERROR app: query failed (timed out)");
    }

    #[test]
    fn test_line_shape_with_location() {
        let mdc = ThreadLocalMdc::new();
        mdc.put(FILE_NAME_KEY, "db.rs");
        mdc.put(LINE_NUMBER_KEY, "12");
        let line = StderrSink::format("app", EngineLevel::Info, "ready", None, &mdc);
        mdc.remove(FILE_NAME_KEY);
        mdc.remove(LINE_NUMBER_KEY);
        assert_eq!(line, "INFO app: ready [db.rs:12]");
    }

    #[test]
    fn test_blank_location_is_omitted() {
        let mdc = ThreadLocalMdc::new();
        mdc.put(FILE_NAME_KEY, "");
        mdc.put(LINE_NUMBER_KEY, "");
        let line = StderrSink::format("app", EngineLevel::Info, "ready", None, &mdc);
        mdc.remove(FILE_NAME_KEY);
        mdc.remove(LINE_NUMBER_KEY);
        assert_eq!(line, "INFO app: ready");
    }

    #[test]
    fn test_console_engine_shares_one_hierarchy() {
        let engine = ConsoleEngine::new();
        let parent = engine.logger("app");
        parent.set_level(EngineLevel::Error);
        assert_eq!(engine.logger("app.db").effective_level(), EngineLevel::Error);
    }
}
