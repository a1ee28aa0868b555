//! Engine boundary traits

use std::error::Error;
use std::sync::Arc;

use crate::level::EngineLevel;

/// Hierarchical logging engine abstraction
///
/// Implementations:
/// - `MemoryEngine`: in-memory hierarchy with an inspectable record buffer
/// - `ConsoleEngine`: same hierarchy, single-line records on stderr
///
/// Formatting, appenders and output transports beyond these are the
/// engine's own concern; the facade only drives this interface.
pub trait Engine: Send + Sync {
    /// Get or create the engine logger for a fully-qualified dotted name
    fn logger(&self, name: &str) -> Arc<dyn EngineLogger>;

    /// The diagnostic context consulted by the engine's output layer
    fn diagnostic_context(&self) -> Arc<dyn DiagnosticContext>;
}

/// One named logger inside the engine hierarchy
pub trait EngineLogger: Send + Sync {
    /// Fully-qualified dotted name
    fn name(&self) -> &str;

    /// Nearest ancestor in the hierarchy, `None` at the hierarchy root
    fn parent(&self) -> Option<Arc<dyn EngineLogger>>;

    /// Set this logger's own threshold
    fn set_level(&self, level: EngineLevel);

    /// Threshold in effect, inherited from the nearest configured ancestor
    fn effective_level(&self) -> EngineLevel;

    /// Whether records at `level` pass the effective threshold
    fn enabled_for(&self, level: EngineLevel) -> bool;

    /// Emit one record.
    ///
    /// Threshold gating is the caller's responsibility; `log` itself
    /// never suppresses a record.
    fn log(&self, level: EngineLevel, text: &str, error: Option<&(dyn Error + 'static)>);
}

/// Key/value map visible to the engine while a record is emitted
///
/// Values are scoped to the calling thread; concurrent emissions on
/// other threads never observe them.
pub trait DiagnosticContext: Send + Sync {
    /// Bind `key` for the current thread
    fn put(&self, key: &str, value: &str);

    /// Unbind `key` for the current thread
    fn remove(&self, key: &str);

    /// Current binding of `key` on this thread
    fn get(&self, key: &str) -> Option<String>;
}
