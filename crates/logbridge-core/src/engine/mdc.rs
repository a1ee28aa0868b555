//! Thread-local diagnostic context

use std::cell::RefCell;
use std::collections::HashMap;

use super::traits::DiagnosticContext;

thread_local! {
    static MDC: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Diagnostic context backed by one map per thread.
///
/// The map itself is process-global, as an engine's MDC conventionally
/// is; all engines in a process observe the same per-thread bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalMdc;

impl ThreadLocalMdc {
    /// Create a handle to the shared context
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticContext for ThreadLocalMdc {
    fn put(&self, key: &str, value: &str) {
        MDC.with(|map| {
            map.borrow_mut().insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        MDC.with(|map| {
            map.borrow_mut().remove(key);
        });
    }

    fn get(&self, key: &str) -> Option<String> {
        MDC.with(|map| map.borrow().get(key).cloned())
    }
}
