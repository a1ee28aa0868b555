//! Process-wide logger identity service
//!
//! All facade instances are obtained through [`LoggerRegistry`]; there
//! is exactly one instance per engine logger for the life of the
//! process, and the registry is append-only.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, EngineLogger};
use crate::error::BridgeResult;
use crate::level::Severity;
use crate::logger::Logger;

/// Namespace root used when none is configured
pub const DEFAULT_NAMESPACE: &str = "app";

/// Bulk logger configuration
///
/// The enumerated counterpart of a free-form attribute map: only the
/// options listed here exist, so unrecognized keys in a configuration
/// source are simply not representable. Extra JSON fields are ignored
/// on deserialization, matching the permissive bulk-configuration
/// semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerAttributes {
    /// Threshold to install
    #[serde(default)]
    pub level: Option<Severity>,
    /// Caller-location capture flag; absent means inherit from the parent
    #[serde(default)]
    pub tracing: Option<bool>,
}

impl LoggerAttributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the tracing flag
    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = Some(tracing);
        self
    }
}

/// Shared registry state; loggers keep a weak reference back to it for
/// parent and tracing resolution
pub(crate) struct RegistryCore {
    engine: Arc<dyn Engine>,
    namespace: String,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl RegistryCore {
    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully-qualified dotted identity for a caller-supplied name
    fn qualify(&self, name: Option<&str>) -> String {
        match name {
            None => self.namespace.clone(),
            Some(name) => format!("{}.{}", self.namespace, name.replace("::", ".")),
        }
    }

    fn in_namespace(&self, name: &str) -> bool {
        name == self.namespace
            || name
                .strip_prefix(&self.namespace)
                .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Get or create the instance for a qualified identity.
    ///
    /// The map lock is held across creation and insertion, so
    /// concurrent first lookups of one identity resolve to a single
    /// winner.
    fn intern(core: &Arc<Self>, qualified: &str) -> Arc<Logger> {
        let mut loggers = core.loggers.lock();
        if let Some(logger) = loggers.get(qualified) {
            return logger.clone();
        }
        let handle = core.engine.logger(qualified);
        let logger = Logger::bind(
            handle,
            core.engine.diagnostic_context(),
            Arc::downgrade(core),
        );
        loggers.insert(qualified.to_string(), logger.clone());
        logger
    }

    fn wrap(core: &Arc<Self>, handle: Arc<dyn EngineLogger>) -> Arc<Logger> {
        let mut loggers = core.loggers.lock();
        if let Some(logger) = loggers.get(handle.name()) {
            return logger.clone();
        }
        let name = handle.name().to_string();
        let logger = Logger::bind(
            handle,
            core.engine.diagnostic_context(),
            Arc::downgrade(core),
        );
        loggers.insert(name, logger.clone());
        logger
    }

    fn root(core: &Arc<Self>) -> Arc<Logger> {
        let namespace = core.namespace.clone();
        Self::intern(core, &namespace)
    }

    pub(crate) fn parent_of(core: &Arc<Self>, logger: &Logger) -> Arc<Logger> {
        match logger.engine_logger().parent() {
            Some(parent) if core.in_namespace(parent.name()) => Self::wrap(core, parent),
            _ => Self::root(core),
        }
    }
}

/// Identity map from engine logger to facade instance
///
/// Cheap to clone; clones share one underlying registry.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use logbridge_core::{LoggerRegistry, MemoryEngine};
///
/// let registry = LoggerRegistry::new(Arc::new(MemoryEngine::new()));
/// let first = registry.lookup("db");
/// let second = registry.lookup("db");
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Clone)]
pub struct LoggerRegistry {
    core: Arc<RegistryCore>,
}

impl LoggerRegistry {
    /// Create a registry over `engine` with the default namespace root
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self::with_namespace(engine, DEFAULT_NAMESPACE)
    }

    /// Create a registry whose loggers all live under `namespace`
    pub fn with_namespace(engine: Arc<dyn Engine>, namespace: impl Into<String>) -> Self {
        Self {
            core: Arc::new(RegistryCore {
                engine,
                namespace: namespace.into(),
                loggers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The configured namespace root
    pub fn namespace(&self) -> &str {
        self.core.namespace()
    }

    /// Get or create the facade instance for `name`.
    ///
    /// `None` resolves to the namespace root; `::` separators are
    /// rewritten to dots; repeated lookups with one effective name
    /// return the identical instance.
    pub fn lookup<'a>(&self, name: impl Into<Option<&'a str>>) -> Arc<Logger> {
        let qualified = self.core.qualify(name.into());
        RegistryCore::intern(&self.core, &qualified)
    }

    /// `lookup` plus bulk attribute application
    pub fn get<'a>(
        &self,
        name: impl Into<Option<&'a str>>,
        attributes: &LoggerAttributes,
    ) -> BridgeResult<Arc<Logger>> {
        let logger = self.lookup(name);
        logger.set_attributes(attributes)?;
        Ok(logger)
    }

    /// Facade instance bound to the namespace root
    pub fn root(&self) -> Arc<Logger> {
        RegistryCore::root(&self.core)
    }

    /// Register a facade instance around an externally-obtained engine
    /// handle, honoring one-instance-per-handle
    pub fn wrap(&self, handle: Arc<dyn EngineLogger>) -> Arc<Logger> {
        RegistryCore::wrap(&self.core, handle)
    }

    /// Facade instance for the handle's hierarchical parent, or the
    /// root when the parent is missing or outside this namespace
    pub fn parent_of(&self, logger: &Logger) -> Arc<Logger> {
        RegistryCore::parent_of(&self.core, logger)
    }
}

static GLOBAL: OnceCell<LoggerRegistry> = OnceCell::new();

/// Install the process-global registry.
///
/// Returns `false` when one is already installed; the first
/// installation wins for the life of the process.
pub fn install(registry: LoggerRegistry) -> bool {
    GLOBAL.set(registry).is_ok()
}

/// The process-global registry, if one has been installed
pub fn global() -> Option<LoggerRegistry> {
    GLOBAL.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;

    fn registry() -> LoggerRegistry {
        LoggerRegistry::new(Arc::new(MemoryEngine::new()))
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let registry = registry();
        let first = registry.lookup("a.b");
        let second = registry.lookup("a.b");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_none_resolves_to_root() {
        let registry = registry();
        let unnamed = registry.lookup(None);
        let root = registry.root();
        assert!(Arc::ptr_eq(&unnamed, &root));
        assert_eq!(root.name(), DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_names_are_qualified_under_namespace() {
        let registry = LoggerRegistry::with_namespace(Arc::new(MemoryEngine::new()), "svc");
        assert_eq!(registry.lookup("db").name(), "svc.db");
    }

    #[test]
    fn test_module_separators_are_rewritten() {
        let registry = registry();
        let colons = registry.lookup("App::Db::Pool");
        let dots = registry.lookup("App.Db.Pool");
        assert!(Arc::ptr_eq(&colons, &dots));
        assert_eq!(colons.name(), "app.App.Db.Pool");
    }

    #[test]
    fn test_parent_of_steps_one_level_up() {
        let registry = registry();
        let child = registry.lookup("a.b");
        let parent = registry.parent_of(&child);
        assert_eq!(parent.name(), "app.a");
        assert!(Arc::ptr_eq(&parent, &registry.lookup("a")));
    }

    #[test]
    fn test_parent_of_root_is_root() {
        let registry = registry();
        let root = registry.root();
        let parent = registry.parent_of(&root);
        assert!(Arc::ptr_eq(&parent, &root));
    }

    #[test]
    fn test_parent_of_top_level_logger_is_root() {
        let registry = registry();
        let logger = registry.lookup("solo");
        let parent = registry.parent_of(&logger);
        assert!(Arc::ptr_eq(&parent, &registry.root()));
    }

    #[test]
    fn test_wrap_returns_one_instance_per_handle() {
        let engine = Arc::new(MemoryEngine::new());
        let registry = LoggerRegistry::new(engine.clone());

        let handle = engine.logger("app.external");
        let wrapped = registry.wrap(handle.clone());
        let again = registry.wrap(engine.logger("app.external"));
        assert!(Arc::ptr_eq(&wrapped, &again));
        assert!(Arc::ptr_eq(&wrapped, &registry.lookup("external")));
    }

    #[test]
    fn test_get_applies_attributes() {
        let registry = registry();
        let attributes = LoggerAttributes::new()
            .with_level(Severity::Warn)
            .with_tracing(true);

        let logger = registry.get("db", &attributes).unwrap();
        assert_eq!(logger.level().unwrap(), Severity::Warn);
        assert_eq!(logger.tracing(), Some(true));
    }

    #[test]
    fn test_empty_attributes_change_nothing() {
        let registry = registry();
        let logger = registry.get("db", &LoggerAttributes::new()).unwrap();
        assert_eq!(logger.level().unwrap(), Severity::Debug);
        assert_eq!(logger.tracing(), None);
    }

    #[test]
    fn test_attributes_from_configuration_json() {
        let attributes: LoggerAttributes =
            serde_json::from_str(r#"{"level": "error", "tracing": false, "color": "red"}"#).unwrap();
        assert_eq!(attributes.level, Some(Severity::Error));
        assert_eq!(attributes.tracing, Some(false));
    }

    #[test]
    fn test_bogus_level_in_configuration_fails() {
        let parsed: Result<LoggerAttributes, _> = serde_json::from_str(r#"{"level": "bogus"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_concurrent_lookup_single_winner() {
        let registry = registry();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || registry.lookup("contended.name")));
        }
        let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for logger in &loggers[1..] {
            assert!(Arc::ptr_eq(&loggers[0], logger));
        }
    }

    #[test]
    fn test_global_slot_single_installation() {
        let first = registry();
        let installed_first = install(first.clone());
        let installed_second = install(registry());

        // exactly one installation wins, whichever test got there first
        assert!(!installed_second || installed_first);
        assert!(global().is_some());
    }
}
