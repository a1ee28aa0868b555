//! The facade logger instance

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::context::{CallerFrame, ContextScope};
use crate::engine::{DiagnosticContext, EngineLogger};
use crate::error::BridgeResult;
use crate::level::{EngineLevel, LevelSpec, Severity};
use crate::message::{self, Payload};
use crate::registry::{LoggerAttributes, RegistryCore};

/// Leveled-logger facade over one engine logger
///
/// Instances are obtained through [`crate::LoggerRegistry`] and are
/// unique per engine logger. `debug`/`info`/`warn` consult the engine's
/// threshold before doing any work; `error`/`fatal`/`unknown` always
/// emit.
///
/// When tracing resolves active, the caller's file and line are bound
/// into the diagnostic context for the duration of the engine call, so
/// output layouts can include the call site.
pub struct Logger {
    handle: Arc<dyn EngineLogger>,
    context: Arc<dyn DiagnosticContext>,
    tracing: RwLock<Option<bool>>,
    registry: Weak<RegistryCore>,
}

impl Logger {
    pub(crate) fn bind(
        handle: Arc<dyn EngineLogger>,
        context: Arc<dyn DiagnosticContext>,
        registry: Weak<RegistryCore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            handle,
            context,
            tracing: RwLock::new(None),
            registry,
        })
    }

    /// Dotted identity of the underlying engine logger
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Facade view of the engine's effective (possibly inherited) level
    pub fn level(&self) -> BridgeResult<Severity> {
        Severity::try_from_engine(self.handle.effective_level())
    }

    /// Install a threshold from a facade severity or a native engine level
    pub fn set_level(&self, level: impl Into<LevelSpec>) -> BridgeResult<()> {
        self.handle.set_level(level.into().resolve()?);
        Ok(())
    }

    /// Local tri-state tracing flag; `None` inherits from the parent chain
    pub fn tracing(&self) -> Option<bool> {
        *self.tracing.read()
    }

    /// Set or clear the local tracing flag (`None` restores inheritance)
    pub fn set_tracing(&self, tracing: impl Into<Option<bool>>) {
        *self.tracing.write() = tracing.into();
    }

    /// Resolved tracing state: the local flag when set, otherwise the
    /// parent chain; an unset flag at the root resolves to `false`
    pub fn tracing_enabled(&self) -> bool {
        if let Some(flag) = self.tracing() {
            return flag;
        }
        let Some(core) = self.registry.upgrade() else {
            return false;
        };
        if self.handle.name() == core.namespace() {
            return false;
        }
        RegistryCore::parent_of(&core, self).tracing_enabled()
    }

    /// Facade instance for the engine parent (the registry root when
    /// the parent is missing or unregistered outside the namespace)
    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.registry
            .upgrade()
            .map(|core| RegistryCore::parent_of(&core, self))
    }

    /// Apply bulk configuration
    pub fn set_attributes(&self, attributes: &LoggerAttributes) -> BridgeResult<()> {
        if let Some(level) = attributes.level {
            self.set_level(level)?;
        }
        if let Some(tracing) = attributes.tracing {
            self.set_tracing(tracing);
        }
        Ok(())
    }

    /// Whether `debug` records pass the effective threshold
    pub fn debug_enabled(&self) -> bool {
        self.handle.enabled_for(EngineLevel::Debug)
    }

    /// Whether `info` records pass the effective threshold
    pub fn info_enabled(&self) -> bool {
        self.handle.enabled_for(EngineLevel::Info)
    }

    /// Whether `warn` records pass the effective threshold
    pub fn warn_enabled(&self) -> bool {
        self.handle.enabled_for(EngineLevel::Warn)
    }

    #[track_caller]
    pub fn debug<'a>(&self, message: impl Into<Payload<'a>>) {
        if !self.debug_enabled() {
            return;
        }
        self.emit(Severity::Debug, message.into(), Location::caller());
    }

    /// Deferred `debug`: the producer runs only when the severity is enabled
    #[track_caller]
    pub fn debug_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        if !self.debug_enabled() {
            return;
        }
        let message = producer().to_string();
        self.emit(Severity::Debug, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn info<'a>(&self, message: impl Into<Payload<'a>>) {
        if !self.info_enabled() {
            return;
        }
        self.emit(Severity::Info, message.into(), Location::caller());
    }

    /// Deferred `info`: the producer runs only when the severity is enabled
    #[track_caller]
    pub fn info_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        if !self.info_enabled() {
            return;
        }
        let message = producer().to_string();
        self.emit(Severity::Info, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn warn<'a>(&self, message: impl Into<Payload<'a>>) {
        if !self.warn_enabled() {
            return;
        }
        self.emit(Severity::Warn, message.into(), Location::caller());
    }

    /// Deferred `warn`: the producer runs only when the severity is enabled
    #[track_caller]
    pub fn warn_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        if !self.warn_enabled() {
            return;
        }
        let message = producer().to_string();
        self.emit(Severity::Warn, message.into(), Location::caller());
    }

    /// `error` records cannot be suppressed by threshold
    #[track_caller]
    pub fn error<'a>(&self, message: impl Into<Payload<'a>>) {
        self.emit(Severity::Error, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn error_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        let message = producer().to_string();
        self.emit(Severity::Error, message.into(), Location::caller());
    }

    /// Explicit message plus explicit error at `error` severity
    #[track_caller]
    pub fn log_error(&self, message: impl fmt::Display, error: &(dyn Error + 'static)) {
        self.emit_with_error(Severity::Error, &message.to_string(), error, Location::caller());
    }

    /// `fatal` records cannot be suppressed by threshold
    #[track_caller]
    pub fn fatal<'a>(&self, message: impl Into<Payload<'a>>) {
        self.emit(Severity::Fatal, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn fatal_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        let message = producer().to_string();
        self.emit(Severity::Fatal, message.into(), Location::caller());
    }

    /// Explicit message plus explicit error at `fatal` severity
    #[track_caller]
    pub fn log_fatal(&self, message: impl fmt::Display, error: &(dyn Error + 'static)) {
        self.emit_with_error(Severity::Fatal, &message.to_string(), error, Location::caller());
    }

    /// `unknown` records cannot be suppressed by threshold
    #[track_caller]
    pub fn unknown<'a>(&self, message: impl Into<Payload<'a>>) {
        self.emit(Severity::Unknown, message.into(), Location::caller());
    }

    #[track_caller]
    pub fn unknown_with<T: fmt::Display>(&self, producer: impl FnOnce() -> T) {
        let message = producer().to_string();
        self.emit(Severity::Unknown, message.into(), Location::caller());
    }

    /// Explicit message plus explicit error at `unknown` severity
    #[track_caller]
    pub fn log_unknown(&self, message: impl fmt::Display, error: &(dyn Error + 'static)) {
        self.emit_with_error(Severity::Unknown, &message.to_string(), error, Location::caller());
    }

    /// No-op; present for frameworks that flush their logger
    pub fn flush(&self) {}

    /// The wrapped engine logger, for configuration the facade does not cover
    pub fn engine_logger(&self) -> Arc<dyn EngineLogger> {
        self.handle.clone()
    }

    fn emit(&self, severity: Severity, payload: Payload<'_>, location: &'static Location<'static>) {
        let (text, error) = message::normalize(payload);
        self.forward(severity, &text, error, location);
    }

    fn emit_with_error(
        &self,
        severity: Severity,
        text: &str,
        error: &(dyn Error + 'static),
        location: &'static Location<'static>,
    ) {
        let rendered = message::with_error(text, error);
        self.forward(severity, &rendered, Some(error), location);
    }

    fn forward(
        &self,
        severity: Severity,
        text: &str,
        error: Option<&(dyn Error + 'static)>,
        location: &'static Location<'static>,
    ) {
        let frame = if self.tracing_enabled() {
            CallerFrame::from_location(location)
        } else {
            CallerFrame::blank()
        };
        let _scope = ContextScope::enter(self.context.clone(), &frame);
        self.handle.log(severity.to_engine(), text, error);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("tracing", &self.tracing())
            .finish()
    }
}
