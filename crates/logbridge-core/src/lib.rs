//! Logbridge Core
//!
//! Engine-agnostic leveled-logger facade. Code written against the
//! conventional six-severity logger interface drives a hierarchical
//! logging engine with its own severity scale, per-name logger tree
//! and thread-local diagnostic context; this crate keeps the two
//! models consistent without losing what either side expects.
//!
//! The pieces:
//! - severity translation between the facade scale and the engine
//!   scale ([`Severity`], [`EngineLevel`])
//! - a registry guaranteeing one facade instance per engine logger,
//!   with parent resolution along the dotted-name tree
//!   ([`LoggerRegistry`])
//! - per-call caller-location capture, scoped into the engine's
//!   diagnostic context and always taken down again ([`CallerFrame`])
//! - normalization of plain, deferred and message-plus-error call
//!   shapes into one (text, error) pair ([`Payload`])
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logbridge_core::{LoggerRegistry, ConsoleEngine, Severity};
//!
//! let registry = LoggerRegistry::new(Arc::new(ConsoleEngine::new()));
//! let logger = registry.lookup("db.pool");
//! logger.set_level(Severity::Info)?;
//! logger.set_tracing(true);
//!
//! logger.info("pool ready");
//! logger.debug_with(|| format!("expensive dump: {:?}", 1)); // skipped below Info
//! ```

pub mod error;
pub mod level;
pub mod engine;
pub mod message;
pub mod context;
pub mod registry;
pub mod logger;
pub mod compat;

// Re-export commonly used types
pub use error::{BridgeError, BridgeResult};
pub use level::{EngineLevel, LevelSpec, Severity};

pub use engine::{
    ConsoleEngine, DiagnosticContext, Engine, EngineLogger, LogRecord, MemoryEngine,
    ThreadLocalMdc,
};

pub use context::{CallerFrame, FILE_NAME_KEY, LINE_NUMBER_KEY, METHOD_NAME_KEY};

pub use message::Payload;

pub use registry::{global, install, LoggerAttributes, LoggerRegistry, DEFAULT_NAMESPACE};

pub use logger::Logger;

pub use compat::{Formatter, LogDevice};
