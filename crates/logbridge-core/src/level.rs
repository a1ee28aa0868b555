//! Severity scales and the translation between them
//!
//! The facade exposes the conventional six-value scale ([`Severity`]);
//! the engine side is modeled as a closed enum owned by this crate
//! ([`EngineLevel`]) so the translation boundary stays explicit and
//! testable on its own. `Trace` and `Off` exist only on the engine side
//! and have no facade mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Facade-side severity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Verbose diagnostics
    Debug,
    /// General information
    Info,
    /// Possible problems
    Warn,
    /// Failures of a single operation
    Error,
    /// Failures the process cannot recover from
    Fatal,
    /// Records that must always be logged regardless of threshold
    Unknown,
}

/// Engine-side severity scale, ordered by threshold strength
///
/// `All` is the permit-everything sentinel, `Off` suppresses
/// everything. Neither `Trace` nor `Off` maps onto the facade scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EngineLevel {
    All,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

impl Severity {
    /// Translate to the engine scale. Total: every facade severity has
    /// an engine counterpart, with `Unknown` mapping to the
    /// permit-everything sentinel.
    pub fn to_engine(self) -> EngineLevel {
        match self {
            Severity::Debug => EngineLevel::Debug,
            Severity::Info => EngineLevel::Info,
            Severity::Warn => EngineLevel::Warn,
            Severity::Error => EngineLevel::Error,
            Severity::Fatal => EngineLevel::Fatal,
            Severity::Unknown => EngineLevel::All,
        }
    }

    /// Translate from the engine scale.
    ///
    /// An engine level outside the mapped set is an integration bug,
    /// never silently coerced.
    pub fn try_from_engine(level: EngineLevel) -> BridgeResult<Severity> {
        match level {
            EngineLevel::All => Ok(Severity::Unknown),
            EngineLevel::Debug => Ok(Severity::Debug),
            EngineLevel::Info => Ok(Severity::Info),
            EngineLevel::Warn => Ok(Severity::Warn),
            EngineLevel::Error => Ok(Severity::Error),
            EngineLevel::Fatal => Ok(Severity::Fatal),
            EngineLevel::Trace | EngineLevel::Off => Err(BridgeError::unsupported_level(level)),
        }
    }

    /// Uppercase name, as appender layouts print it
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = BridgeError;

    /// Case-insensitive severity name; anything else fails
    fn from_str(s: &str) -> BridgeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "unknown" => Ok(Severity::Unknown),
            _ => Err(BridgeError::unsupported_level(s)),
        }
    }
}

impl fmt::Display for EngineLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineLevel::All => "ALL",
            EngineLevel::Trace => "TRACE",
            EngineLevel::Debug => "DEBUG",
            EngineLevel::Info => "INFO",
            EngineLevel::Warn => "WARN",
            EngineLevel::Error => "ERROR",
            EngineLevel::Fatal => "FATAL",
            EngineLevel::Off => "OFF",
        };
        f.write_str(name)
    }
}

/// Accepted inputs to [`crate::Logger::set_level`]: the facade's own
/// severities or the engine's native levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSpec {
    /// A facade severity
    Facade(Severity),
    /// A native engine level; must belong to the mapped set
    Native(EngineLevel),
}

impl LevelSpec {
    /// Resolve to the engine level to install, rejecting native levels
    /// with no facade counterpart
    pub(crate) fn resolve(self) -> BridgeResult<EngineLevel> {
        match self {
            LevelSpec::Facade(severity) => Ok(severity.to_engine()),
            LevelSpec::Native(level) => {
                Severity::try_from_engine(level)?;
                Ok(level)
            }
        }
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        LevelSpec::Facade(severity)
    }
}

impl From<EngineLevel> for LevelSpec {
    fn from(level: EngineLevel) -> Self {
        LevelSpec::Native(level)
    }
}
