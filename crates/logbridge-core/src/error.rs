//! Facade error types

use thiserror::Error;

/// Errors that can occur at the facade boundary
///
/// Caller-frame parse failures are deliberately absent: a log call must
/// never fail because its own location could not be captured, so those
/// degrade to blank fields instead (see [`crate::context::CallerFrame`]).
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A level value with no mapping between the two severity scales
    #[error("unsupported level: {value}")]
    UnsupportedLevel { value: String },

    /// Construction of an interface-compatibility type the facade does not support
    #[error("{feature} is not implemented by this facade")]
    Unimplemented { feature: &'static str },
}

impl BridgeError {
    /// Create an unsupported-level error
    pub fn unsupported_level(value: impl ToString) -> Self {
        Self::UnsupportedLevel {
            value: value.to_string(),
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
