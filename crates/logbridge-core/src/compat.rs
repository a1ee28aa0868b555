//! Narrowed std-logger interface compatibility
//!
//! The mimicked logger interface carries a formatter and a log-device
//! slot. Both belong to the engine's output layer here, so the facade
//! keeps the names but refuses to construct them.

use crate::error::{BridgeError, BridgeResult};

/// Formatter slot of the mimicked interface; construction always fails
#[derive(Debug)]
pub struct Formatter {
    _private: (),
}

impl Formatter {
    pub fn new() -> BridgeResult<Self> {
        Err(BridgeError::Unimplemented {
            feature: "Formatter",
        })
    }
}

/// Log-device slot of the mimicked interface; construction always fails
#[derive(Debug)]
pub struct LogDevice {
    _private: (),
}

impl LogDevice {
    pub fn new() -> BridgeResult<Self> {
        Err(BridgeError::Unimplemented {
            feature: "LogDevice",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_refuses_construction() {
        let err = Formatter::new().unwrap_err();
        assert!(matches!(err, BridgeError::Unimplemented { feature: "Formatter" }));
    }

    #[test]
    fn test_log_device_refuses_construction() {
        let err = LogDevice::new().unwrap_err();
        assert!(matches!(err, BridgeError::Unimplemented { feature: "LogDevice" }));
    }
}
