//! Caller-location capture and the scoped diagnostic-context window
//!
//! While a record is in flight, three fixed keys describe the call
//! site to the engine's output layer. They are installed just before
//! the engine is invoked and taken down again on every exit path.

use std::panic::Location;
use std::sync::Arc;

use crate::engine::DiagnosticContext;

/// Diagnostic-context key for the caller's file path
pub const FILE_NAME_KEY: &str = "fileName";
/// Diagnostic-context key for the caller's line number
pub const LINE_NUMBER_KEY: &str = "lineNumber";
/// Diagnostic-context key for the caller's method descriptor
pub const METHOD_NAME_KEY: &str = "methodName";

/// Caller location as the three string fields exposed to output layouts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerFrame {
    /// Source file path
    pub file: String,
    /// Line number, kept as text
    pub line: String,
    /// Method descriptor; empty when unavailable
    pub method: String,
}

impl CallerFrame {
    /// Empty-string placeholders, used when tracing is off
    pub fn blank() -> Self {
        Self::default()
    }

    /// Capture from a `#[track_caller]` location.
    ///
    /// `Location` carries no method name, so `method` stays empty on
    /// this path.
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line().to_string(),
            method: String::new(),
        }
    }

    /// Parse a frame descriptor of the form
    /// `` path:lineNumber(:in `method')? ``.
    ///
    /// Returns `None` when the descriptor does not match; callers fall
    /// back to blank fields rather than failing the log call.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let bytes = descriptor.as_bytes();
        // the first ':' followed by a digit splits path from line number
        let split = bytes.iter().enumerate().position(|(index, byte)| {
            *byte == b':' && bytes.get(index + 1).is_some_and(|next| next.is_ascii_digit())
        })?;
        if split == 0 {
            return None;
        }
        let rest = &descriptor[split + 1..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let method = rest[digits..]
            .strip_prefix(":in `")
            .and_then(|tail| tail.rfind('\'').map(|end| &tail[..end]))
            .unwrap_or("");
        Some(Self {
            file: descriptor[..split].to_string(),
            line: rest[..digits].to_string(),
            method: method.to_string(),
        })
    }

    /// [`parse`](Self::parse), degrading to blank fields on a malformed
    /// descriptor. Failing to describe a call site must never fail the
    /// log call itself.
    pub fn parse_or_blank(descriptor: &str) -> Self {
        Self::parse(descriptor).unwrap_or_default()
    }
}

/// Installs the caller-location keys for the duration of one emission.
///
/// Prior bindings are reinstated on drop, so re-entrant log calls on
/// the same thread keep their outer context. Drop runs on every exit
/// path, including a panic raised below the engine call.
pub(crate) struct ContextScope {
    context: Arc<dyn DiagnosticContext>,
    saved: [(&'static str, Option<String>); 3],
}

impl ContextScope {
    pub(crate) fn enter(context: Arc<dyn DiagnosticContext>, frame: &CallerFrame) -> Self {
        let saved =
            [FILE_NAME_KEY, LINE_NUMBER_KEY, METHOD_NAME_KEY].map(|key| (key, context.get(key)));
        context.put(FILE_NAME_KEY, &frame.file);
        context.put(LINE_NUMBER_KEY, &frame.line);
        context.put(METHOD_NAME_KEY, &frame.method);
        Self { context, saved }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => self.context.put(key, value),
                None => self.context.remove(key),
            }
        }
    }
}
