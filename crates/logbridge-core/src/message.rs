//! Normalization of the accepted call shapes into (text, associated error)
//!
//! Severity methods accept plain text or an error-like value; the
//! explicit-error variants add a separate error argument. Whatever the
//! shape, the engine is handed one rendered text plus at most one
//! associated error.

use std::borrow::Cow;
use std::error::Error;

/// Message argument of a severity call
pub enum Payload<'a> {
    /// Plain text, borrowed or owned
    Text(Cow<'a, str>),
    /// Error-like value; rendered into the text and forwarded as the
    /// associated error
    Failure(&'a (dyn Error + 'static)),
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Payload<'static> {
    fn from(text: String) -> Self {
        Payload::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a (dyn Error + 'static)> for Payload<'a> {
    fn from(error: &'a (dyn Error + 'static)) -> Self {
        Payload::Failure(error)
    }
}

impl<'a, E: Error + 'static> From<&'a E> for Payload<'a> {
    fn from(error: &'a E) -> Self {
        Payload::Failure(error)
    }
}

/// Render the message shape into text plus the associated error
pub(crate) fn normalize(payload: Payload<'_>) -> (String, Option<&(dyn Error + 'static)>) {
    match payload {
        Payload::Text(text) => (text.into_owned(), None),
        Payload::Failure(error) => (render_error(error), Some(error)),
    }
}

/// Explicit message plus explicit error: nested causes are concatenated
/// into the text so the whole chain survives even when the output layer
/// prints only the message
pub(crate) fn with_error(message: &str, error: &(dyn Error + 'static)) -> String {
    let mut text = message.to_string();
    append_causes(&mut text, error.source());
    text
}

/// Description plus the full cause chain, one line per cause
pub(crate) fn render_error(error: &(dyn Error + 'static)) -> String {
    let mut text = error.to_string();
    append_causes(&mut text, error.source());
    text
}

fn append_causes(text: &mut String, mut cause: Option<&(dyn Error + 'static)>) {
    while let Some(current) = cause {
        text.push_str("\n  caused by: ");
        text.push_str(&current.to_string());
        cause = current.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct ChainedError {
        message: &'static str,
        cause: Option<Box<ChainedError>>,
    }

    impl ChainedError {
        fn new(message: &'static str) -> Self {
            Self { message, cause: None }
        }

        fn with_cause(message: &'static str, cause: ChainedError) -> Self {
            Self {
                message,
                cause: Some(Box::new(cause)),
            }
        }
    }

    impl fmt::Display for ChainedError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for ChainedError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
        }
    }

    #[test]
    fn test_text_payload_passes_through() {
        let (text, error) = normalize(Payload::from("plain message"));
        assert_eq!(text, "plain message");
        assert!(error.is_none());
    }

    #[test]
    fn test_owned_text_payload() {
        let (text, error) = normalize(Payload::from(String::from("owned")));
        assert_eq!(text, "owned");
        assert!(error.is_none());
    }

    #[test]
    fn test_error_payload_travels_as_associated_error() {
        let failure = ChainedError::new("boom");
        let (text, error) = normalize(Payload::from(&failure));
        assert_eq!(text, "boom");
        assert_eq!(error.map(|e| e.to_string()).as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_payload_renders_cause_chain() {
        let failure =
            ChainedError::with_cause("request failed", ChainedError::with_cause("socket closed", ChainedError::new("reset by peer")));
        let (text, _) = normalize(Payload::from(&failure));
        assert_eq!(
            text,
            "request failed\n  caused by: socket closed\n  caused by: reset by peer"
        );
    }

    #[test]
    fn test_with_error_keeps_message_and_appends_causes() {
        let failure = ChainedError::with_cause("socket closed", ChainedError::new("reset by peer"));
        let text = with_error("request failed", &failure);
        assert_eq!(
            text,
            "request failed\n  caused by: reset by peer"
        );
    }

    #[test]
    fn test_with_error_without_cause_is_just_the_message() {
        let failure = ChainedError::new("boom");
        assert_eq!(with_error("context", &failure), "context");
    }

    #[test]
    fn test_dyn_error_payload() {
        let failure = ChainedError::new("boom");
        let dynamic: &(dyn Error + 'static) = &failure;
        let (text, error) = normalize(Payload::from(dynamic));
        assert_eq!(text, "boom");
        assert!(error.is_some());
    }
}
