#![forbid(unsafe_code)]

//! Structured reports for uncaught page errors.
//!
//! The web layer builds an [`ErrorReport`] from `error` / `unhandledrejection`
//! events and from initialization failures, then logs it. Reports are never
//! retried, sent anywhere, or shown to the visitor.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Where an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Window `error` event.
    Uncaught,
    /// Window `unhandledrejection` event.
    UnhandledRejection,
    /// Failure while wiring the page.
    Init,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uncaught => "uncaught error",
            Self::UnhandledRejection => "unhandled promise rejection",
            Self::Init => "initialization error",
        })
    }
}

/// One logged error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub stack: Option<String>,
    /// ISO-8601, as produced by `Date.prototype.toISOString`.
    pub timestamp: String,
    pub user_agent: String,
    pub url: String,
}

impl ErrorReport {
    /// A report with an empty context; fill it with the `with_*` builders.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            message: if message.is_empty() {
                "unknown error".to_owned()
            } else {
                message
            },
            stack: None,
            timestamp: String::new(),
            user_agent: String::new(),
            url: String::new(),
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, user_agent: impl Into<String>, url: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self.url = url.into();
        self
    }

    /// Emit the report through `tracing` at error level.
    pub fn log(&self) {
        tracing::error!(
            kind = %self.kind,
            message = %self.message,
            stack = self.stack.as_deref().unwrap_or(""),
            timestamp = %self.timestamp,
            user_agent = %self.user_agent,
            url = %self.url,
            "page error"
        );
    }

    #[cfg(feature = "serde")]
    #[must_use]
    pub fn to_json(&self) -> String {
        // Only strings and unit variants; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.url.is_empty() {
            write!(f, " ({})", self.url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn sample() -> ErrorReport {
        ErrorReport::new(ErrorKind::Uncaught, "x is not defined")
            .with_stack(Some("at main.js:1".into()))
            .with_timestamp("2024-05-01T09:30:00.000Z")
            .with_context("Mozilla/5.0", "https://example.com/#team")
    }

    #[test]
    fn display_includes_kind_and_url() {
        assert_eq!(
            sample().to_string(),
            "uncaught error: x is not defined (https://example.com/#team)"
        );
    }

    #[test]
    fn empty_message_and_stack_are_normalized() {
        let report =
            ErrorReport::new(ErrorKind::UnhandledRejection, "").with_stack(Some(String::new()));
        assert_eq!(report.message, "unknown error");
        assert_eq!(report.stack, None);
        assert_eq!(report.to_string(), "unhandled promise rejection: unknown error");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_uses_camel_case_fields() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json()).unwrap();
        assert_eq!(value["kind"], "uncaught");
        assert_eq!(value["userAgent"], "Mozilla/5.0");
        assert_eq!(value["timestamp"], "2024-05-01T09:30:00.000Z");
        assert_eq!(value["stack"], "at main.js:1");
    }
}
