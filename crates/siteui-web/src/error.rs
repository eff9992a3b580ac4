#![forbid(unsafe_code)]

use core::fmt;

use siteui_core::ConfigError;
use siteui_core::event_parser::EventParseError;

/// Errors surfaced by the web runner.
#[derive(Debug)]
pub enum SiteError {
    /// The JSON config was malformed or out of range.
    Config(ConfigError),
    /// A `pushEncodedEvent` payload could not be decoded.
    Event(EventParseError),
    /// No `window` / `document` (not running in a browser page).
    NoDom(&'static str),
    /// `mount()` on a runner that is already mounted.
    AlreadyMounted,
    /// A DOM call threw.
    Js(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Event(e) => write!(f, "event error: {e}"),
            Self::NoDom(what) => write!(f, "no {what} available"),
            Self::AlreadyMounted => write!(f, "runner is already mounted"),
            Self::Js(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Event(e) => Some(e),
            Self::NoDom(_) | Self::AlreadyMounted | Self::Js(_) => None,
        }
    }
}

impl From<ConfigError> for SiteError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EventParseError> for SiteError {
    fn from(e: EventParseError) -> Self {
        Self::Event(e)
    }
}
