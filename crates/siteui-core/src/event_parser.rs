#![forbid(unsafe_code)]

//! JSON encoding of [`PageEvent`]s.
//!
//! Used by the web runner's `pushEncodedEvent` export (test pages and replay
//! tooling drive the coordinator without real DOM events) and by the JSONL
//! form of session traces.
//!
//! ```json
//! {"kind":"scroll","y":260,"width":375}
//! {"kind":"key","key":"Escape","shift":false}
//! {"kind":"anchor","href":"#services"}
//! ```

use serde::Deserialize;
use serde_json::json;

use crate::event::{Key, PageEvent};

/// Errors from parsing encoded event JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown `kind` value.
    UnknownKind(String),
}

impl core::fmt::Display for EventParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownKind(kind) => write!(f, "unknown event kind: {kind}"),
        }
    }
}

impl std::error::Error for EventParseError {}

#[derive(Debug, Deserialize)]
struct RawEvent {
    kind: String,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    inside_menu: Option<bool>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    shift: Option<bool>,
    #[serde(default)]
    href: Option<String>,
}

/// Parse one JSON-encoded page event.
pub fn parse_encoded_event(json: &str) -> Result<PageEvent, EventParseError> {
    let raw: RawEvent =
        serde_json::from_str(json).map_err(|e| EventParseError::Json(e.to_string()))?;
    from_raw(raw)
}

/// Parse from an already-decoded JSON value (JSONL trace lines embed events).
pub fn parse_event_value(value: serde_json::Value) -> Result<PageEvent, EventParseError> {
    let raw: RawEvent =
        serde_json::from_value(value).map_err(|e| EventParseError::Json(e.to_string()))?;
    from_raw(raw)
}

fn from_raw(raw: RawEvent) -> Result<PageEvent, EventParseError> {
    match raw.kind.as_str() {
        "scroll" => Ok(PageEvent::Scroll {
            y: raw.y.ok_or(EventParseError::MissingField("y"))?,
            width: raw.width.ok_or(EventParseError::MissingField("width"))?,
        }),
        "resize" => Ok(PageEvent::Resize {
            width: raw.width.ok_or(EventParseError::MissingField("width"))?,
        }),
        "toggle" => Ok(PageEvent::ToggleClick),
        "click" => Ok(PageEvent::DocumentClick {
            inside_menu: raw.inside_menu.unwrap_or(false),
        }),
        "key" => {
            let key = raw.key.ok_or(EventParseError::MissingField("key"))?;
            Ok(PageEvent::Key {
                key: Key::from_dom(&key, raw.shift.unwrap_or(false)),
            })
        }
        "anchor" => Ok(PageEvent::AnchorClick {
            href: raw.href.ok_or(EventParseError::MissingField("href"))?,
        }),
        "back_to_top" => Ok(PageEvent::BackToTopClick),
        other => Err(EventParseError::UnknownKind(other.to_owned())),
    }
}

/// Encode an event as a JSON value in the schema [`parse_encoded_event`] reads.
#[must_use]
pub fn event_to_value(event: &PageEvent) -> serde_json::Value {
    match event {
        PageEvent::Scroll { y, width } => json!({"kind": "scroll", "y": y, "width": width}),
        PageEvent::Resize { width } => json!({"kind": "resize", "width": width}),
        PageEvent::ToggleClick => json!({"kind": "toggle"}),
        PageEvent::DocumentClick { inside_menu } => {
            json!({"kind": "click", "inside_menu": inside_menu})
        }
        PageEvent::Key { key } => {
            let shift = matches!(key, Key::Tab { shift: true });
            json!({"kind": "key", "key": key.dom_name(), "shift": shift})
        }
        PageEvent::AnchorClick { href } => json!({"kind": "anchor", "href": href}),
        PageEvent::BackToTopClick => json!({"kind": "back_to_top"}),
    }
}

/// Encode an event as a compact JSON string.
#[must_use]
pub fn encode_event(event: &PageEvent) -> String {
    event_to_value(event).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn parses_scroll_with_width() {
        assert_eq!(
            parse_encoded_event(r#"{"kind":"scroll","y":260,"width":375}"#),
            Ok(PageEvent::Scroll {
                y: 260.0,
                width: 375.0
            })
        );
    }

    #[test]
    fn parses_keys_through_dom_names() {
        assert_eq!(
            parse_encoded_event(r#"{"kind":"key","key":"Escape"}"#),
            Ok(PageEvent::Key { key: Key::Escape })
        );
        assert_eq!(
            parse_encoded_event(r#"{"kind":"key","key":"Tab","shift":true}"#),
            Ok(PageEvent::Key {
                key: Key::Tab { shift: true }
            })
        );
    }

    #[test]
    fn click_defaults_to_outside() {
        assert_eq!(
            parse_encoded_event(r#"{"kind":"click"}"#),
            Ok(PageEvent::DocumentClick { inside_menu: false })
        );
    }

    #[test]
    fn reports_missing_fields_and_unknown_kinds() {
        assert_eq!(
            parse_encoded_event(r#"{"kind":"scroll","y":1}"#),
            Err(EventParseError::MissingField("width"))
        );
        assert_eq!(
            parse_encoded_event(r#"{"kind":"anchor"}"#),
            Err(EventParseError::MissingField("href"))
        );
        assert_eq!(
            parse_encoded_event(r#"{"kind":"wheel"}"#),
            Err(EventParseError::UnknownKind("wheel".into()))
        );
        assert!(matches!(
            parse_encoded_event("nope"),
            Err(EventParseError::Json(_))
        ));
    }

    #[test]
    fn shift_tab_encodes_shift_flag() {
        let value = event_to_value(&PageEvent::Key {
            key: Key::Tab { shift: true },
        });
        assert_eq!(value["key"], "Tab");
        assert_eq!(value["shift"], true);
        assert_eq!(encode_event(&PageEvent::BackToTopClick), r#"{"kind":"back_to_top"}"#);
    }
}
