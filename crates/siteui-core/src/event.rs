#![forbid(unsafe_code)]

//! Canonical page events and the subscription plan the host must wire.

use core::fmt;

/// Keys the page script distinguishes. Everything else is [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab { shift: bool },
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str, shift: bool) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Tab" => Self::Tab { shift },
            _ => Self::Other,
        }
    }

    /// DOM `key` string for this key (lossy for [`Key::Other`]).
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Space => " ",
            Self::Tab { .. } => "Tab",
            Self::Other => "Unidentified",
        }
    }

    /// Keys that activate a focused link.
    #[must_use]
    pub const fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// One browser event, already reduced to what the coordinator needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Window scroll; carries the offset and the viewport width at that time.
    Scroll { y: f64, width: f64 },
    /// Window resize.
    Resize { width: f64 },
    /// Click on the hamburger toggle.
    ToggleClick,
    /// Click anywhere on the document. `inside_menu` is true when the target
    /// is the toggle, the panel, or one of their descendants.
    DocumentClick { inside_menu: bool },
    /// Document keydown.
    Key { key: Key },
    /// Click on a navigation link.
    AnchorClick { href: String },
    /// Click on the back-to-top button.
    BackToTopClick,
}

impl PageEvent {
    /// Subscription category this event arrives through.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::WindowScroll,
            Self::Resize { .. } => EventKind::WindowResize,
            Self::ToggleClick => EventKind::ToggleClick,
            Self::DocumentClick { .. } => EventKind::DocumentClick,
            Self::Key { .. } => EventKind::DocumentKeydown,
            Self::AnchorClick { .. } => EventKind::AnchorClick,
            Self::BackToTopClick => EventKind::BackToTopClick,
        }
    }
}

/// Subscription categories the host wires to DOM listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    WindowScroll,
    WindowResize,
    ToggleClick,
    DocumentClick,
    DocumentKeydown,
    AnchorClick,
    BackToTopClick,
}

impl EventKind {
    pub const ALL: [Self; 7] = [
        Self::WindowScroll,
        Self::WindowResize,
        Self::ToggleClick,
        Self::DocumentClick,
        Self::DocumentKeydown,
        Self::AnchorClick,
        Self::BackToTopClick,
    ];

    /// DOM event type name.
    #[must_use]
    pub const fn dom_type(self) -> &'static str {
        match self {
            Self::WindowScroll => "scroll",
            Self::WindowResize => "resize",
            Self::ToggleClick | Self::DocumentClick | Self::AnchorClick | Self::BackToTopClick => {
                "click"
            }
            Self::DocumentKeydown => "keydown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WindowScroll => "window_scroll",
            Self::WindowResize => "window_resize",
            Self::ToggleClick => "toggle_click",
            Self::DocumentClick => "document_click",
            Self::DocumentKeydown => "document_keydown",
            Self::AnchorClick => "anchor_click",
            Self::BackToTopClick => "back_to_top_click",
        };
        f.write_str(label)
    }
}

/// The set of subscriptions a page needs, in registration order.
///
/// Produced by `ViewportCoordinator::attach`. Kinds whose target elements are
/// missing are left out, which is how absent elements disable behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiringPlan {
    kinds: Vec<EventKind>,
}

impl WiringPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind; duplicates are ignored so each listener is registered once.
    pub fn subscribe(&mut self, kind: EventKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    #[must_use]
    pub fn contains(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    #[must_use]
    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn dom_keys_map_to_canonical_keys() {
        assert_eq!(Key::from_dom("Escape", false), Key::Escape);
        assert_eq!(Key::from_dom("Esc", false), Key::Escape);
        assert_eq!(Key::from_dom(" ", false), Key::Space);
        assert_eq!(Key::from_dom("Tab", true), Key::Tab { shift: true });
        assert_eq!(Key::from_dom("a", false), Key::Other);
        assert!(Key::Enter.activates());
        assert!(!Key::Escape.activates());
    }

    #[test]
    fn event_kind_routes() {
        assert_eq!(
            PageEvent::Scroll {
                y: 1.0,
                width: 1.0
            }
            .kind(),
            EventKind::WindowScroll
        );
        assert_eq!(
            PageEvent::Key { key: Key::Escape }.kind(),
            EventKind::DocumentKeydown
        );
        assert_eq!(EventKind::BackToTopClick.dom_type(), "click");
        assert_eq!(EventKind::DocumentKeydown.to_string(), "document_keydown");
    }

    #[test]
    fn wiring_plan_deduplicates() {
        let mut plan = WiringPlan::new();
        plan.subscribe(EventKind::WindowScroll);
        plan.subscribe(EventKind::WindowScroll);
        plan.subscribe(EventKind::AnchorClick);
        assert_eq!(
            plan.kinds(),
            &[EventKind::WindowScroll, EventKind::AnchorClick]
        );
        assert!(plan.contains(EventKind::AnchorClick));
        assert!(!plan.contains(EventKind::ToggleClick));
    }
}
