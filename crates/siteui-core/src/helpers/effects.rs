#![forbid(unsafe_code)]

//! Inline-style effects: card hover and the page loader fade-out.

use core::time::Duration;

/// One inline style write. An empty `value` clears the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleWrite {
    pub property: &'static str,
    pub value: &'static str,
}

impl StyleWrite {
    const fn set(property: &'static str, value: &'static str) -> Self {
        Self { property, value }
    }

    const fn clear(property: &'static str) -> Self {
        Self { property, value: "" }
    }
}

/// Hover treatments applied on `mouseenter` and undone on `mouseleave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEffect {
    ServiceCard,
    TeamImage,
}

const CARD_ENTER: [StyleWrite; 2] = [
    StyleWrite::set("transform", "translateY(-8px) scale(1.02)"),
    StyleWrite::set("box-shadow", "0 12px 40px rgba(0, 0, 0, 0.2)"),
];
const CARD_LEAVE: [StyleWrite; 2] = [
    StyleWrite::clear("transform"),
    StyleWrite::clear("box-shadow"),
];
const IMAGE_ENTER: [StyleWrite; 2] = [
    StyleWrite::set("transform", "scale(1.05)"),
    StyleWrite::set("filter", "brightness(1.1)"),
];
const IMAGE_LEAVE: [StyleWrite; 2] = [StyleWrite::clear("transform"), StyleWrite::clear("filter")];

impl HoverEffect {
    #[must_use]
    pub fn styles(self, hovering: bool) -> &'static [StyleWrite] {
        match (self, hovering) {
            (Self::ServiceCard, true) => &CARD_ENTER,
            (Self::ServiceCard, false) => &CARD_LEAVE,
            (Self::TeamImage, true) => &IMAGE_ENTER,
            (Self::TeamImage, false) => &IMAGE_LEAVE,
        }
    }
}

/// A step of the loader fade, run `delay` after the window `load` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderStep {
    pub delay: Duration,
    pub write: StyleWrite,
}

/// Fade to transparent immediately, then remove from layout after `fade`.
#[must_use]
pub fn loader_schedule(fade: Duration) -> [LoaderStep; 2] {
    [
        LoaderStep {
            delay: Duration::ZERO,
            write: StyleWrite::set("opacity", "0"),
        },
        LoaderStep {
            delay: fade,
            write: StyleWrite::set("display", "none"),
        },
    ]
}
