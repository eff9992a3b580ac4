#![forbid(unsafe_code)]

//! Presentation state for one page view and its pure transitions.

use crate::config::ViewportConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navbar/menu/back-to-top presentation state.
///
/// Constructed once at startup and owned by the coordinator. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UiState {
    pub menu_open: bool,
    /// Only ever `true` on mobile-width viewports.
    pub navbar_hidden: bool,
    pub navbar_scrolled: bool,
    pub back_to_top_visible: bool,
    /// Last observed vertical scroll offset (>= 0).
    pub last_scroll_y: f64,
}

impl UiState {
    /// Fresh state for a page that was loaded at `scroll_y`.
    ///
    /// Only the direction baseline is seeded; the visual flags stay at their
    /// defaults until the first scroll event is admitted.
    #[must_use]
    pub fn new(scroll_y: f64) -> Self {
        Self {
            last_scroll_y: sanitize_offset(scroll_y),
            ..Self::default()
        }
    }

    /// Apply one admitted scroll observation.
    ///
    /// `navbar_hidden` follows scroll direction on mobile widths and is forced
    /// off on wider viewports.
    #[must_use]
    pub fn scrolled_to(self, y: f64, width: f64, viewport: &ViewportConfig) -> Self {
        let y = sanitize_offset(y);
        let navbar_hidden = if viewport.is_mobile(width) {
            y > self.last_scroll_y && y > viewport.hide_threshold_px
        } else {
            false
        };
        Self {
            navbar_scrolled: y > viewport.scrolled_threshold_px,
            navbar_hidden,
            back_to_top_visible: y > viewport.back_to_top_threshold_px,
            last_scroll_y: y,
            ..self
        }
    }

    /// Apply a debounced resize. Leaving the mobile layout closes the menu
    /// and shows the navbar.
    #[must_use]
    pub fn resized_to(self, width: f64, viewport: &ViewportConfig) -> Self {
        if viewport.is_mobile(width) {
            self
        } else {
            Self {
                menu_open: false,
                navbar_hidden: false,
                ..self
            }
        }
    }

    #[must_use]
    pub fn menu_toggled(self) -> Self {
        Self {
            menu_open: !self.menu_open,
            ..self
        }
    }

    #[must_use]
    pub fn menu_closed(self) -> Self {
        Self {
            menu_open: false,
            ..self
        }
    }

    /// Which presentation flags differ between `self` and `next`.
    #[must_use]
    pub fn changes(&self, next: &Self) -> StateChanges {
        StateChanges {
            menu: self.menu_open != next.menu_open,
            navbar_hidden: self.navbar_hidden != next.navbar_hidden,
            navbar_scrolled: self.navbar_scrolled != next.navbar_scrolled,
            back_to_top: self.back_to_top_visible != next.back_to_top_visible,
        }
    }

    /// Stable 64-bit fingerprint used by session checkpoints.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let flags = u64::from(self.menu_open)
            | u64::from(self.navbar_hidden) << 1
            | u64::from(self.navbar_scrolled) << 2
            | u64::from(self.back_to_top_visible) << 3;
        let hash = fnv1a64_u64(FNV_OFFSET_BASIS, flags);
        fnv1a64_u64(hash, self.last_scroll_y.to_bits())
    }
}

/// Flags touched by a transition; drives which page mutations are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChanges {
    pub menu: bool,
    pub navbar_hidden: bool,
    pub navbar_scrolled: bool,
    pub back_to_top: bool,
}

impl StateChanges {
    /// Every flag marked dirty (initial sync).
    pub const ALL: Self = Self {
        menu: true,
        navbar_hidden: true,
        navbar_scrolled: true,
        back_to_top: true,
    };

    #[must_use]
    pub const fn any(&self) -> bool {
        self.menu || self.navbar_hidden || self.navbar_scrolled || self.back_to_top
    }
}

/// Latest observed window metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub scroll_y: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, scroll_y: f64) -> Self {
        Self {
            width: if width.is_finite() { width.max(0.0) } else { 0.0 },
            scroll_y: sanitize_offset(scroll_y),
        }
    }
}

/// Scroll offsets are never negative (overscroll bounce reports < 0 on some
/// browsers) and never NaN.
#[must_use]
pub(crate) fn sanitize_offset(y: f64) -> f64 {
    if y.is_finite() { y.max(0.0) } else { 0.0 }
}

pub(crate) const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

pub(crate) fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

pub(crate) fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const MOBILE: f64 = 375.0;
    const DESKTOP: f64 = 1280.0;

    #[test]
    fn scrolled_variant_boundary_is_exclusive() {
        let v = ViewportConfig::default();
        assert!(!UiState::new(0.0).scrolled_to(100.0, DESKTOP, &v).navbar_scrolled);
        assert!(UiState::new(0.0).scrolled_to(100.5, DESKTOP, &v).navbar_scrolled);
    }

    #[test]
    fn back_to_top_boundary_is_exclusive() {
        let v = ViewportConfig::default();
        assert!(!UiState::new(0.0).scrolled_to(500.0, DESKTOP, &v).back_to_top_visible);
        assert!(UiState::new(0.0).scrolled_to(501.0, DESKTOP, &v).back_to_top_visible);
    }

    #[test]
    fn mobile_navbar_follows_direction() {
        let v = ViewportConfig::default();
        let s = UiState::new(0.0)
            .scrolled_to(250.0, MOBILE, &v)
            .scrolled_to(260.0, MOBILE, &v);
        assert!(s.navbar_hidden);
        let s = s.scrolled_to(240.0, MOBILE, &v);
        assert!(!s.navbar_hidden);
        assert_eq!(s.last_scroll_y, 240.0);
    }

    #[test]
    fn desktop_never_hides_navbar() {
        let v = ViewportConfig::default();
        let s = UiState::new(0.0)
            .scrolled_to(250.0, DESKTOP, &v)
            .scrolled_to(2_000.0, DESKTOP, &v);
        assert!(!s.navbar_hidden);
    }

    #[test]
    fn negative_and_nan_offsets_are_clamped() {
        let v = ViewportConfig::default();
        let s = UiState::new(f64::NAN).scrolled_to(-40.0, MOBILE, &v);
        assert_eq!(s.last_scroll_y, 0.0);
        assert!(!s.navbar_scrolled);
    }

    #[test]
    fn resize_to_desktop_closes_menu() {
        let v = ViewportConfig::default();
        let open = UiState::default().menu_toggled();
        assert!(open.resized_to(600.0, &v).menu_open);
        assert!(!open.resized_to(900.0, &v).menu_open);
    }

    #[test]
    fn resize_to_desktop_shows_hidden_navbar() {
        let v = ViewportConfig::default();
        let hidden = UiState::new(250.0).scrolled_to(400.0, MOBILE, &v);
        assert!(hidden.navbar_hidden);
        assert!(hidden.resized_to(700.0, &v).navbar_hidden);

        let wide = hidden.resized_to(1_280.0, &v);
        assert!(!wide.navbar_hidden);
        assert_eq!(wide.last_scroll_y, 400.0);
        assert!(wide.navbar_scrolled);
    }

    #[test]
    fn changes_only_flags_that_differ() {
        let a = UiState::default();
        let b = a.menu_toggled();
        assert_eq!(
            a.changes(&b),
            StateChanges {
                menu: true,
                ..StateChanges::default()
            }
        );
        assert!(!a.changes(&a).any());
        assert!(StateChanges::ALL.any());
    }

    #[test]
    fn checksum_distinguishes_flags_and_offset() {
        let a = UiState::default();
        assert_eq!(a.checksum(), UiState::default().checksum());
        assert_ne!(a.checksum(), a.menu_toggled().checksum());
        assert_ne!(a.checksum(), UiState::new(1.0).checksum());
    }
}
