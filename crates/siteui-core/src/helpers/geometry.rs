#![forbid(unsafe_code)]

//! Element geometry utilities exposed to page scripts.

use crate::page::Page;
use crate::state::sanitize_offset;

/// A client rect (`getBoundingClientRect`), in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

/// Whether `rect` lies entirely inside a `width` x `height` viewport.
#[must_use]
pub fn is_rect_in_viewport(rect: Rect, width: f64, height: f64) -> bool {
    rect.top >= 0.0 && rect.left >= 0.0 && rect.bottom <= height && rect.right <= width
}

/// Smooth-scroll so element `id` sits `offset` pixels below the window top.
///
/// Returns the requested scroll position, or `None` if the element does not
/// exist or the scroll could not be issued.
pub fn scroll_to_element<P: Page>(page: &mut P, id: &str, offset: f64) -> Option<f64> {
    let top = sanitize_offset(page.section_top(id)? - offset);
    match page.scroll_to(top) {
        Ok(()) => Some(top),
        Err(err) => {
            tracing::warn!(id, error = %err, "scroll_to_element failed");
            None
        }
    }
}
