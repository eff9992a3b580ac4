#![forbid(unsafe_code)]

//! Stateless page helpers that run beside the coordinator.
//!
//! None of these touch [`UiState`](crate::state::UiState). The web layer
//! queries the DOM, hands plain values to these functions and applies what
//! comes back.

pub mod effects;
pub mod focus;
pub mod form;
pub mod geometry;
pub mod reveal;

pub use effects::{HoverEffect, LoaderStep, StyleWrite, loader_schedule};
pub use focus::{FOCUSABLE_SELECTOR, INTERACTIVE_SELECTOR, LiveRegion, focus_trap_target};
pub use form::{FieldError, FieldInput, FormReport, validate_fields};
pub use geometry::{Rect, is_rect_in_viewport, scroll_to_element};
pub use reveal::{LazyLoad, LoadStrategy, RevealTracker, lazy_load};
