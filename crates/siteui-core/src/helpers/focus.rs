#![forbid(unsafe_code)]

//! Keyboard accessibility: anchor activation, Tab wrap-around and the live
//! region used to announce dynamic content.

/// Elements whose Enter/Space keydown is inspected.
pub const INTERACTIVE_SELECTOR: &str = "a, button, input, textarea, select";

/// Elements participating in the Tab focus cycle.
pub const FOCUSABLE_SELECTOR: &str = "a[href], button, textarea, input[type=\"text\"], \
     input[type=\"radio\"], input[type=\"checkbox\"], select";

/// Where focus must jump to keep Tab cycling inside the page.
///
/// `current` is the index of the focused element within the focusable list,
/// if focus is on one. Returns `Some(index)` only when the default move would
/// leave the list (Tab on the last element, Shift+Tab on the first); the
/// caller then prevents the default and focuses that element.
#[must_use]
pub fn focus_trap_target(len: usize, current: Option<usize>, shift: bool) -> Option<usize> {
    let last = len.checked_sub(1)?;
    match (current?, shift) {
        (0, true) => Some(last),
        (i, false) if i == last => Some(0),
        _ => None,
    }
}

/// The screen-reader-only announcement region appended to `<body>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRegion;

impl LiveRegion {
    pub const CLASS: &'static str = "sr-only";
    pub const ATTRIBUTES: [(&'static str, &'static str); 2] =
        [("aria-live", "polite"), ("aria-atomic", "true")];
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn tab_on_last_wraps_to_first() {
        assert_eq!(focus_trap_target(4, Some(3), false), Some(0));
        assert_eq!(focus_trap_target(4, Some(2), false), None);
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        assert_eq!(focus_trap_target(4, Some(0), true), Some(3));
        assert_eq!(focus_trap_target(4, Some(1), true), None);
    }

    #[test]
    fn focus_outside_list_is_left_alone() {
        assert_eq!(focus_trap_target(4, None, false), None);
        assert_eq!(focus_trap_target(0, Some(0), false), None);
    }

    #[test]
    fn single_element_wraps_onto_itself() {
        assert_eq!(focus_trap_target(1, Some(0), false), Some(0));
        assert_eq!(focus_trap_target(1, Some(0), true), Some(0));
    }
}
