#![forbid(unsafe_code)]

//! The DOM boundary.
//!
//! The coordinator only ever talks to the page through [`Page`]: the browser
//! implementation lives in `siteui-web`, and [`RecordingPage`] is an
//! in-memory stand-in that captures every mutation for tests and replay.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Elements the coordinator reads and mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementRole {
    Navbar,
    MenuToggle,
    MenuPanel,
    BackToTop,
}

impl ElementRole {
    pub const ALL: [Self; 4] = [
        Self::Navbar,
        Self::MenuToggle,
        Self::MenuPanel,
        Self::BackToTop,
    ];
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Navbar => "navbar",
            Self::MenuToggle => "menu_toggle",
            Self::MenuPanel => "menu_panel",
            Self::BackToTop => "back_to_top",
        })
    }
}

/// CSS classes, inline styles and attributes the coordinator writes.
pub mod names {
    pub const CLASS_SCROLLED: &str = "scrolled";
    pub const CLASS_ACTIVE: &str = "active";
    pub const CLASS_VISIBLE: &str = "visible";
    pub const STYLE_TRANSFORM: &str = "transform";
    pub const TRANSFORM_HIDDEN: &str = "translateY(-100%)";
    pub const TRANSFORM_SHOWN: &str = "translateY(0)";
    pub const ATTR_ARIA_EXPANDED: &str = "aria-expanded";
    pub const ATTR_ARIA_LABEL: &str = "aria-label";
}

/// Presentation surface the coordinator mutates.
///
/// Mutations on an element that does not exist must not panic; implementations
/// either ignore them or report an error that the caller logs and drops.
pub trait Page {
    /// Platform-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// Whether the element for `role` exists on this page.
    fn has(&self, role: ElementRole) -> bool;

    /// Add (`on = true`) or remove a CSS class.
    fn set_class(&mut self, role: ElementRole, class: &str, on: bool) -> Result<(), Self::Error>;

    /// Set one inline style property.
    fn set_style(
        &mut self,
        role: ElementRole,
        property: &str,
        value: &str,
    ) -> Result<(), Self::Error>;

    fn set_attribute(
        &mut self,
        role: ElementRole,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error>;

    /// Smooth-scroll the window so its top edge sits at `top`.
    fn scroll_to(&mut self, top: f64) -> Result<(), Self::Error>;

    /// Document offset of the section with id `id`, if it exists.
    fn section_top(&self, id: &str) -> Option<f64>;
}

/// One captured page mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMutation {
    Class {
        role: ElementRole,
        class: String,
        on: bool,
    },
    Style {
        role: ElementRole,
        property: String,
        value: String,
    },
    Attribute {
        role: ElementRole,
        name: String,
        value: String,
    },
    ScrollTo {
        top: f64,
    },
}

/// Error from [`RecordingPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingPageError {
    /// The element is not part of the simulated page.
    MissingElement(ElementRole),
}

impl fmt::Display for RecordingPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(role) => write!(f, "missing element: {role}"),
        }
    }
}

impl std::error::Error for RecordingPageError {}

/// In-memory page that records mutations.
#[derive(Debug, Clone)]
pub struct RecordingPage {
    present: HashSet<ElementRole>,
    sections: HashMap<String, f64>,
    classes: HashMap<ElementRole, BTreeSet<String>>,
    styles: HashMap<ElementRole, BTreeMap<String, String>>,
    attributes: HashMap<ElementRole, BTreeMap<String, String>>,
    log: Vec<PageMutation>,
}

impl RecordingPage {
    /// A page containing every coordinator element and no sections.
    #[must_use]
    pub fn new() -> Self {
        Self::with_elements(ElementRole::ALL)
    }

    /// A page containing only `roles`.
    #[must_use]
    pub fn with_elements(roles: impl IntoIterator<Item = ElementRole>) -> Self {
        Self {
            present: roles.into_iter().collect(),
            sections: HashMap::new(),
            classes: HashMap::new(),
            styles: HashMap::new(),
            attributes: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// Remove an element from the page.
    #[must_use]
    pub fn without(mut self, role: ElementRole) -> Self {
        self.present.remove(&role);
        self
    }

    /// Register a section with its document offset.
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, top: f64) -> Self {
        self.sections.insert(id.into(), top);
        self
    }

    #[must_use]
    pub fn has_class(&self, role: ElementRole, class: &str) -> bool {
        self.classes
            .get(&role)
            .is_some_and(|set| set.contains(class))
    }

    #[must_use]
    pub fn style(&self, role: ElementRole, property: &str) -> Option<&str> {
        self.styles
            .get(&role)
            .and_then(|map| map.get(property))
            .map(String::as_str)
    }

    #[must_use]
    pub fn attribute(&self, role: ElementRole, name: &str) -> Option<&str> {
        self.attributes
            .get(&role)
            .and_then(|map| map.get(name))
            .map(String::as_str)
    }

    /// Every scroll request, in order.
    #[must_use]
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.log
            .iter()
            .filter_map(|m| match m {
                PageMutation::ScrollTo { top } => Some(*top),
                _ => None,
            })
            .collect()
    }

    /// Full mutation log.
    #[must_use]
    pub fn log(&self) -> &[PageMutation] {
        &self.log
    }

    /// Take the mutation log, leaving it empty. Current state is kept.
    pub fn take_log(&mut self) -> Vec<PageMutation> {
        std::mem::take(&mut self.log)
    }

    fn require(&self, role: ElementRole) -> Result<(), RecordingPageError> {
        if self.present.contains(&role) {
            Ok(())
        } else {
            Err(RecordingPageError::MissingElement(role))
        }
    }
}

impl Default for RecordingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for RecordingPage {
    type Error = RecordingPageError;

    fn has(&self, role: ElementRole) -> bool {
        self.present.contains(&role)
    }

    fn set_class(&mut self, role: ElementRole, class: &str, on: bool) -> Result<(), Self::Error> {
        self.require(role)?;
        let set = self.classes.entry(role).or_default();
        if on {
            set.insert(class.to_owned());
        } else {
            set.remove(class);
        }
        self.log.push(PageMutation::Class {
            role,
            class: class.to_owned(),
            on,
        });
        Ok(())
    }

    fn set_style(
        &mut self,
        role: ElementRole,
        property: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        self.require(role)?;
        self.styles
            .entry(role)
            .or_default()
            .insert(property.to_owned(), value.to_owned());
        self.log.push(PageMutation::Style {
            role,
            property: property.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn set_attribute(
        &mut self,
        role: ElementRole,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        self.require(role)?;
        self.attributes
            .entry(role)
            .or_default()
            .insert(name.to_owned(), value.to_owned());
        self.log.push(PageMutation::Attribute {
            role,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn scroll_to(&mut self, top: f64) -> Result<(), Self::Error> {
        self.log.push(PageMutation::ScrollTo { top });
        Ok(())
    }

    fn section_top(&self, id: &str) -> Option<f64> {
        self.sections.get(id).copied()
    }
}
