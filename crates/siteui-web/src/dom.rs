#![forbid(unsafe_code)]

//! [`Page`] over the live document. Only compiled on `wasm32` targets.

use core::fmt;

use siteui_core::{ElementConfig, ElementRole, Page};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Node, ScrollBehavior, ScrollToOptions, Window};

use crate::error::SiteError;

/// A DOM call that threw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError(pub String);

impl DomError {
    pub fn from_js(value: &JsValue) -> Self {
        Self(js_message(value))
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DomError {}

impl From<DomError> for SiteError {
    fn from(e: DomError) -> Self {
        Self::Js(e.0)
    }
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoDom("window"))
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or(SiteError::NoDom("document"))
}

/// The coordinator's elements, looked up once by id.
#[derive(Debug, Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
    navbar: Option<HtmlElement>,
    toggle: Option<HtmlElement>,
    menu: Option<HtmlElement>,
    back_to_top: Option<HtmlElement>,
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

impl DomPage {
    pub fn lookup(elements: &ElementConfig) -> Result<Self, SiteError> {
        let window = window()?;
        let document = window.document().ok_or(SiteError::NoDom("document"))?;
        Ok(Self {
            navbar: by_id(&document, &elements.navbar_id),
            toggle: by_id(&document, &elements.toggle_id),
            menu: by_id(&document, &elements.menu_id),
            back_to_top: by_id(&document, &elements.back_to_top_id),
            window,
            document,
        })
    }

    pub fn element(&self, role: ElementRole) -> Option<&HtmlElement> {
        match role {
            ElementRole::Navbar => self.navbar.as_ref(),
            ElementRole::MenuToggle => self.toggle.as_ref(),
            ElementRole::MenuPanel => self.menu.as_ref(),
            ElementRole::BackToTop => self.back_to_top.as_ref(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether `target` is the toggle, the panel, or inside either.
    pub fn is_inside_menu(&self, target: Option<&Node>) -> bool {
        let Some(target) = target else {
            return false;
        };
        [ElementRole::MenuToggle, ElementRole::MenuPanel]
            .into_iter()
            .filter_map(|role| self.element(role))
            .any(|el| el.contains(Some(target)))
    }

    /// Current `(innerWidth, scrollY)`.
    pub fn viewport(&self) -> (f64, f64) {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        (width, scroll_y)
    }

    fn require(&self, role: ElementRole) -> Result<&HtmlElement, DomError> {
        self.element(role)
            .ok_or_else(|| DomError(format!("missing element: {role}")))
    }
}

/// Smooth-scroll `window` to `top`.
pub fn smooth_scroll(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

impl Page for DomPage {
    type Error = DomError;

    fn has(&self, role: ElementRole) -> bool {
        self.element(role).is_some()
    }

    fn set_class(&mut self, role: ElementRole, class: &str, on: bool) -> Result<(), Self::Error> {
        let list = self.require(role)?.class_list();
        let result = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        result.map_err(|e| DomError::from_js(&e))
    }

    fn set_style(
        &mut self,
        role: ElementRole,
        property: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        self.require(role)?
            .style()
            .set_property(property, value)
            .map_err(|e| DomError::from_js(&e))
    }

    fn set_attribute(
        &mut self,
        role: ElementRole,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        self.require(role)?
            .set_attribute(name, value)
            .map_err(|e| DomError::from_js(&e))
    }

    fn scroll_to(&mut self, top: f64) -> Result<(), Self::Error> {
        smooth_scroll(&self.window, top);
        Ok(())
    }

    fn section_top(&self, id: &str) -> Option<f64> {
        by_id(&self.document, id).map(|el| f64::from(el.offset_top()))
    }
}
