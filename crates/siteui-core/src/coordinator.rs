#![forbid(unsafe_code)]

//! Viewport-reactive UI coordinator.
//!
//! Owns the [`UiState`] for one page view and turns scroll, resize, click and
//! key events into state transitions, writing only the flags that changed to
//! the [`Page`].
//!
//! # Rate limiting
//!
//! - Scroll goes through a leading-edge [`Throttle`] (100ms by default). The
//!   navbar and back-to-top sub-handlers share that single gate, so both see
//!   the same admitted offsets in a fixed order.
//! - Resize goes through a trailing [`Debounce`] (250ms by default). The host
//!   calls [`ViewportCoordinator::poll`] at [`ViewportCoordinator::next_deadline`].
//!
//! # Missing elements
//!
//! [`ViewportCoordinator::attach`] inspects the page and returns the
//! [`WiringPlan`]. Absent elements drop their subscriptions and their writes;
//! nothing is reported as an error.
//!
//! The menu and the mobile navbar-hide behaviour are independent: an open
//! menu does not keep the navbar pinned while scrolling down.

use core::time::Duration;

use crate::config::SiteConfig;
use crate::event::{EventKind, Key, PageEvent, WiringPlan};
use crate::page::{ElementRole, Page, names};
use crate::rate_limit::{Debounce, Throttle};
use crate::state::{StateChanges, UiState, Viewport, sanitize_offset};

/// Result of routing one event through [`ViewportCoordinator::dispatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The handler ran (not throttled, not unwired).
    pub handled: bool,
    /// The host should call `preventDefault()` on the DOM event.
    pub prevent_default: bool,
}

impl DispatchOutcome {
    const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    const fn handled(handled: bool) -> Self {
        Self {
            handled,
            prevent_default: false,
        }
    }
}

/// What a navigation-link click resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorOutcome {
    /// In-page link with a target; the window is scrolling to `top`.
    Scrolled { top: f64 },
    /// In-page link (`#...`) without a matching section.
    NoTarget,
    /// Not an in-page link; default navigation proceeds.
    Passthrough,
}

impl AnchorOutcome {
    /// In-page links always suppress the browser's jump.
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

/// Coordinates navbar, mobile menu and back-to-top presentation.
#[derive(Debug, Clone)]
pub struct ViewportCoordinator {
    config: SiteConfig,
    state: UiState,
    width: f64,
    scroll_gate: Throttle,
    resize_gate: Debounce<f64>,
    plan: Option<WiringPlan>,
    navbar: bool,
    back_to_top: bool,
    menu: bool,
}

impl ViewportCoordinator {
    /// Create a coordinator for a page first observed at `viewport`.
    #[must_use]
    pub fn new(config: SiteConfig, viewport: Viewport) -> Self {
        let scroll_gate = Throttle::new(config.viewport.scroll_throttle());
        let resize_gate = Debounce::new(config.viewport.resize_debounce());
        Self {
            state: UiState::new(viewport.scroll_y),
            width: viewport.width,
            config,
            scroll_gate,
            resize_gate,
            plan: None,
            navbar: false,
            back_to_top: false,
            menu: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &UiState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Viewport width seen by the last handler that ran.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.plan.is_some()
    }

    /// Whether the menu behaviour is active (toggle and panel both present).
    #[must_use]
    pub const fn menu_enabled(&self) -> bool {
        self.menu
    }

    /// Inspect the page, sync the initial presentation and return the
    /// subscriptions the host must register.
    pub fn attach<P: Page>(&mut self, page: &mut P) -> WiringPlan {
        self.navbar = page.has(ElementRole::Navbar);
        self.back_to_top = page.has(ElementRole::BackToTop);
        self.menu = page.has(ElementRole::MenuToggle) && page.has(ElementRole::MenuPanel);

        let mut plan = WiringPlan::new();
        if self.navbar || self.back_to_top {
            plan.subscribe(EventKind::WindowScroll);
        }
        if self.navbar || self.menu {
            plan.subscribe(EventKind::WindowResize);
        }
        if self.menu {
            plan.subscribe(EventKind::ToggleClick);
            plan.subscribe(EventKind::DocumentClick);
            plan.subscribe(EventKind::DocumentKeydown);
        }
        plan.subscribe(EventKind::AnchorClick);
        if self.back_to_top {
            plan.subscribe(EventKind::BackToTopClick);
        }

        tracing::debug!(
            navbar = self.navbar,
            back_to_top = self.back_to_top,
            menu = self.menu,
            subscriptions = plan.len(),
            "coordinator attached"
        );
        // Toggle attributes keep whatever the markup says until the first
        // menu change.
        self.present(page, StateChanges::ALL, false);
        self.plan = Some(plan.clone());
        plan
    }

    /// Tear down: cancel pending timers and forget the wiring plan.
    ///
    /// Returns the plan that was active so the host can unsubscribe it.
    pub fn detach(&mut self) -> Option<WiringPlan> {
        if self.resize_gate.cancel().is_some() {
            tracing::trace!("pending resize dropped on detach");
        }
        self.scroll_gate.reset();
        self.plan.take()
    }

    /// Route one event. Events whose kind is not wired are ignored.
    pub fn dispatch<P: Page>(
        &mut self,
        event: &PageEvent,
        now: Duration,
        page: &mut P,
    ) -> DispatchOutcome {
        let kind = event.kind();
        if !self.plan.as_ref().is_some_and(|plan| plan.contains(kind)) {
            tracing::trace!(%kind, "event ignored: not wired");
            return DispatchOutcome::IGNORED;
        }
        match event {
            PageEvent::Scroll { y, width } => {
                DispatchOutcome::handled(self.on_scroll(now, *y, *width, page))
            }
            PageEvent::Resize { width } => {
                self.on_resize(now, *width);
                DispatchOutcome::handled(true)
            }
            PageEvent::ToggleClick => {
                self.toggle_menu(page);
                DispatchOutcome::handled(true)
            }
            PageEvent::DocumentClick { inside_menu } => {
                DispatchOutcome::handled(self.on_document_click(*inside_menu, page))
            }
            PageEvent::Key { key } => DispatchOutcome::handled(self.on_key(*key, page)),
            PageEvent::AnchorClick { href } => {
                let outcome = self.on_anchor_click(href, page);
                DispatchOutcome {
                    handled: outcome != AnchorOutcome::Passthrough,
                    prevent_default: outcome.prevent_default(),
                }
            }
            PageEvent::BackToTopClick => {
                self.on_back_to_top(page);
                DispatchOutcome::handled(true)
            }
        }
    }

    /// Throttled scroll handler. Returns `true` if the observation was admitted.
    pub fn on_scroll<P: Page>(&mut self, now: Duration, y: f64, width: f64, page: &mut P) -> bool {
        if !self.scroll_gate.admit(now) {
            tracing::trace!(y, "scroll throttled");
            return false;
        }
        self.width = width;
        let next = self.state.scrolled_to(y, width, &self.config.viewport);
        self.commit(next, page);
        true
    }

    /// Record a resize; the handler runs once the debounce window is quiet.
    ///
    /// Returns the deadline at which [`Self::poll`] should be called.
    pub fn on_resize(&mut self, now: Duration, width: f64) -> Duration {
        let deadline = self.resize_gate.call(now, width);
        tracing::trace!(width, ?deadline, "resize debounced");
        deadline
    }

    /// Run the debounced resize if it is due. Returns `true` if it ran.
    pub fn poll<P: Page>(&mut self, now: Duration, page: &mut P) -> bool {
        let Some(width) = self.resize_gate.poll(now) else {
            return false;
        };
        self.width = width;
        if self.navbar || self.menu {
            let next = self.state.resized_to(width, &self.config.viewport);
            self.commit(next, page);
        }
        tracing::debug!(width, "resize handled");
        true
    }

    /// When the host should next call [`Self::poll`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.resize_gate.deadline()
    }

    /// Flip the menu. Returns the new open state.
    pub fn toggle_menu<P: Page>(&mut self, page: &mut P) -> bool {
        if self.menu {
            let next = self.state.menu_toggled();
            self.commit(next, page);
        }
        self.state.menu_open
    }

    /// Close the menu; a no-op if it is already closed.
    pub fn close_menu<P: Page>(&mut self, page: &mut P) {
        let next = self.state.menu_closed();
        self.commit(next, page);
    }

    /// Smooth-scroll the window to `offset` (clamped to the document top).
    pub fn request_scroll_to<P: Page>(&mut self, offset: f64, page: &mut P) {
        let top = sanitize_offset(offset);
        tracing::debug!(top, "scroll requested");
        report(page.scroll_to(top), "scroll_to");
    }

    /// Navigation-link click. `#id` links scroll to the section (minus the
    /// navbar allowance) and close the menu; other links navigate normally.
    pub fn on_anchor_click<P: Page>(&mut self, href: &str, page: &mut P) -> AnchorOutcome {
        let Some(id) = href.strip_prefix('#') else {
            return AnchorOutcome::Passthrough;
        };
        let Some(section_top) = (!id.is_empty()).then(|| page.section_top(id)).flatten() else {
            tracing::debug!(href, "anchor target missing");
            return AnchorOutcome::NoTarget;
        };
        let top = sanitize_offset(section_top - self.config.viewport.anchor_offset_px);
        self.request_scroll_to(top, page);
        self.close_menu(page);
        AnchorOutcome::Scrolled { top }
    }

    pub fn on_back_to_top<P: Page>(&mut self, page: &mut P) {
        self.request_scroll_to(0.0, page);
    }

    /// Document click. Clicks outside the toggle and panel close the menu.
    /// Returns `true` if the click closed an open menu.
    pub fn on_document_click<P: Page>(&mut self, inside_menu: bool, page: &mut P) -> bool {
        if inside_menu || !self.state.menu_open {
            return false;
        }
        self.close_menu(page);
        true
    }

    /// Document keydown. `Escape` closes the menu.
    /// Returns `true` if the key closed an open menu.
    pub fn on_key<P: Page>(&mut self, key: Key, page: &mut P) -> bool {
        if key != Key::Escape || !self.state.menu_open {
            return false;
        }
        self.close_menu(page);
        true
    }

    fn commit<P: Page>(&mut self, next: UiState, page: &mut P) {
        let changes = self.state.changes(&next);
        if changes.any() {
            tracing::debug!(
                menu_open = next.menu_open,
                navbar_hidden = next.navbar_hidden,
                navbar_scrolled = next.navbar_scrolled,
                back_to_top_visible = next.back_to_top_visible,
                "ui state changed"
            );
        }
        self.state = next;
        self.present(page, changes, true);
    }

    /// Write the flags in `changes` to the page. Order is fixed: navbar,
    /// back-to-top, menu. `menu_attributes` gates the toggle's ARIA writes.
    fn present<P: Page>(&self, page: &mut P, changes: StateChanges, menu_attributes: bool) {
        let s = self.state;
        if self.navbar {
            if changes.navbar_scrolled {
                report(
                    page.set_class(ElementRole::Navbar, names::CLASS_SCROLLED, s.navbar_scrolled),
                    "navbar scrolled class",
                );
            }
            if changes.navbar_hidden {
                let transform = if s.navbar_hidden {
                    names::TRANSFORM_HIDDEN
                } else {
                    names::TRANSFORM_SHOWN
                };
                report(
                    page.set_style(ElementRole::Navbar, names::STYLE_TRANSFORM, transform),
                    "navbar transform",
                );
            }
        }
        if self.back_to_top && changes.back_to_top {
            report(
                page.set_class(
                    ElementRole::BackToTop,
                    names::CLASS_VISIBLE,
                    s.back_to_top_visible,
                ),
                "back-to-top visible class",
            );
        }
        if self.menu && changes.menu {
            let open = s.menu_open;
            let labels = &self.config.labels;
            let label = if open {
                labels.menu_close.as_str()
            } else {
                labels.menu_open.as_str()
            };
            report(
                page.set_class(ElementRole::MenuToggle, names::CLASS_ACTIVE, open),
                "toggle active class",
            );
            report(
                page.set_class(ElementRole::MenuPanel, names::CLASS_ACTIVE, open),
                "menu active class",
            );
            if !menu_attributes {
                return;
            }
            report(
                page.set_attribute(
                    ElementRole::MenuToggle,
                    names::ATTR_ARIA_EXPANDED,
                    if open { "true" } else { "false" },
                ),
                "toggle aria-expanded",
            );
            report(
                page.set_attribute(ElementRole::MenuToggle, names::ATTR_ARIA_LABEL, label),
                "toggle aria-label",
            );
        }
    }
}

fn report<E: core::fmt::Display>(result: Result<(), E>, what: &'static str) {
    if let Err(err) = result {
        tracing::warn!(%err, what, "page mutation failed");
    }
}
