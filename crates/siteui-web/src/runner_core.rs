#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`SiteHost`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use siteui_core::event_parser::parse_encoded_event;
use siteui_core::{
    Clock, EventKind, HandleOutcome, Page, PageEvent, SiteConfig, SiteHost, SystemClock, UiState,
    Viewport, WiringPlan,
};

use crate::error::SiteError;

/// What a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Window,
    Document,
    MenuToggle,
    BackToTop,
    /// Every element matching the nav-link selector.
    NavLinks,
}

/// One DOM subscription derived from a [`WiringPlan`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub kind: EventKind,
    pub target: ListenerTarget,
    pub dom_type: &'static str,
    /// Registered non-passive so the handler may call `preventDefault()`.
    pub cancelable: bool,
}

impl ListenerSpec {
    #[must_use]
    pub const fn for_kind(kind: EventKind) -> Self {
        let (target, cancelable) = match kind {
            EventKind::WindowScroll | EventKind::WindowResize => (ListenerTarget::Window, false),
            EventKind::ToggleClick => (ListenerTarget::MenuToggle, false),
            EventKind::DocumentClick | EventKind::DocumentKeydown => {
                (ListenerTarget::Document, false)
            }
            EventKind::AnchorClick => (ListenerTarget::NavLinks, true),
            EventKind::BackToTopClick => (ListenerTarget::BackToTop, true),
        };
        Self {
            kind,
            target,
            dom_type: kind.dom_type(),
            cancelable,
        }
    }
}

/// Listener specs for every entry of `plan`, in plan order.
#[must_use]
pub fn listener_specs(plan: &WiringPlan) -> Vec<ListenerSpec> {
    plan.kinds()
        .iter()
        .copied()
        .map(ListenerSpec::for_kind)
        .collect()
}

/// Decode the optional JSON config passed to `boot` / `new SiteRunner`.
///
/// Missing or blank input means defaults. Timing values are clamped into
/// range; anything still invalid afterwards is an error.
pub fn parse_config(json: Option<&str>) -> Result<SiteConfig, SiteError> {
    let config = match json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => SiteConfig::from_json_str(text)?,
        None => SiteConfig::default(),
    };
    for problem in config.validate() {
        tracing::warn!(%problem, "config value adjusted");
    }
    Ok(config.validated().checked()?)
}

/// Platform-independent site runner.
#[derive(Debug)]
pub struct RunnerCore<P: Page, C: Clock = SystemClock> {
    host: SiteHost<P, C>,
}

impl<P: Page, C: Clock> RunnerCore<P, C> {
    pub fn new(config: SiteConfig, viewport: Viewport, page: P, clock: C) -> Self {
        Self {
            host: SiteHost::new(config, viewport, page, clock),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        self.host.coordinator().config()
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        self.host.state()
    }

    #[must_use]
    pub fn plan(&self) -> &WiringPlan {
        self.host.plan()
    }

    #[must_use]
    pub fn page(&self) -> &P {
        self.host.page()
    }

    pub fn page_mut(&mut self) -> &mut P {
        self.host.page_mut()
    }

    /// Dispatch a live DOM event.
    pub fn handle(&mut self, event: &PageEvent) -> HandleOutcome {
        self.host.handle(event)
    }

    /// Decode and dispatch an encoded event (test pages, replay tooling).
    pub fn push_encoded_event(&mut self, json: &str) -> Result<HandleOutcome, SiteError> {
        let event = parse_encoded_event(json)?;
        Ok(self.host.handle(&event))
    }

    /// Run the debounced resize handler if due.
    pub fn poll_timers(&mut self) -> bool {
        self.host.poll_timers()
    }

    /// Browser timer callback. Runs the debounced handler if due; otherwise
    /// returns the deadline the timer must be re-armed for.
    pub fn fire_timer(&mut self) -> Option<Duration> {
        if self.host.poll_timers() {
            return None;
        }
        let deadline = self.host.coordinator().next_deadline();
        if let Some(wake_at) = deadline {
            tracing::trace!(?wake_at, "timer fired early; re-arming");
        }
        deadline
    }

    /// How long from now until `wake_at` (zero if already due).
    #[must_use]
    pub fn delay_until(&self, wake_at: Duration) -> Duration {
        wake_at.saturating_sub(self.host.now())
    }

    /// Delay in whole milliseconds for a browser timer, rounded up so the
    /// callback never fires before the deadline.
    #[must_use]
    pub fn timer_delay_ms(&self, wake_at: Duration) -> u32 {
        let delay = self.delay_until(wake_at);
        let ms = delay.as_millis() + u128::from(delay.subsec_nanos() % 1_000_000 != 0);
        u32::try_from(ms).unwrap_or(u32::MAX)
    }

    /// `UiState` as a JSON object string.
    #[must_use]
    pub fn state_json(&self) -> String {
        serde_json::to_string(self.host.state()).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Cancel timers; returns the plan whose listeners must be dropped.
    pub fn teardown(&mut self) -> Option<WiringPlan> {
        self.host.teardown()
    }
}
