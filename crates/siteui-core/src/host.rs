#![forbid(unsafe_code)]

//! Host-driven event loop around the coordinator.
//!
//! The embedding environment pushes [`PageEvent`]s and owns time:
//! - push events via [`SiteHost::push_event`] and process them with
//!   [`SiteHost::step`], or dispatch one immediately with [`SiteHost::handle`];
//! - schedule a one-shot timer for [`StepResult::wake_at`] /
//!   [`HandleOutcome::wake_at`] and call [`SiteHost::poll_timers`] when it fires.
//!
//! Nothing here blocks or spawns; it is suitable for `wasm32-unknown-unknown`.

use core::time::Duration;
use std::collections::VecDeque;

use crate::clock::{Clock, DeterministicClock};
use crate::config::SiteConfig;
use crate::coordinator::{DispatchOutcome, ViewportCoordinator};
use crate::event::{PageEvent, WiringPlan};
use crate::page::Page;
use crate::state::{UiState, Viewport};

/// Host-driven FIFO of page events.
#[derive(Debug, Clone, Default)]
pub struct PageEventSource {
    queue: VecDeque<PageEvent>,
}

impl PageEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: PageEvent) {
        self.queue.push_back(event);
    }

    pub fn read_event(&mut self) -> Option<PageEvent> {
        self.queue.pop_front()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = PageEvent> + '_ {
        self.queue.drain(..)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Outcome of [`SiteHost::handle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleOutcome {
    pub dispatch: DispatchOutcome,
    /// Monotonic time at which the host should call [`SiteHost::poll_timers`].
    pub wake_at: Option<Duration>,
}

/// Outcome of one [`SiteHost::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Events drained from the queue.
    pub events_processed: usize,
    /// Events whose handler actually ran.
    pub events_handled: usize,
    /// Debounced handlers that ran during this step.
    pub timers_fired: usize,
    pub wake_at: Option<Duration>,
}

/// Clock + event queue + page + coordinator.
#[derive(Debug)]
pub struct SiteHost<P: Page, C: Clock = DeterministicClock> {
    clock: C,
    events: PageEventSource,
    page: P,
    coordinator: ViewportCoordinator,
    plan: WiringPlan,
}

impl<P: Page, C: Clock> SiteHost<P, C> {
    /// Create a host and attach the coordinator to `page`.
    pub fn new(config: SiteConfig, viewport: Viewport, mut page: P, clock: C) -> Self {
        let mut coordinator = ViewportCoordinator::new(config, viewport);
        let plan = coordinator.attach(&mut page);
        Self {
            clock,
            events: PageEventSource::new(),
            page,
            coordinator,
            plan,
        }
    }

    /// Subscriptions the host must keep registered.
    #[must_use]
    pub fn plan(&self) -> &WiringPlan {
        &self.plan
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        self.coordinator.state()
    }

    #[must_use]
    pub fn coordinator(&self) -> &ViewportCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Dispatch one event right away (live DOM listeners use this).
    pub fn handle(&mut self, event: &PageEvent) -> HandleOutcome {
        let now = self.clock.now_mono();
        self.coordinator.poll(now, &mut self.page);
        let dispatch = self.coordinator.dispatch(event, now, &mut self.page);
        HandleOutcome {
            dispatch,
            wake_at: self.coordinator.next_deadline(),
        }
    }

    /// Queue an event for the next [`Self::step`].
    pub fn push_event(&mut self, event: PageEvent) {
        self.events.push_event(event);
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Run due timers, drain the queue, then run timers that became due.
    pub fn step(&mut self) -> StepResult {
        let now = self.clock.now_mono();
        let mut result = StepResult::default();
        if self.coordinator.poll(now, &mut self.page) {
            result.timers_fired += 1;
        }
        while let Some(event) = self.events.read_event() {
            result.events_processed += 1;
            if self
                .coordinator
                .dispatch(&event, now, &mut self.page)
                .handled
            {
                result.events_handled += 1;
            }
        }
        if self.coordinator.poll(now, &mut self.page) {
            result.timers_fired += 1;
        }
        result.wake_at = self.coordinator.next_deadline();
        result
    }

    /// Run the debounced handler if due. Returns `true` if it ran.
    pub fn poll_timers(&mut self) -> bool {
        let now = self.clock.now_mono();
        self.coordinator.poll(now, &mut self.page)
    }

    /// Cancel timers and return the plan to unsubscribe.
    pub fn teardown(&mut self) -> Option<WiringPlan> {
        self.events.drain_events().for_each(drop);
        self.coordinator.detach()
    }
}

impl<P: Page> SiteHost<P, DeterministicClock> {
    /// Host with a deterministic clock starting at zero.
    pub fn deterministic(config: SiteConfig, viewport: Viewport, page: P) -> Self {
        Self::new(config, viewport, page, DeterministicClock::new())
    }

    /// Advance deterministic time by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set deterministic time to an absolute value.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }
}
