#![forbid(unsafe_code)]

//! `siteui-core` is the platform-independent half of the site interactivity
//! layer.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (the wasm runner, a test,
//!   a replay tool) pushes [`PageEvent`]s and owns the [`Page`] being mutated.
//! - **Deterministic time**: every rate-limited path takes `now` explicitly;
//!   [`DeterministicClock`] makes throttle and debounce behaviour reproducible.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. `siteui-web` wraps it with the
//! DOM and a stable JS API.
//!
//! # Example
//!
//! ```
//! use siteui_core::{PageEvent, RecordingPage, SiteConfig, SiteHost, Viewport};
//! use core::time::Duration;
//!
//! let mut host = SiteHost::deterministic(
//!     SiteConfig::default(),
//!     Viewport::new(375.0, 0.0),
//!     RecordingPage::new(),
//! );
//! host.handle(&PageEvent::Scroll { y: 250.0, width: 375.0 });
//! host.advance_time(Duration::from_millis(150));
//! host.handle(&PageEvent::Scroll { y: 260.0, width: 375.0 });
//! assert!(host.state().navbar_hidden);
//! assert!(host.state().navbar_scrolled);
//! ```

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error_report;
pub mod event;
#[cfg(feature = "serde")]
pub mod event_parser;
pub mod helpers;
pub mod host;
pub mod page;
pub mod rate_limit;
pub mod session_record;
pub mod state;

pub use clock::{Clock, DeterministicClock, SystemClock};
pub use config::{ConfigError, ElementConfig, LabelConfig, RevealConfig, SiteConfig, ViewportConfig};
pub use coordinator::{AnchorOutcome, DispatchOutcome, ViewportCoordinator};
pub use error_report::{ErrorKind, ErrorReport};
pub use event::{EventKind, Key, PageEvent, WiringPlan};
pub use host::{HandleOutcome, PageEventSource, SiteHost, StepResult};
pub use page::{ElementRole, Page, PageMutation, RecordingPage, RecordingPageError};
pub use rate_limit::{Debounce, Throttle};
pub use session_record::{
    ReplayError, ReplayMismatch, ReplayResult, SessionRecorder, SessionTrace, TraceRecord, replay,
};
pub use state::{StateChanges, UiState, Viewport};
