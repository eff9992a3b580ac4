#![forbid(unsafe_code)]

//! WASM runner binding `siteui-core` to a live page.
//!
//! This crate provides [`SiteRunner`], a `wasm-bindgen`-exported struct that
//! owns the viewport coordinator, wires its DOM listeners through `gloo`
//! event handles and installs the stateless page helpers. [`boot`] builds and
//! mounts one in a single call and logs initialization failures instead of
//! throwing.
//!
//! ```html
//! <script type="module">
//!   import init, { boot } from "./pkg/siteui_web.js";
//!   await init();
//!   window.site = boot();
//! </script>
//! ```
//!
//! [`runner_core`] holds everything that does not need a browser and is
//! tested natively.

pub mod error;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod enhance;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{SiteRunner, boot, is_element_in_viewport, scroll_to_element};

pub use error::SiteError;
pub use runner_core::{ListenerSpec, ListenerTarget, RunnerCore, listener_specs, parse_config};
