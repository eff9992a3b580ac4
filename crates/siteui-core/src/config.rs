#![forbid(unsafe_code)]

//! Site configuration as data.
//!
//! Every field defaults to the value the page script has always used, so
//! `SiteConfig::default()` reproduces the stock behaviour. Hosts may override
//! any subset from JSON (feature `serde`) or TOML (feature `config-toml`):
//!
//! ```toml
//! [viewport]
//! breakpoint_px = 900.0
//! scroll_throttle_ms = 50
//!
//! [labels]
//! menu_open = "메뉴 열기"
//! menu_close = "메뉴 닫기"
//! ```
//!
//! # Timing Defaults
//!
//! | Setting | Default | Range |
//! |---------|---------|-------|
//! | `scroll_throttle_ms` | 100ms | 1-1000ms |
//! | `resize_debounce_ms` | 250ms | 1-2000ms |
//! | `loader_fade_ms` | 300ms | 0-5000ms |

#[cfg(feature = "config-toml")]
use std::path::Path;

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_BREAKPOINT_PX: f64 = 768.0;
pub const DEFAULT_SCROLLED_THRESHOLD_PX: f64 = 100.0;
pub const DEFAULT_HIDE_THRESHOLD_PX: f64 = 200.0;
pub const DEFAULT_BACK_TO_TOP_THRESHOLD_PX: f64 = 500.0;
pub const DEFAULT_ANCHOR_OFFSET_PX: f64 = 100.0;
pub const DEFAULT_ELEMENT_OFFSET_PX: f64 = 80.0;

pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 100;
pub const MIN_SCROLL_THROTTLE_MS: u64 = 1;
pub const MAX_SCROLL_THROTTLE_MS: u64 = 1_000;

pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;
pub const MIN_RESIZE_DEBOUNCE_MS: u64 = 1;
pub const MAX_RESIZE_DEBOUNCE_MS: u64 = 2_000;

pub const DEFAULT_LOADER_FADE_MS: u64 = 300;
pub const MAX_LOADER_FADE_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Top-level SiteConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for the coordinator and the page helpers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SiteConfig {
    /// Scroll/resize thresholds and rate-limit windows.
    pub viewport: ViewportConfig,
    /// Element ids and selectors the page script looks up.
    pub elements: ElementConfig,
    /// Accessible labels and user-facing messages.
    pub labels: LabelConfig,
    /// Reveal animation, lazy image and loader settings.
    pub reveal: RevealConfig,
}

impl SiteConfig {
    /// Load from a JSON string.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to JSON (used by the web runner's `config()` export).
    #[cfg(feature = "serde")]
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Json)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; an empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let v = &self.viewport;

        if !(v.breakpoint_px.is_finite() && v.breakpoint_px > 0.0) {
            errors.push(format!(
                "viewport.breakpoint_px must be > 0, got {}",
                v.breakpoint_px
            ));
        }
        for (name, value) in [
            ("viewport.scrolled_threshold_px", v.scrolled_threshold_px),
            ("viewport.hide_threshold_px", v.hide_threshold_px),
            ("viewport.back_to_top_threshold_px", v.back_to_top_threshold_px),
            ("viewport.anchor_offset_px", v.anchor_offset_px),
            ("viewport.element_offset_px", v.element_offset_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }
        if !(MIN_SCROLL_THROTTLE_MS..=MAX_SCROLL_THROTTLE_MS).contains(&v.scroll_throttle_ms) {
            errors.push(format!(
                "viewport.scroll_throttle_ms must be in [{MIN_SCROLL_THROTTLE_MS}, {MAX_SCROLL_THROTTLE_MS}], got {}",
                v.scroll_throttle_ms
            ));
        }
        if !(MIN_RESIZE_DEBOUNCE_MS..=MAX_RESIZE_DEBOUNCE_MS).contains(&v.resize_debounce_ms) {
            errors.push(format!(
                "viewport.resize_debounce_ms must be in [{MIN_RESIZE_DEBOUNCE_MS}, {MAX_RESIZE_DEBOUNCE_MS}], got {}",
                v.resize_debounce_ms
            ));
        }
        if self.reveal.loader_fade_ms > MAX_LOADER_FADE_MS {
            errors.push(format!(
                "reveal.loader_fade_ms must be <= {MAX_LOADER_FADE_MS}, got {}",
                self.reveal.loader_fade_ms
            ));
        }

        let e = &self.elements;
        for (name, value) in [
            ("elements.navbar_id", &e.navbar_id),
            ("elements.toggle_id", &e.toggle_id),
            ("elements.menu_id", &e.menu_id),
            ("elements.back_to_top_id", &e.back_to_top_id),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        let r = &self.reveal;
        if !(0.0..=1.0).contains(&r.threshold) {
            errors.push(format!(
                "reveal.threshold must be in [0, 1], got {}",
                r.threshold
            ));
        }

        errors
    }

    /// Clamp timing values into their supported ranges.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let v = &mut self.viewport;
        v.scroll_throttle_ms = v
            .scroll_throttle_ms
            .clamp(MIN_SCROLL_THROTTLE_MS, MAX_SCROLL_THROTTLE_MS);
        v.resize_debounce_ms = v
            .resize_debounce_ms
            .clamp(MIN_RESIZE_DEBOUNCE_MS, MAX_RESIZE_DEBOUNCE_MS);
        self.reveal.loader_fade_ms = self.reveal.loader_fade_ms.min(MAX_LOADER_FADE_MS);
        self.reveal.threshold = if self.reveal.threshold.is_finite() {
            self.reveal.threshold.clamp(0.0, 1.0)
        } else {
            RevealConfig::default().threshold
        };
        self
    }

    /// Validate, turning any problem into a [`ConfigError::Validation`].
    pub fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn with_breakpoint(mut self, px: f64) -> Self {
        self.viewport.breakpoint_px = px;
        self
    }

    #[must_use]
    pub fn with_scroll_throttle(mut self, window: Duration) -> Self {
        self.viewport.scroll_throttle_ms = window.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_resize_debounce(mut self, wait: Duration) -> Self {
        self.viewport.resize_debounce_ms = wait.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_menu_labels(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.labels.menu_open = open.into();
        self.labels.menu_close = close.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Viewport thresholds. All offsets are CSS pixels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewportConfig {
    /// Widths at or below this are "mobile". Default: 768.
    pub breakpoint_px: f64,
    /// Scroll offset above which the navbar gets its scrolled variant. Default: 100.
    pub scrolled_threshold_px: f64,
    /// Scroll offset past which scrolling down hides the mobile navbar. Default: 200.
    pub hide_threshold_px: f64,
    /// Scroll offset above which back-to-top is shown. Default: 500.
    pub back_to_top_threshold_px: f64,
    /// Fixed navbar allowance subtracted from anchor targets. Default: 100.
    pub anchor_offset_px: f64,
    /// Default offset for programmatic scroll-to-element. Default: 80.
    pub element_offset_px: f64,
    pub scroll_throttle_ms: u64,
    pub resize_debounce_ms: u64,
}

impl ViewportConfig {
    #[must_use]
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Whether `width` is at or below the mobile breakpoint.
    #[must_use]
    pub fn is_mobile(&self, width: f64) -> bool {
        width <= self.breakpoint_px
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            scrolled_threshold_px: DEFAULT_SCROLLED_THRESHOLD_PX,
            hide_threshold_px: DEFAULT_HIDE_THRESHOLD_PX,
            back_to_top_threshold_px: DEFAULT_BACK_TO_TOP_THRESHOLD_PX,
            anchor_offset_px: DEFAULT_ANCHOR_OFFSET_PX,
            element_offset_px: DEFAULT_ELEMENT_OFFSET_PX,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

/// Element lookups.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElementConfig {
    pub navbar_id: String,
    pub toggle_id: String,
    pub menu_id: String,
    pub back_to_top_id: String,
    /// Anchors whose clicks are routed to in-page smooth scrolling.
    pub nav_link_selector: String,
    /// Forms validated on submit.
    pub form_selector: String,
    pub loader_selector: String,
    pub service_card_selector: String,
    pub team_image_selector: String,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            navbar_id: "navbar".into(),
            toggle_id: "nav-toggle".into(),
            menu_id: "nav-menu".into(),
            back_to_top_id: "back-to-top".into(),
            nav_link_selector: ".nav-link".into(),
            form_selector: "form".into(),
            loader_selector: ".loader".into(),
            service_card_selector: ".service-card".into(),
            team_image_selector: ".team-member .team-image img".into(),
        }
    }
}

/// Accessible labels and messages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelConfig {
    /// `aria-label` on the toggle while the menu is closed.
    pub menu_open: String,
    /// `aria-label` on the toggle while the menu is open.
    pub menu_close: String,
    /// Message shown under an empty required field.
    pub required_field: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            menu_open: "Open menu".into(),
            menu_close: "Close menu".into(),
            required_field: "This field is required.".into(),
        }
    }
}

/// Reveal animation, lazy loading and loader fade.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealConfig {
    pub selector: String,
    /// Intersection ratio that counts as visible. Default: 0.1.
    pub threshold: f64,
    pub root_margin: String,
    pub lazy_image_selector: String,
    pub loader_fade_ms: u64,
}

impl RevealConfig {
    #[must_use]
    pub fn loader_fade(&self) -> Duration {
        Duration::from_millis(self.loader_fade_ms)
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".service-card, .team-member, .section-header".into(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".into(),
            lazy_image_selector: "img[data-src]".into(),
            loader_fade_ms: DEFAULT_LOADER_FADE_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a site configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-toml")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-toml")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "serde")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-toml")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "serde")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_page_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.viewport.breakpoint_px, 768.0);
        assert_eq!(config.viewport.scroll_throttle(), Duration::from_millis(100));
        assert_eq!(config.viewport.resize_debounce(), Duration::from_millis(250));
        assert_eq!(config.elements.navbar_id, "navbar");
        assert_eq!(config.reveal.root_margin, "0px 0px -50px 0px");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let v = ViewportConfig::default();
        assert!(v.is_mobile(768.0));
        assert!(!v.is_mobile(768.5));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = SiteConfig::default();
        config.viewport.breakpoint_px = 0.0;
        config.viewport.hide_threshold_px = f64::NAN;
        config.viewport.scroll_throttle_ms = 0;
        config.elements.menu_id = "  ".into();
        config.reveal.threshold = 1.5;

        let errors = config.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].starts_with("viewport.breakpoint_px"));
        assert!(matches!(
            config.checked(),
            Err(ConfigError::Validation(list)) if list.len() == 5
        ));
    }

    #[test]
    fn validated_clamps_timing() {
        let config = SiteConfig::default()
            .with_scroll_throttle(Duration::ZERO)
            .with_resize_debounce(Duration::from_secs(60))
            .validated();
        assert_eq!(config.viewport.scroll_throttle_ms, MIN_SCROLL_THROTTLE_MS);
        assert_eq!(config.viewport.resize_debounce_ms, MAX_RESIZE_DEBOUNCE_MS);
    }

    #[test]
    fn builder_overrides_labels() {
        let config = SiteConfig::default().with_menu_labels("메뉴 열기", "메뉴 닫기");
        assert_eq!(config.labels.menu_open, "메뉴 열기");
        assert_eq!(config.labels.menu_close, "메뉴 닫기");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_partial_override_keeps_defaults() {
        let config =
            SiteConfig::from_json_str(r#"{"viewport":{"breakpoint_px":1024.0}}"#).unwrap();
        assert_eq!(config.viewport.breakpoint_px, 1024.0);
        assert_eq!(config.viewport.hide_threshold_px, 200.0);
        assert_eq!(config.labels, LabelConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_parse_error_is_reported() {
        let err = SiteConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
