//! Failure semantics are observable through `tracing`: a page mutation that
//! fails is logged at WARN and the coordinator keeps going.

use std::sync::{Arc, Mutex};

use core::time::Duration;

use siteui_core::{ElementRole, Page, PageEvent, SiteConfig, SiteHost, Viewport};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.0,
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

/// Every element exists, but styling the navbar throws.
#[derive(Debug, Default)]
struct BrokenStylePage {
    scrolls: Vec<f64>,
}

impl Page for BrokenStylePage {
    type Error = String;

    fn has(&self, _role: ElementRole) -> bool {
        true
    }

    fn set_class(&mut self, _: ElementRole, _: &str, _: bool) -> Result<(), String> {
        Ok(())
    }

    fn set_style(&mut self, role: ElementRole, property: &str, _: &str) -> Result<(), String> {
        Err(format!("cannot set {property} on {role}"))
    }

    fn set_attribute(&mut self, _: ElementRole, _: &str, _: &str) -> Result<(), String> {
        Ok(())
    }

    fn scroll_to(&mut self, top: f64) -> Result<(), String> {
        self.scrolls.push(top);
        Ok(())
    }

    fn section_top(&self, _id: &str) -> Option<f64> {
        None
    }
}

#[test]
fn failed_mutation_is_warned_and_state_still_advances() {
    let mut hidden = false;
    let events = with_captured_tracing(|| {
        let mut host = SiteHost::deterministic(
            SiteConfig::default(),
            Viewport::new(375.0, 0.0),
            BrokenStylePage::default(),
        );
        host.handle(&PageEvent::Scroll {
            y: 300.0,
            width: 375.0,
        });
        hidden = host.state().navbar_hidden;
        host.handle(&PageEvent::BackToTopClick);
        assert_eq!(host.page().scrolls, vec![0.0]);
    });

    assert!(hidden);
    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert!(!warnings.is_empty(), "{events:?}");
    assert!(warnings.iter().all(|e| e.message == "page mutation failed"));
    assert!(warnings.iter().any(|e| {
        e.fields
            .iter()
            .any(|(k, v)| k == "err" && v.contains("cannot set transform on navbar"))
    }));
}

#[test]
fn throttled_scrolls_are_traced_not_warned() {
    let events = with_captured_tracing(|| {
        let mut host = SiteHost::deterministic(
            SiteConfig::default(),
            Viewport::new(1_280.0, 0.0),
            siteui_core::RecordingPage::new(),
        );
        for y in [10.0, 20.0, 30.0] {
            host.handle(&PageEvent::Scroll { y, width: 1_280.0 });
        }
        host.advance_time(Duration::from_millis(100));
        host.handle(&PageEvent::Scroll {
            y: 40.0,
            width: 1_280.0,
        });
    });

    let throttled = events
        .iter()
        .filter(|e| e.message == "scroll throttled")
        .count();
    assert_eq!(throttled, 2);
    assert!(events.iter().all(|e| e.level != tracing::Level::WARN));
}
