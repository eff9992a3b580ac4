//! End-to-end page scenarios through [`SiteHost`] and a recording page.

use core::time::Duration;

use pretty_assertions::assert_eq;
use siteui_core::page::names;
use siteui_core::{
    ElementRole, EventKind, Key, PageEvent, RecordingPage, SiteConfig, SiteHost, Viewport,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn mobile_host() -> SiteHost<RecordingPage> {
    SiteHost::deterministic(
        SiteConfig::default(),
        Viewport::new(375.0, 0.0),
        RecordingPage::new()
            .with_section("services", 820.0)
            .with_section("team", 1_640.0),
    )
}

fn scroll(host: &mut SiteHost<RecordingPage>, y: f64, width: f64) {
    host.advance_time(ms(120));
    host.handle(&PageEvent::Scroll { y, width });
}

#[test]
fn mobile_scroll_down_hides_then_scroll_up_shows() {
    let mut host = mobile_host();
    scroll(&mut host, 250.0, 375.0);
    scroll(&mut host, 260.0, 375.0);
    assert!(host.state().navbar_hidden);
    assert_eq!(
        host.page().style(ElementRole::Navbar, names::STYLE_TRANSFORM),
        Some(names::TRANSFORM_HIDDEN)
    );

    scroll(&mut host, 240.0, 375.0);
    assert!(!host.state().navbar_hidden);
    assert_eq!(
        host.page().style(ElementRole::Navbar, names::STYLE_TRANSFORM),
        Some(names::TRANSFORM_SHOWN)
    );
    assert!(host.page().has_class(ElementRole::Navbar, names::CLASS_SCROLLED));
    assert!(!host.page().has_class(ElementRole::BackToTop, names::CLASS_VISIBLE));
}

#[test]
fn deep_scroll_then_back_to_top() {
    let mut host = mobile_host();
    scroll(&mut host, 1_200.0, 375.0);
    assert!(host.page().has_class(ElementRole::BackToTop, names::CLASS_VISIBLE));

    let outcome = host.handle(&PageEvent::BackToTopClick);
    assert!(outcome.dispatch.handled);
    assert_eq!(host.page().scroll_requests(), vec![0.0]);

    // The browser then reports the scroll back up.
    scroll(&mut host, 0.0, 375.0);
    assert!(!host.state().back_to_top_visible);
    assert!(!host.state().navbar_scrolled);
}

#[test]
fn menu_open_then_anchor_navigation_closes_it() {
    let mut host = mobile_host();
    host.handle(&PageEvent::ToggleClick);
    assert_eq!(
        host.page()
            .attribute(ElementRole::MenuToggle, names::ATTR_ARIA_EXPANDED),
        Some("true")
    );
    assert_eq!(
        host.page()
            .attribute(ElementRole::MenuToggle, names::ATTR_ARIA_LABEL),
        Some("Close menu")
    );

    let outcome = host.handle(&PageEvent::AnchorClick {
        href: "#team".into(),
    });
    assert!(outcome.dispatch.prevent_default);
    assert_eq!(host.page().scroll_requests(), vec![1_540.0]);
    assert!(!host.state().menu_open);
    assert!(!host.page().has_class(ElementRole::MenuPanel, names::CLASS_ACTIVE));
    assert_eq!(
        host.page()
            .attribute(ElementRole::MenuToggle, names::ATTR_ARIA_LABEL),
        Some("Open menu")
    );
}

#[test]
fn outside_click_and_escape_close_menu() {
    let mut host = mobile_host();
    host.handle(&PageEvent::ToggleClick);
    let inside = host.handle(&PageEvent::DocumentClick { inside_menu: true });
    assert!(!inside.dispatch.handled);
    assert!(host.state().menu_open);

    host.handle(&PageEvent::DocumentClick { inside_menu: false });
    assert!(!host.state().menu_open);

    host.handle(&PageEvent::ToggleClick);
    host.handle(&PageEvent::Key { key: Key::Enter });
    assert!(host.state().menu_open);
    host.handle(&PageEvent::Key { key: Key::Escape });
    assert!(!host.state().menu_open);
}

#[test]
fn rotating_to_landscape_closes_menu_after_debounce() {
    let mut host = mobile_host();
    host.handle(&PageEvent::ToggleClick);
    for width in [700.0, 820.0, 900.0] {
        host.advance_time(ms(100));
        host.handle(&PageEvent::Resize { width });
    }
    assert!(host.state().menu_open);

    host.advance_time(ms(249));
    assert!(!host.poll_timers());
    host.advance_time(ms(1));
    assert!(host.poll_timers());
    assert!(!host.state().menu_open);
    assert_eq!(host.coordinator().width(), 900.0);
}

#[test]
fn localized_labels_flow_to_the_toggle() {
    let config = SiteConfig::default().with_menu_labels("메뉴 열기", "메뉴 닫기");
    let mut host = SiteHost::deterministic(config, Viewport::new(375.0, 0.0), RecordingPage::new());
    assert_eq!(
        host.page()
            .attribute(ElementRole::MenuToggle, names::ATTR_ARIA_LABEL),
        Some("메뉴 열기")
    );
    host.handle(&PageEvent::ToggleClick);
    assert_eq!(
        host.page()
            .attribute(ElementRole::MenuToggle, names::ATTR_ARIA_LABEL),
        Some("메뉴 닫기")
    );
}

#[test]
fn landing_page_without_menu_or_back_to_top() {
    let page = RecordingPage::with_elements([ElementRole::Navbar]).with_section("contact", 300.0);
    let mut host = SiteHost::deterministic(SiteConfig::default(), Viewport::new(375.0, 0.0), page);
    assert_eq!(
        host.plan().kinds(),
        &[
            EventKind::WindowScroll,
            EventKind::WindowResize,
            EventKind::AnchorClick
        ]
    );

    host.handle(&PageEvent::ToggleClick);
    assert!(!host.state().menu_open);

    scroll(&mut host, 900.0, 375.0);
    assert!(host.state().back_to_top_visible);
    assert!(host.page().has_class(ElementRole::Navbar, names::CLASS_SCROLLED));

    let outcome = host.handle(&PageEvent::AnchorClick {
        href: "#contact".into(),
    });
    assert!(outcome.dispatch.prevent_default);
    assert_eq!(host.page().scroll_requests(), vec![200.0]);
}

#[test]
fn external_links_pass_through() {
    let mut host = mobile_host();
    let outcome = host.handle(&PageEvent::AnchorClick {
        href: "/careers.html".into(),
    });
    assert!(!outcome.dispatch.handled);
    assert!(!outcome.dispatch.prevent_default);
    assert!(host.page().scroll_requests().is_empty());
}
