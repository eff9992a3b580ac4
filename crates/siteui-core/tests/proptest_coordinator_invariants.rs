//! Property-based invariant tests for the viewport coordinator.
//!
//! These hold for **any** admissible input sequence:
//!
//! 1. `navbar_scrolled` tracks `y > 100` after an admitted scroll.
//! 2. `back_to_top_visible` tracks `y > 500` after an admitted scroll.
//! 3. `navbar_hidden` is never true on a desktop width.
//! 4. `navbar_hidden` implies the last admitted width was mobile.
//! 5. Toggling the menu twice restores the previous state.
//! 6. Any burst of scrolls inside one throttle window runs at most once.
//! 7. A resize burst with gaps below the debounce wait runs exactly once, at
//!    last call + wait.
//! 8. Recording then replaying any event sequence reproduces every checksum.

use core::time::Duration;

use proptest::prelude::*;
use siteui_core::{
    PageEvent, RecordingPage, SessionRecorder, SiteConfig, Viewport, ViewportCoordinator, replay,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn attached(width: f64) -> (ViewportCoordinator, RecordingPage) {
    let mut page = RecordingPage::new();
    let mut coordinator = ViewportCoordinator::new(SiteConfig::default(), Viewport::new(width, 0.0));
    coordinator.attach(&mut page);
    (coordinator, page)
}

// ── Strategies ────────────────────────────────────────────────────────────

fn scroll_offset() -> impl Strategy<Value = f64> {
    (0u32..5_000).prop_map(f64::from)
}

fn any_width() -> impl Strategy<Value = f64> {
    (320u32..2_560).prop_map(f64::from)
}

fn desktop_width() -> impl Strategy<Value = f64> {
    (769u32..2_560).prop_map(f64::from)
}

fn page_event() -> impl Strategy<Value = PageEvent> {
    prop_oneof![
        4 => (scroll_offset(), any_width()).prop_map(|(y, width)| PageEvent::Scroll { y, width }),
        2 => any_width().prop_map(|width| PageEvent::Resize { width }),
        2 => Just(PageEvent::ToggleClick),
        1 => any::<bool>().prop_map(|inside_menu| PageEvent::DocumentClick { inside_menu }),
        1 => Just(PageEvent::BackToTopClick),
    ]
}

/// (event, milliseconds to advance before it)
fn timed_events() -> impl Strategy<Value = Vec<(PageEvent, u64)>> {
    prop::collection::vec((page_event(), 0u64..400), 1..40)
}

// ═══════════════════════════════════════════════════════════════════════════
// 1-2. Threshold flags follow the admitted offset
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrolled_and_back_to_top_follow_thresholds(y in scroll_offset(), width in any_width()) {
        let (mut coordinator, mut page) = attached(width);
        prop_assert!(coordinator.on_scroll(ms(0), y, width, &mut page));
        let state = coordinator.state();
        prop_assert_eq!(state.navbar_scrolled, y > 100.0);
        prop_assert_eq!(state.back_to_top_visible, y > 500.0);
        prop_assert_eq!(state.last_scroll_y, y);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 3-4. Navbar hiding is mobile-only
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn desktop_never_hides_navbar(
        offsets in prop::collection::vec(scroll_offset(), 1..30),
        width in desktop_width(),
    ) {
        let (mut coordinator, mut page) = attached(width);
        for (i, y) in offsets.into_iter().enumerate() {
            coordinator.on_scroll(ms(i as u64 * 150), y, width, &mut page);
            prop_assert!(!coordinator.state().navbar_hidden);
        }
    }

    #[test]
    fn hidden_navbar_implies_mobile_width(events in timed_events()) {
        let (mut coordinator, mut page) = attached(375.0);
        let mut now = Duration::ZERO;
        for (event, advance) in events {
            now += ms(advance);
            coordinator.poll(now, &mut page);
            prop_assert!(!(coordinator.width() > 768.0 && coordinator.state().navbar_hidden));
            coordinator.dispatch(&event, now, &mut page);
            prop_assert!(!(coordinator.width() > 768.0 && coordinator.state().navbar_hidden));
        }
        coordinator.poll(now + ms(10_000), &mut page);
        prop_assert!(!(coordinator.width() > 768.0 && coordinator.state().navbar_hidden));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 5. Toggle is an involution
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_twice_is_identity(prefix in 0usize..5, width in any_width()) {
        let (mut coordinator, mut page) = attached(width);
        for _ in 0..prefix {
            coordinator.toggle_menu(&mut page);
        }
        let before = *coordinator.state();
        coordinator.toggle_menu(&mut page);
        coordinator.toggle_menu(&mut page);
        prop_assert_eq!(*coordinator.state(), before);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 6. Throttle admits at most one call per window
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn burst_inside_window_runs_at_most_once(
        mut offsets_ms in prop::collection::vec(0u64..100, 1..50),
        start in 0u64..10_000,
    ) {
        offsets_ms.sort_unstable();
        let (mut coordinator, mut page) = attached(375.0);
        let admitted = offsets_ms
            .iter()
            .filter(|&&dt| coordinator.on_scroll(ms(start + dt), 300.0, 375.0, &mut page))
            .count();
        prop_assert!(admitted <= 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 7. Debounce runs once at last call + wait
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_burst_runs_once_after_quiet_period(
        gaps in prop::collection::vec(0u64..250, 1..20),
    ) {
        let (mut coordinator, mut page) = attached(600.0);
        coordinator.toggle_menu(&mut page);

        let mut now = Duration::ZERO;
        let mut runs = 0;
        for gap in gaps {
            now += ms(gap);
            if coordinator.poll(now, &mut page) {
                runs += 1;
            }
            coordinator.on_resize(now, 1_024.0);
        }
        prop_assert_eq!(runs, 0);
        prop_assert!(coordinator.state().menu_open);
        prop_assert_eq!(coordinator.next_deadline(), Some(now + ms(250)));

        prop_assert!(!coordinator.poll(now + ms(249), &mut page));
        prop_assert!(coordinator.poll(now + ms(250), &mut page));
        prop_assert!(!coordinator.poll(now + ms(1_000), &mut page));
        prop_assert!(!coordinator.state().menu_open);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 8. Record / replay determinism
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_reproduces_recorded_session(events in timed_events(), width in any_width()) {
        let page = RecordingPage::new().with_section("services", 900.0);
        let mut recorder =
            SessionRecorder::new(SiteConfig::default(), Viewport::new(width, 0.0), page.clone());
        for (event, advance) in events {
            recorder.advance_time(ms(advance));
            recorder.push_event(event);
            recorder.step();
        }
        let trace = recorder.finish();
        let result = replay(SiteConfig::default(), page, &trace).unwrap();
        prop_assert!(result.ok(), "mismatch: {:?}", result.first_mismatch);
        prop_assert_eq!(Some(result.final_checksum_chain), trace.final_checksum_chain());
    }
}
