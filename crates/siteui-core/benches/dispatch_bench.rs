//! Benchmark: coordinator dispatch throughput.
//!
//! Run with: `cargo bench -p siteui-core --bench dispatch_bench`
//!
//! Scroll handlers fire at display refresh rate on real pages, so the cost
//! that matters is a throttled burst (mostly rejected calls) and an admitted
//! scroll that flips every presentation flag.

use core::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use siteui_core::{PageEvent, RecordingPage, SiteConfig, SiteHost, Viewport, ViewportCoordinator};

fn attached() -> (ViewportCoordinator, RecordingPage) {
    let mut page = RecordingPage::new();
    let mut coordinator = ViewportCoordinator::new(SiteConfig::default(), Viewport::new(375.0, 0.0));
    coordinator.attach(&mut page);
    (coordinator, page)
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    group.bench_function("throttled_burst_60", |b| {
        b.iter_batched(
            attached,
            |(mut coordinator, mut page)| {
                for i in 0..60u64 {
                    // 60 events inside 100ms: one admission.
                    coordinator.on_scroll(
                        Duration::from_micros(i * 1_600),
                        black_box(100.0 + i as f64 * 10.0),
                        375.0,
                        &mut page,
                    );
                }
                coordinator
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("admitted_flip_all_flags", |b| {
        b.iter_batched(
            attached,
            |(mut coordinator, mut page)| {
                coordinator.on_scroll(Duration::ZERO, black_box(900.0), 375.0, &mut page);
                coordinator.on_scroll(Duration::from_millis(200), black_box(0.0), 375.0, &mut page);
                page
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_host_step(c: &mut Criterion) {
    let events: Vec<PageEvent> = (0..256)
        .map(|i| match i % 4 {
            0 => PageEvent::Scroll {
                y: f64::from(i) * 7.0,
                width: 375.0,
            },
            1 => PageEvent::Resize {
                width: if i % 8 == 1 { 600.0 } else { 1_024.0 },
            },
            2 => PageEvent::ToggleClick,
            _ => PageEvent::DocumentClick { inside_menu: false },
        })
        .collect();

    c.bench_function("host_step_256_events", |b| {
        b.iter_batched(
            || {
                let host = SiteHost::deterministic(
                    SiteConfig::default(),
                    Viewport::new(375.0, 0.0),
                    RecordingPage::new(),
                );
                (host, events.clone())
            },
            |(mut host, events)| {
                for (i, event) in events.into_iter().enumerate() {
                    if i % 16 == 0 {
                        host.advance_time(Duration::from_millis(120));
                    }
                    host.push_event(event);
                }
                black_box(host.step())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_scroll, bench_host_step);
criterion_main!(benches);
