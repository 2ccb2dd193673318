//! Benchmarks for the filter projection and export over a full store

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use webscope::event::{DetailValue, Event, EventKind};
use webscope::view::EventsView;

fn full_view() -> EventsView {
    let mut view = EventsView::with_capacity(1000);
    let kinds = [EventKind::Navigation, EventKind::ScriptMessage, EventKind::UiDelegate];
    for i in 0..1000 {
        let kind = kinds[i % kinds.len()];
        view.append(Event::new(
            kind,
            format!("hook{}", i % 10),
            vec![
                ("url", DetailValue::from(format!("https://example.com/page/{i}"))),
                ("index", DetailValue::from(i as i64)),
            ],
        ));
    }
    view
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_1000_events", |b| {
        b.iter(|| {
            let mut view = EventsView::with_capacity(1000);
            for i in 0..1000 {
                view.append(Event::new(
                    EventKind::Navigation,
                    "didCommitNavigation",
                    vec![("index", DetailValue::from(i as i64))],
                ));
            }
            black_box(view.filtered().len())
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let mut view = full_view();
    c.bench_function("search_full_store", |b| {
        b.iter(|| {
            view.set_search_text("page/5");
            black_box(view.filtered().len())
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let view = full_view();
    c.bench_function("export_full_store", |b| {
        b.iter(|| black_box(view.export_text().len()))
    });
}

criterion_group!(benches, bench_append, bench_search, bench_export);
criterion_main!(benches);
