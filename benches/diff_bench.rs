//! Buffer diff and full-frame render benchmarks.
//!
//! Run with: cargo bench --bench diff_bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glyphframe::buffer::Buffer;
use glyphframe::geometry::Rect;
use glyphframe::state::StateStore;
use glyphframe::style::{Color, Style};
use glyphframe::{Session, WidgetNode};

fn filled_text(area: Rect, seed: u16) -> Buffer {
    let mut buf = Buffer::empty(area);
    let style = Style::default().fg(Color::Indexed((seed % 200) as u8));
    for y in area.top()..area.bottom() {
        let line = format!("{:>width$}", y.wrapping_add(seed), width = area.width as usize);
        buf.set_string(area.x, y, &line, style);
    }
    buf
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer/diff");

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        let area = Rect::new(0, 0, w, h);
        group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));

        let prev = filled_text(area, 0);
        let same = prev.clone();
        group.bench_with_input(
            BenchmarkId::new("unchanged", format!("{w}x{h}")),
            &(),
            |b, _| b.iter(|| black_box(prev.diff(&same))),
        );

        let next = filled_text(area, 7);
        group.bench_with_input(
            BenchmarkId::new("all_changed", format!("{w}x{h}")),
            &(),
            |b, _| b.iter(|| black_box(prev.diff(&next))),
        );
    }

    group.finish();
}

fn bench_render_tree(c: &mut Criterion) {
    let node: WidgetNode = match serde_json::from_str(
        r#"{"type": "layout", "direction": "vertical",
            "constraints": [{"length": 3}, {"fill": 1}, {"length": 1}],
            "children": [
                {"type": "block", "title": "header", "borders": "all"},
                {"type": "list", "items": ["alpha", "beta", "gamma", "delta"]},
                {"type": "gauge", "ratio": 0.4}
            ]}"#,
    ) {
        Ok(node) => node,
        Err(e) => panic!("bench tree: {e}"),
    };

    let mut group = c.benchmark_group("session/render");
    for (w, h) in [(80u16, 24u16), (200, 60)] {
        let mut session = match Session::headless(w, h) {
            Ok(session) => session,
            Err(e) => panic!("headless session: {e}"),
        };
        let mut states = StateStore::new();
        group.bench_function(BenchmarkId::new("steady_state", format!("{w}x{h}")), |b| {
            b.iter(|| {
                let _ = session.render(black_box(&node), &mut states);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff, bench_render_tree);
criterion_main!(benches);
