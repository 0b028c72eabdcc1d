//! Constraint solver benchmarks.
//!
//! Run with: cargo bench --bench layout_bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glyphframe::geometry::{Margin, Rect};
use glyphframe::layout::{self, Constraint, Direction, Flex, Layout};

fn mixed_constraints(n: usize) -> Vec<Constraint> {
    (0..n)
        .map(|i| match i % 6 {
            0 => Constraint::Length(4),
            1 => Constraint::Percentage(10),
            2 => Constraint::Ratio(1, 7),
            3 => Constraint::Min(2),
            4 => Constraint::Max(12),
            _ => Constraint::Fill(1 + (i % 3) as u16),
        })
        .collect()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/solve");

    for n in [2usize, 8, 32, 128] {
        let constraints = mixed_constraints(n);
        for flex in [Flex::Legacy, Flex::SpaceBetween] {
            group.bench_with_input(
                BenchmarkId::new(format!("{flex:?}"), n),
                &constraints,
                |b, constraints| b.iter(|| black_box(layout::solve(constraints, 400, flex))),
            );
        }
    }

    group.finish();
}

fn bench_nested_split(c: &mut Criterion) {
    let outer = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(Margin::new(1, 1));
    let inner = Layout::horizontal([Constraint::Percentage(30), Constraint::Fill(1)]).spacing(1);

    c.bench_function("layout/nested_split_200x60", |b| {
        b.iter(|| {
            let rows = outer.split(black_box(Rect::new(0, 0, 200, 60)));
            rows.iter()
                .map(|row| inner.split(*row).len())
                .sum::<usize>()
        })
    });

    c.bench_function("layout/split_fn_vertical", |b| {
        let constraints = mixed_constraints(16);
        b.iter(|| {
            black_box(layout::split(
                Rect::new(0, 0, 80, 240),
                Direction::Vertical,
                &constraints,
                Flex::Center,
            ))
        })
    });
}

criterion_group!(benches, bench_solve, bench_nested_split);
criterion_main!(benches);
