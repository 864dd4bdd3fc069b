//! Benchmarks for the per-frame text drawing path.
//!
//! Run with: `cargo bench --package glint_term --bench draw_text`
//!
//! Shaping goes through the deterministic fake backend, so these numbers
//! cover plan lookup, glyph batching and synthetic glyph recording only.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glint_paint::{Color, PaintContext};
use glint_term::{FontStyle, RenderConfig, TerminalDraw, TextAttrs, TextRequest};
use glint_text::testing::FakeResolver;
use glint_text::{FontDescription, FontHandleCache};

const COLUMNS: usize = 120;
const ROWS: usize = 40;

const SHELL: &str = "drwxr-xr-x  12 user staff   384 Oct 19 10:42 src/ -> cargo build --release";
const BOXES: &str = "┌──────┬──────┐│ ▓▓▓▓ │ ░░░░ │├──────┼──────┤╰─╯▗▄▖▝▀▘";
const MIXED: &str = "café naïve 世界 résumé → ≤ ≥ ∈ λ";

fn terminal() -> TerminalDraw {
    let cache = FontHandleCache::new(Rc::new(FakeResolver::new())).shared();
    let mut draw = TerminalDraw::new(cache, RenderConfig::default());
    draw.set_font(&FontDescription::new("Fake Mono", 11.0), 1.0, 1.0)
        .expect("fake font");
    draw
}

fn screen(text: &str, cell_width: i32, cell_height: i32) -> Vec<Vec<TextRequest>> {
    let chars: Vec<char> = text.chars().collect();
    (0..ROWS)
        .map(|row| {
            (0..COLUMNS)
                .map(|col| {
                    let c = chars[(row * COLUMNS + col) % chars.len()];
                    TextRequest::new(c, col as i32 * cell_width, row as i32 * cell_height)
                })
                .collect()
        })
        .collect()
}

fn bench_full_screen(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_text/screen");
    group.throughput(Throughput::Elements((COLUMNS * ROWS) as u64));

    for (name, text) in [("shell", SHELL), ("boxes", BOXES), ("mixed", MIXED)] {
        let mut draw = terminal();
        let metrics = draw.cell_metrics();
        let rows = screen(text, metrics.cell_width, metrics.cell_height);

        group.bench_with_input(BenchmarkId::from_parameter(name), &rows, |b, rows| {
            b.iter(|| {
                let mut ctx = PaintContext::new();
                let mut frame = draw.begin(&mut ctx);
                for row in rows {
                    frame.draw_text(
                        black_box(row),
                        FontStyle::NORMAL,
                        TextAttrs::NONE,
                        Color::WHITE,
                        1.0,
                    );
                }
                drop(frame);
                black_box(ctx.take_commands())
            })
        });
    }
    group.finish();
}

fn bench_fake_bold(c: &mut Criterion) {
    let cache = FontHandleCache::new(Rc::new(
        FakeResolver::new().with_style_advance(true, false, 14.0),
    ))
    .shared();
    let mut draw = TerminalDraw::new(cache, RenderConfig::default());
    draw.set_font(&FontDescription::new("Fake Mono", 11.0), 1.0, 1.0)
        .expect("fake font");
    let metrics = draw.cell_metrics();
    let rows = screen(SHELL, metrics.cell_width, metrics.cell_height);

    c.bench_function("draw_text/fake_bold_row", |b| {
        b.iter(|| {
            let mut ctx = PaintContext::new();
            draw.begin(&mut ctx).draw_text(
                black_box(&rows[0]),
                FontStyle::BOLD,
                TextAttrs::NONE,
                Color::WHITE,
                1.0,
            );
            black_box(ctx.take_commands())
        })
    });
}

fn bench_undercurl(c: &mut Criterion) {
    let mut draw = terminal();
    c.bench_function("draw_undercurl/120_cells", |b| {
        b.iter(|| {
            let mut ctx = PaintContext::new();
            draw.begin(&mut ctx)
                .draw_undercurl(0, black_box(17.5), 1.0, COLUMNS, Color::WHITE, 1.0);
            black_box(ctx.take_commands())
        })
    });
}

criterion_group!(benches, bench_full_screen, bench_fake_bold, bench_undercurl);
criterion_main!(benches);
