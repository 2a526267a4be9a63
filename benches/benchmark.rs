//! Performance benchmarks for rs-struktur.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Parsing plus detection on synthetic annotated grids of growing size
//! - Detection alone on an already parsed page
//! - Snapshot input

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_struktur::{detect_html, detect_snapshot, detect_structures, html, Options};

/// Annotated product grid with `count` cards in rows of four.
fn grid_html(count: usize) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html><html><head><title>Shop</title></head>
<body data-struktur-rect="0,0,1280,20000"><header><nav><a href="/">Home</a><a href="/cart">Cart</a></nav></header>
<main><div class="grid" data-struktur-rect="0,100,1240,19000">"#,
    );
    for i in 0..count {
        let x = (i % 4) * 310;
        let y = 100 + (i / 4) * 420;
        html.push_str(&format!(
            r#"<div class="card" data-struktur-rect="{x},{y},300,400">
<img src="/img/{i}.webp" alt="Product {i}" data-struktur-rect="{x},{y},300,300">
<div class="meta"><a href="/p/{i}">Product {i}</a><span class="price">{}.99</span>
<span class="badge">New</span></div></div>"#,
            10 + i % 90
        ));
    }
    html.push_str("</div></main><footer><p>Copyright 2026</p></footer></body></html>");
    html
}

fn grid_snapshot(count: usize) -> String {
    let cards: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "type": "element", "tag": "li",
                "rect": {"x": 0, "y": i * 120, "width": 600, "height": 120},
                "children": [
                    {"type": "element", "tag": "a", "attrs": {"href": format!("/r/{i}")},
                     "children": [{"type": "text", "text": format!("Result {i}")}]},
                    {"type": "text", "text": "A short snippet of the result."}
                ]
            })
        })
        .collect();
    serde_json::json!({
        "type": "element", "tag": "body",
        "children": [{"type": "element", "tag": "ul", "children": cards}]
    })
    .to_string()
}

fn bench_detect_html(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("detect_html");

    for count in [12, 120, 1200] {
        let html = grid_html(count);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("cards", count), &html, |b, html| {
            b.iter(|| detect_html(black_box(html), black_box(&options)));
        });
    }

    group.finish();
}

fn bench_detect_parsed(c: &mut Criterion) {
    let options = Options::default();
    let Ok(page) = html::parse_annotated_html(&grid_html(120)) else {
        return;
    };

    c.bench_function("detect_structures_parsed", |b| {
        b.iter(|| detect_structures(black_box(&page.tree), page.root, black_box(&options)));
    });

    let fulltext = Options {
        fulltext: true,
        add_class: true,
        ..Options::default()
    };
    c.bench_function("detect_structures_fulltext", |b| {
        b.iter(|| detect_structures(black_box(&page.tree), page.root, black_box(&fulltext)));
    });
}

fn bench_detect_snapshot(c: &mut Criterion) {
    let options = Options::default();
    let json = grid_snapshot(500);
    c.bench_function("detect_snapshot", |b| {
        b.iter(|| detect_snapshot(black_box(&json), black_box(&options)));
    });
}

criterion_group!(
    benches,
    bench_detect_html,
    bench_detect_parsed,
    bench_detect_snapshot
);
criterion_main!(benches);
