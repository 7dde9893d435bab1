//! Benchmarks for subdivision and hierarchical localization
//!
//! 1. **`subdivide`** and **`subdivide_to_depth`**: child generation cost
//! 2. **`locate`**: linear scan over the 60 base faces
//! 3. **`localize`**: full driver cost at increasing depths (expected linear)
//! 4. **`Localizer::labels`**: glyph resolution for a localized address

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use facet_address::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::sync::OnceLock;

/// Get the deterministic seed for random target generation.
/// Reads `FACET_BENCH_SEED` (decimal or 0x-hex). Defaults to 0xFACE.
fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        std::env::var("FACET_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0xFACE)
    })
}

/// Seeded target directions on the sphere of radius `size`.
fn random_targets(count: usize, size: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(get_benchmark_seed());
    let mut targets = Vec::with_capacity(count);
    while targets.len() < count {
        let candidate = Point::new([
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ]);
        if let Some(direction) = candidate.normalized() {
            targets.push(direction * size);
        }
    }
    targets
}

fn benchmark_subdivision(c: &mut Criterion) {
    let mesh = build_base_mesh(100.0).unwrap();
    let mut group = c.benchmark_group("subdivision");

    group.bench_function("subdivide", |b| {
        b.iter(|| black_box(subdivide(black_box(&mesh[7]))));
    });

    for depth in [1_usize, 3, 5] {
        group.throughput(Throughput::Elements(4_u64.pow(u32::try_from(depth).unwrap())));
        group.bench_with_input(
            BenchmarkId::new("subdivide_to_depth", depth),
            &depth,
            |b, &depth| b.iter(|| black_box(subdivide_to_depth(&mesh[7], depth))),
        );
    }
    group.finish();
}

fn benchmark_locate(c: &mut Criterion) {
    let mesh = build_base_mesh(100.0).unwrap();
    let targets = random_targets(256, 100.0);
    let mut group = c.benchmark_group("locate");
    group.throughput(Throughput::Elements(targets.len() as u64));

    group.bench_function("base_mesh", |b| {
        b.iter(|| {
            for target in &targets {
                black_box(locate(&mesh, target).unwrap());
            }
        });
    });
    group.finish();
}

fn benchmark_localize(c: &mut Criterion) {
    let mesh = build_base_mesh(100.0).unwrap();
    let targets = random_targets(64, 100.0);
    let mut group = c.benchmark_group("localize");
    group.throughput(Throughput::Elements(targets.len() as u64));

    for depth in [0_usize, 4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            b.iter(|| {
                for target in &targets {
                    black_box(localize(&mesh, target, depth).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn benchmark_labels(c: &mut Criterion) {
    let mut glyphs = GlyphTables::default();
    glyphs.base.insert(0, "31-KARAS-glyph".to_owned());
    glyphs.child.insert(3, "center-glyph".to_owned());
    glyphs.tile.insert(63, "center-glyph".to_owned());
    let config = LocatorConfigBuilder::default()
        .max_depth(8)
        .glyphs(glyphs)
        .build()
        .unwrap();
    let localizer = Localizer::new(config).unwrap();
    let localizations: Vec<_> = random_targets(64, 100.0)
        .iter()
        .map(|target| localizer.localize(target).unwrap())
        .collect();

    c.bench_function("labels/depth_8", |b| {
        b.iter(|| {
            for localization in &localizations {
                black_box(localizer.labels(localization));
                black_box(localizer.tile_label(localization));
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_subdivision,
    benchmark_locate,
    benchmark_localize,
    benchmark_labels
);
criterion_main!(benches);
