//! Benchmarks for complete soundscapes.
//!
//! Each preset is built once and rendered block by block, the same work the
//! audio callback does for a playing session.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use tranquil::{
    graph::{GraphBuilder, RenderCtx},
    preset,
};

use crate::BLOCK_SIZES;

pub fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/presets");
    let ctx = RenderCtx::new(48_000.0, 2);

    for preset in preset::all() {
        let mut rng = StdRng::seed_from_u64(1);
        let Ok(mut graph) = GraphBuilder::new(ctx).build(&preset, &mut rng) else {
            continue;
        };

        for &size in BLOCK_SIZES {
            let mut buffer = vec![0.0f32; size * ctx.channels];
            group.bench_with_input(BenchmarkId::new(preset.name(), size), &size, |b, _| {
                b.iter(|| graph.render_block(black_box(&mut buffer)))
            });
        }
    }

    // Five sessions playing at once
    for &size in BLOCK_SIZES {
        let mut rng = StdRng::seed_from_u64(2);
        let mut graphs: Vec<_> = preset::all()
            .iter()
            .filter_map(|preset| GraphBuilder::new(ctx).build(preset, &mut rng).ok())
            .collect();
        let mut buffer = vec![0.0f32; size * ctx.channels];
        group.bench_with_input(BenchmarkId::new("all_layered", size), &size, |b, _| {
            b.iter(|| {
                for graph in graphs.iter_mut() {
                    graph.render_block(black_box(&mut buffer));
                }
            })
        });
    }

    group.finish();
}
