//! Benchmarks for colored noise generation.
//!
//! Noise is rendered once per session start, not per block, so these
//! measure whole buffers rather than block sizes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use tranquil::dsp::{noise, NoiseColor};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    group.sample_size(20);

    for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(
            BenchmarkId::new("generate_2s_stereo", color.name()),
            &color,
            |b, &color| {
                b.iter(|| noise::generate(color, black_box(2.0), 48_000.0, 2, &mut rng))
            },
        );

        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(
            BenchmarkId::new("seamless_2s_stereo", color.name()),
            &color,
            |b, &color| {
                b.iter(|| {
                    noise::generate_seamless(color, black_box(2.0), 48_000.0, 2, 0.05, &mut rng)
                })
            },
        );
    }

    group.finish();
}
