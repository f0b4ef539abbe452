//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tranquil::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let filters = [
            ("lowpass", SVFilter::lowpass(700.0)),
            ("highpass", SVFilter::highpass(120.0)),
            ("bandpass", SVFilter::bandpass(900.0)),
        ];
        for (name, mut filter) in filters {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
                })
            });
        }

        // Cutoff moved every block, as a modulated layer does
        let mut filter = SVFilter::bandpass(900.0);
        let mut buffer = input.clone();
        let mut phase = 0.0f32;
        group.bench_with_input(BenchmarkId::new("bandpass_swept", size), &size, |b, _| {
            b.iter(|| {
                phase += 0.01;
                filter.set_cutoff(900.0 + 400.0 * phase.sin());
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });
    }

    group.finish();
}
