//! Benchmarks for pixpipe operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

use pixpipe_core::parallel::{parallel, partition};
use pixpipe_core::{copy, Canvas, Image, Layout, Params, Raster, SubsampleRatio, YCbCr};
use pixpipe_ops::{AlwaysChange, Gamma, GammaCorrection, Identity, Transform};

fn test_image(layout: Layout, size: u32) -> Image {
    let mut raster = Raster::new(layout, size, size);
    for (i, v) in raster.pix_mut().iter_mut().enumerate() {
        *v = (i * 7 % 251) as u8;
    }
    Image::from(raster)
}

/// Benchmark the row dispatcher on its own.
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("partition_1080_16", |b| {
        b.iter(|| partition(black_box(1080), black_box(16)))
    });

    for rows in [64usize, 1080, 4320].iter() {
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("parallel_sum", rows), rows, |b, &n| {
            b.iter(|| {
                let total = AtomicU64::new(0);
                parallel(n, |start, end| {
                    let s: u64 = (start..end).map(|y| y as u64).sum();
                    total.fetch_add(s, Ordering::Relaxed);
                });
                total.into_inner()
            })
        });
    }

    group.finish();
}

/// Benchmark table construction and application.
fn bench_gamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("gamma");

    group.bench_function("table_build", |b| b.iter(|| Gamma::new(black_box(2.2), true)));

    let gamma = Gamma::new(2.2, false);
    let gamma_hq = Gamma::new(2.2, true);
    for size in [256u32, 1024].iter() {
        let image = test_image(Layout::Nrgba, *size);
        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));

        group.bench_with_input(BenchmarkId::new("nrgba", size), &image, |b, img| {
            b.iter(|| gamma.apply(black_box(img)))
        });

        group.bench_with_input(BenchmarkId::new("nrgba_hq", size), &image, |b, img| {
            b.iter(|| gamma_hq.apply(black_box(img)))
        });
    }

    group.finish();
}

/// Benchmark the full correction bracket around a no-op step.
fn bench_correction(c: &mut Criterion) {
    let mut group = c.benchmark_group("correction");

    let corrected = GammaCorrection::new(AlwaysChange(Identity), true);
    let params = Params::new();
    let image = test_image(Layout::Rgba, 512);
    group.throughput(Throughput::Elements(512 * 512));

    group.bench_function("rgba_512", |b| {
        b.iter(|| corrected.process(black_box(image.clone()), &params))
    });

    group.finish();
}

/// Benchmark accessor dispatch through copy.
fn bench_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy");
    let size = 512u32;
    group.throughput(Throughput::Elements((size as u64) * (size as u64)));

    let sources = [
        ("rgba", test_image(Layout::Rgba, size)),
        ("nrgba64", test_image(Layout::Nrgba64, size)),
        ("gray", test_image(Layout::Gray, size)),
        ("ycbcr420", Image::from(YCbCr::new(size, size, SubsampleRatio::R420))),
    ];

    for (name, src) in sources.iter() {
        group.bench_with_input(BenchmarkId::new("to_rgba", name), src, |b, img| {
            b.iter(|| {
                let mut dst = Canvas::new(Layout::Rgba, size, size);
                copy(&mut dst, black_box(img));
                dst
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_gamma, bench_correction, bench_copy);
criterion_main!(benches);
