//! Benchmarks for the pixbatch resizing pipeline.
//!
//! Run with: cargo bench -p pixbatch-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};
use pixbatch_core::config::{BatchSettings, Config, LimitsConfig, ResizeConfig};
use pixbatch_core::pipeline::{
    calculate_target_dimensions, ImageCodec, ImageRsBackend, Raster, SignatureValidator,
};
use pixbatch_core::types::{Dimensions, ImageFormat, InputItem};
use pixbatch_core::BatchOrchestrator;
use std::io::Cursor;

fn fixture(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    }));
    let mut buffer = Cursor::new(Vec::new());
    if img.write_to(&mut buffer, format).is_err() {
        eprintln!("Skipping fixture: {format:?} encoder unavailable");
    }
    buffer.into_inner()
}

fn benchmark_target_dimensions(c: &mut Criterion) {
    let policy = ResizeConfig::Width { target: 1280 };

    c.bench_function("target_dimensions_width", |b| {
        b.iter(|| {
            let _ = calculate_target_dimensions(black_box(Dimensions::new(4032, 3024)), &policy);
        })
    });
}

fn benchmark_signature(c: &mut Criterion) {
    let png = fixture(64, 64, image::ImageFormat::Png);
    let items: Vec<InputItem> = (0..100)
        .map(|i| InputItem::new(i.to_string(), format!("{i}.png"), "png", png.clone()))
        .collect();

    c.bench_function("signature_detect", |b| {
        b.iter(|| SignatureValidator::detect(black_box(&png)))
    });

    c.bench_function("signature_analyze_100", |b| {
        b.iter(|| SignatureValidator::analyze(black_box(&items)))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let jpeg = fixture(1920, 1080, image::ImageFormat::Jpeg);
    let item = InputItem::new("1", "bench.jpg", "image/jpeg", jpeg);
    let codec = ImageCodec::new(LimitsConfig::default());
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("decode_jpeg_1080p", |b| {
        b.iter(|| {
            let _ = rt.block_on(codec.decode(black_box(&item), ImageFormat::Jpeg));
        })
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let raster = Raster::new(DynamicImage::new_rgb8(1920, 1080));
    let target = Dimensions::new(960, 540);

    c.bench_function("resize_encode_jpeg_half", |b| {
        b.iter(|| {
            let _ = ImageRsBackend::encode_sync(
                black_box(raster.clone()),
                target,
                ImageFormat::Jpeg,
                0.9,
            );
        })
    });

    c.bench_function("resize_encode_png_half", |b| {
        b.iter(|| {
            let _ =
                ImageRsBackend::encode_sync(black_box(raster.clone()), target, ImageFormat::Png, 0.9);
        })
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let mut config = Config::default();
    config.pipeline.yield_ms = 0;
    let orchestrator = match BatchOrchestrator::new(&config, BatchSettings::default()) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Skipping batch benchmark: {e}");
            return;
        }
    };
    let png = fixture(640, 480, image::ImageFormat::Png);
    let items: Vec<InputItem> = (0..8)
        .map(|i| InputItem::new(i.to_string(), format!("{i}.png"), "png", png.clone()))
        .collect();
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("batch_8_png_half_scale", |b| {
        b.iter(|| {
            let _ = rt.block_on(orchestrator.run(black_box(items.clone())));
        })
    });
}

criterion_group!(
    benches,
    benchmark_target_dimensions,
    benchmark_signature,
    benchmark_decode,
    benchmark_encode,
    benchmark_batch,
);
criterion_main!(benches);
