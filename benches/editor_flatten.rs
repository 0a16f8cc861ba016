// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use frame_capture::domain::editing::AdjustmentPercent;
use frame_capture::image_editor::EditSession;
use frame_capture::media::Bitmap;
use std::hint::black_box;

fn frame(width: u32, height: u32) -> Bitmap {
    let pixels = [90, 140, 200, 255]
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Bitmap::from_rgba(width, height, pixels).expect("bitmap")
}

fn editor_flatten_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor_flatten");

    let mut inked = EditSession::open(frame(1280, 720)).expect("editor");
    inked.begin_stroke((10.0, 10.0));
    for step in 1..100u16 {
        let t = f32::from(step);
        inked.stroke_to((10.0 + t * 12.0, 10.0 + t * 7.0));
    }
    inked.end_stroke();

    group.bench_function("flatten_with_ink_720p", |b| {
        b.iter(|| black_box(inked.flatten().expect("flatten")));
    });

    let mut adjusted = inked.clone();
    adjusted.set_adjustment(AdjustmentPercent::new(130.0), AdjustmentPercent::new(80.0));
    group.bench_function("flatten_adjusted_720p", |b| {
        b.iter(|| black_box(adjusted.flatten().expect("flatten")));
    });

    group.finish();
}

criterion_group!(benches, editor_flatten_benchmark);
criterion_main!(benches);
