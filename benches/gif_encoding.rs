// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use frame_capture::animation::{encode, FrameDelay, GifOptions, Palette};
use frame_capture::domain::video::{Fps, PalettePolicy};
use frame_capture::media::Bitmap;
use std::hint::black_box;

/// Frames with more than 256 colors so the neural quantizer is exercised.
fn gradient_frames(count: u8, width: u32, height: u32) -> Vec<Bitmap> {
    (0..count)
        .map(|i| {
            let mut pixels = Vec::with_capacity((width * height * 4) as usize);
            for y in 0..height {
                for x in 0..width {
                    pixels.extend_from_slice(&[
                        (x * 255 / width) as u8,
                        (y * 255 / height) as u8,
                        i.wrapping_mul(16),
                        255,
                    ]);
                }
            }
            Bitmap::from_rgba(width, height, pixels).expect("bitmap")
        })
        .collect()
}

fn gif_encoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("gif_encoding");
    group.sample_size(10);

    let frames = gradient_frames(8, 320, 180);
    let delay = FrameDelay::from_fps(Fps::new(8));

    group.bench_function("per_frame_palette_8x320", |b| {
        let options = GifOptions::new(delay, true);
        b.iter(|| black_box(encode(black_box(&frames), &options).expect("encode")));
    });

    group.bench_function("global_palette_8x320", |b| {
        let options = GifOptions::new(delay, true).with_palette(PalettePolicy::Global);
        b.iter(|| black_box(encode(black_box(&frames), &options).expect("encode")));
    });

    group.bench_function("train_single_palette", |b| {
        b.iter(|| black_box(Palette::for_frame(black_box(&frames[0]), 10)));
    });

    group.finish();
}

criterion_group!(benches, gif_encoding_benchmark);
criterion_main!(benches);
