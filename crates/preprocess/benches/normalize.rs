use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use preprocess::{ImageFormat, Normalizer};
use std::io::Cursor;

/// Create raw pixel buffer for benchmarking (gradient pattern)
fn create_test_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            pixels[idx] = (x % 256) as u8; // R
            pixels[idx + 1] = (y % 256) as u8; // G
            pixels[idx + 2] = ((x + y) % 256) as u8; // B
        }
    }
    pixels
}

fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pixels = create_test_pixels(width, height);
    let img = image::RgbImage::from_raw(width, height, pixels).unwrap();
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

fn benchmark_normalize_rgb(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_rgb");

    let resolutions = [(640, 480), (1280, 720), (1920, 1080), (3840, 2160)];
    let normalizer = Normalizer::default();

    for (width, height) in resolutions.iter() {
        let pixels = create_test_pixels(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("resize_center", format!("{}x{}", width, height)),
            &pixels,
            |b, pixels| {
                b.iter(|| {
                    normalizer
                        .normalize_rgb(black_box(pixels), black_box(*width), black_box(*height))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn benchmark_normalize_jpeg(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_jpeg");

    let resolutions = [(640, 480), (1280, 720), (1920, 1080)];
    let normalizer = Normalizer::default();

    for (width, height) in resolutions.iter() {
        let jpeg = create_test_jpeg(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("decode_resize_center", format!("{}x{}", width, height)),
            &jpeg,
            |b, jpeg| {
                b.iter(|| {
                    normalizer
                        .normalize(black_box(jpeg), ImageFormat::Jpeg)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_normalize_rgb, benchmark_normalize_jpeg);
criterion_main!(benches);
