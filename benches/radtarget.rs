use radtarget::lowlevel::{decode_rings, fit_ellipse};
use radtarget::{extract_contours, DecodeConfig, DetectConfig, Detector, Ellipse, ImageView};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const SIZE: usize = 640;

fn paint_frame() -> Vec<u8> {
    let codes = ["101010101010", "110000000001", "100110011001", "111000111000"];
    let mut image = vec![0u8; SIZE * SIZE];
    for (row, cy) in [100.0f64, 300.0, 500.0].into_iter().enumerate() {
        for (col, cx) in [100.0f64, 250.0, 400.0, 550.0].into_iter().enumerate() {
            let code = codes[(row + col) % codes.len()];
            paint_rad(&mut image, cx, cy, code);
        }
    }
    image
}

fn paint_rad(image: &mut [u8], cx: f64, cy: f64, code: &str) {
    let bits: Vec<bool> = code.chars().map(|ch| ch == '1').collect();
    let (x0, x1) = ((cx - 31.0) as usize, (cx + 31.0) as usize);
    let (y0, y1) = ((cy - 31.0) as usize, (cy + 31.0) as usize);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let r2 = dx * dx + dy * dy;
            if r2 > 900.0 {
                continue;
            }
            let r = r2.sqrt();
            let theta = dy.atan2(dx).rem_euclid(std::f64::consts::TAU);
            let segment = ((theta / (std::f64::consts::TAU / 12.0)) as usize).min(11);
            let dark = if (22.0..28.0).contains(&r) {
                segment == 0
            } else if (12.0..21.0).contains(&r) {
                !bits[segment]
            } else {
                false
            };
            image[y * SIZE + x] = if dark { 0 } else { 255 };
        }
    }
}

fn bench_detector(c: &mut Criterion) {
    let image = paint_frame();
    let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();

    let detector = Detector::new();
    c.bench_function("detect_12_targets", |b| {
        b.iter(|| black_box(detector.detect(view).unwrap()));
    });

    let contours = extract_contours(view).unwrap();
    c.bench_function("detect_with_contours_12_targets", |b| {
        b.iter(|| black_box(detector.detect_with_contours(view, &contours).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let detector_par = Detector::with_config(DetectConfig {
            parallel: true,
            ..DetectConfig::default()
        })
        .unwrap();
        c.bench_function("detect_12_targets_parallel", |b| {
            b.iter(|| black_box(detector_par.detect(view).unwrap()));
        });
    }
}

fn bench_stages(c: &mut Criterion) {
    let image = paint_frame();
    let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();

    let ellipse = Ellipse::new(100.0, 100.0, 60.0, 60.0, -90.0);
    let cfg = DecodeConfig::default();
    c.bench_function("decode_rings", |b| {
        b.iter(|| black_box(decode_rings(view, black_box(&ellipse), &cfg)));
    });

    let points: Vec<[f64; 2]> = (0..120)
        .map(|i| black_box(&ellipse).point_at(i as f64 * std::f64::consts::TAU / 120.0))
        .collect();
    c.bench_function("fit_ellipse_120", |b| {
        b.iter(|| black_box(fit_ellipse(black_box(&points))));
    });
}

criterion_group!(benches, bench_detector, bench_stages);
criterion_main!(benches);
