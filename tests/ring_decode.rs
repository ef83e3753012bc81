use radtarget::lowlevel::{decode_samples, sample_ring, split_segments};
use radtarget::{
    DecodeConfig, Detector, Ellipse, ImageView, RingCode, RingConfig, RingDecode, SENTINEL_CODE,
};

const SIZE: usize = 200;

fn paint_rad(code: &str) -> Vec<u8> {
    let bits: Vec<bool> = code.chars().map(|ch| ch == '1').collect();
    let mut image = vec![0u8; SIZE * SIZE];
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f64 - 100.0;
            let dy = y as f64 - 100.0;
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
    image
}

#[test]
fn valid_codes_round_trip_through_detector() {
    for code in ["101010101010", "100000000000", "111111111110", "110011001101"] {
        let image = paint_rad(code);
        let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();
        let detection = Detector::new().detect(view).unwrap();
        assert_eq!(detection.rad_targets.len(), 1, "code {code}");
        assert_eq!(detection.rad_targets[0].code_str(), code);
    }
}

#[test]
fn invalid_inner_codes_are_not_reported() {
    for code in ["011111111111", "010101010101", "111111111111"] {
        let image = paint_rad(code);
        let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();
        let detection = Detector::new().detect(view).unwrap();
        assert!(detection.rad_targets.is_empty(), "code {code}");
    }
}

#[test]
fn sampled_rings_decode_both_codes() {
    let image = paint_rad("110011001101");
    let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();
    let ellipse = Ellipse::new(100.0, 100.0, 60.0, 60.0, -90.0);
    let cfg = DecodeConfig::default();
    let outer = sample_ring(view, &ellipse.scaled(cfg.outer_scale), &cfg.ring);
    let inner = sample_ring(view, &ellipse.scaled(cfg.inner_scale), &cfg.ring);
    assert_eq!(outer.len(), 200);
    assert_eq!(outer.values[0], 0);

    let decode = decode_samples(&outer, &inner);
    assert_eq!(decode.outer(), Some(RingCode::SYNC));
    assert_eq!(decode.inner_str(), "110011001101");
}

#[test]
fn uniform_rings_decode_as_sentinel() {
    let image = vec![255u8; SIZE * SIZE];
    let view = ImageView::from_slice(&image, SIZE, SIZE).unwrap();
    let ellipse = Ellipse::new(100.0, 100.0, 60.0, 60.0, -90.0);
    let cfg = RingConfig::default();
    let outer = sample_ring(view, &ellipse.scaled(0.85), &cfg);
    let inner = sample_ring(view, &ellipse.scaled(0.6), &cfg);
    let decode = decode_samples(&outer, &inner);
    assert_eq!(decode, RingDecode::Ambiguous);
    assert_eq!(decode.outer_str(), SENTINEL_CODE);
    assert_eq!(decode.inner_str(), SENTINEL_CODE);
}

#[test]
fn segments_cover_samples_without_gaps() {
    for len in [0usize, 5, 12, 199, 200, 201] {
        let ranges = split_segments(len, 12);
        assert_eq!(ranges.len(), 12);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[11].end, len);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].len() >= pair[1].len());
        }
    }
}
