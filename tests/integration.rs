mod common;

use hyacinth_coverage::{analyze, AnalysisOptions, CoverageEngine, Error};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};

use common::{encode, half_leaf_fixture, png, textured_green, XorShift};

#[test]
fn unparsable_bytes_yield_zero() {
    assert!(analyze(b"this is not an image").abs() < f64::EPSILON);
    assert!(analyze(&[]).abs() < f64::EPSILON);
    assert!(analyze(&[0x89, b'P', b'N', b'G', 0, 0, 0]).abs() < f64::EPSILON);

    let engine = CoverageEngine::default();
    assert!(matches!(
        engine.estimate(b"this is not an image"),
        Err(Error::Decode(_))
    ));
}

#[test]
fn solid_blue_yields_zero() {
    let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 255]));
    let engine = CoverageEngine::default();
    let report = engine.estimate(&png(&img)).unwrap();
    assert_eq!(report.color_pixels, 0);
    assert_eq!(report.coverage.percent(), 0.0);
}

#[test]
fn solid_blue_jpeg_yields_zero() {
    let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 255]));
    let bytes = encode(&img, ImageFormat::Jpeg);
    assert_eq!(analyze(&bytes), 0.0);
}

#[test]
fn flat_green_without_texture_yields_zero() {
    let img = RgbImage::from_pixel(200, 150, Rgb([40, 180, 30]));
    let engine = CoverageEngine::default();
    let report = engine.estimate(&png(&img)).unwrap();

    // Every pixel passes the color test, but nothing corroborates it.
    assert_eq!(report.color_pixels, 200 * 150);
    assert_eq!(report.edge_pixels, 0);
    assert_eq!(report.expanded_pixels, 0);
    assert_eq!(report.coverage.percent(), 0.0);
}

#[test]
fn half_textured_green_is_about_half() {
    let mut rng = XorShift::new(0x5eed_1234);
    let img = RgbImage::from_fn(100, 100, |_, y| {
        if y < 50 {
            textured_green(&mut rng)
        } else {
            Rgb([0, 0, 0])
        }
    });

    let coverage = analyze(&png(&img));
    assert!(
        (40.0..=60.0).contains(&coverage),
        "coverage {coverage}% not within 40-60%"
    );
}

#[test]
fn half_leaf_jpeg_is_about_half() {
    for seed in 1..=5 {
        let bytes = encode(&half_leaf_fixture(seed), ImageFormat::Jpeg);
        let coverage = analyze(&bytes);
        assert!(
            (40.0..=60.0).contains(&coverage),
            "seed {seed}: coverage {coverage}% not within 40-60%"
        );
    }
}

#[test]
fn half_leaf_png_is_about_half() {
    let engine = CoverageEngine::default();
    for seed in 1..=5 {
        let report = engine.estimate(&png(&half_leaf_fixture(seed))).unwrap();
        assert!(
            (40.0..=60.0).contains(&report.coverage.percent()),
            "seed {seed}: {report:?}"
        );
        // Per-pixel texture must register as edges, not just the seam.
        assert!(report.edge_pixels > 1000, "seed {seed}: {report:?}");
    }
}

#[test]
fn smooth_green_beside_texture_is_mostly_excluded() {
    let mut rng = XorShift::new(42);
    let img = RgbImage::from_fn(120, 60, |x, _| {
        if x < 40 {
            textured_green(&mut rng)
        } else {
            Rgb([40, 180, 30])
        }
    });

    let engine = CoverageEngine::default();
    let report = engine.estimate(&png(&img)).unwrap();
    assert_eq!(report.color_pixels, 120 * 60);
    let coverage = report.coverage.percent();
    // The textured third, plus a dilation margin into the flat region.
    assert!(
        (33.0..=42.0).contains(&coverage),
        "coverage {coverage}% outside expected band"
    );
}

#[test]
fn oversized_image_matches_pre_shrunk_copy() {
    let mut rng = XorShift::new(7);
    // 8x8 blocks of random leaf green on the left, open water on the right.
    let blocks: Vec<Rgb<u8>> = (0..200 * 50).map(|_| textured_green(&mut rng)).collect();
    let big = RgbImage::from_fn(1600, 400, |x, y| {
        if x < 800 {
            blocks[(y / 8 * 200 + x / 8) as usize]
        } else {
            Rgb([30, 60, 140])
        }
    });
    let small = imageops::resize(&big, 1000, 250, FilterType::Triangle);

    let engine = CoverageEngine::default();
    let big_report = engine.estimate(&png(&big)).unwrap();
    let small_report = engine.estimate(&png(&small)).unwrap();

    assert_eq!(big_report.original_size, (1600, 400));
    assert_eq!(big_report.analyzed_size, (1000, 250));
    assert_eq!(small_report.analyzed_size, (1000, 250));

    let (a, b) = (
        big_report.coverage.percent(),
        small_report.coverage.percent(),
    );
    assert!((a - b).abs() <= 2.0, "oversized {a}% vs pre-shrunk {b}%");
    assert!((40.0..=60.0).contains(&a), "coverage {a}%");
}

#[test]
fn repeated_runs_are_bit_identical() {
    let mut rng = XorShift::new(99);
    let img = RgbImage::from_fn(64, 64, |x, _| {
        if x < 32 {
            textured_green(&mut rng)
        } else {
            Rgb([20, 40, 90])
        }
    });
    let bytes = png(&img);
    let first = analyze(&bytes);
    let second = analyze(&bytes);
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = CoverageEngine::new(AnalysisOptions::default()).unwrap();
    let mut rng = XorShift::new(3);
    let img = RgbImage::from_fn(48, 48, |_, _| textured_green(&mut rng));
    let bytes = png(&img);
    let expected = engine.analyze(&bytes);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| engine.analyze(&bytes))).collect();
        for h in handles {
            assert_eq!(h.join().unwrap().to_bits(), expected.to_bits());
        }
    });
}

#[test]
fn degenerate_image_falls_back_to_zero() {
    let img = RgbImage::from_pixel(1, 1, Rgb([0, 200, 0]));
    let bytes = png(&img);
    assert_eq!(analyze(&bytes), 0.0);
    assert!(matches!(
        CoverageEngine::default().estimate(&bytes),
        Err(Error::ImageTooSmall { .. })
    ));
}

#[test]
fn analyze_directory_skips_unsupported_files() {
    let dir = std::env::temp_dir().join(format!("hyacinth-coverage-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut rng = XorShift::new(11);
    let green = RgbImage::from_fn(40, 40, |_, _| textured_green(&mut rng));
    std::fs::write(dir.join("a_green.png"), png(&green)).unwrap();
    std::fs::write(dir.join("b_broken.png"), b"not a png").unwrap();
    std::fs::write(dir.join("notes.txt"), b"ignore me").unwrap();

    let reports = CoverageEngine::default().analyze_directory(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports[0].success);
    assert!(reports[0].coverage.percent() > 50.0);
    assert!(!reports[1].success);
    assert_eq!(reports[1].coverage.percent(), 0.0);
}
