use criterion::{black_box, criterion_group, criterion_main, Criterion};
use densito::{
    compute_profile, locate_cut_points, search_areas, validate_areas, Analyzer, BaselineConfig,
    CutPointConfig, GridKind, IntensityGrid, PeakSearchConfig, Profile, ScanAxis,
};
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_profile_fixture(n: usize, seed: u64) -> Profile {
    let mut rng = StdRng::seed_from_u64(seed);
    let bands: Vec<(f64, f64, f64)> = (0..8)
        .map(|_| {
            (
                rng.gen_range(0.0..n as f64),
                rng.gen_range(4.0..24.0),
                rng.gen_range(40.0..200.0),
            )
        })
        .collect();
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64;
            let signal: f64 = bands
                .iter()
                .map(|&(mu, s, a)| a * (-(x - mu).powi(2) / (2.0 * s * s)).exp())
                .sum();
            signal + rng.gen_range(0.0..4.0)
        })
        .collect();
    Profile::from_values(&values)
}

fn make_plate_fixture(w: u32, h: u32, lanes: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let margin = w / 16;
    let pitch = (w - 2 * margin) / (lanes + 1);
    let spots: Vec<(f32, f32, f32)> = (1..=lanes)
        .flat_map(|l| {
            let cx = (margin + l * pitch) as f32;
            let n = rng.gen_range(1..4);
            (0..n)
                .map(|_| (cx, rng.gen_range(0.2..0.8) * h as f32, pitch as f32 * 0.25))
                .collect::<Vec<_>>()
        })
        .collect();
    GrayImage::from_fn(w, h, |x, y| {
        if x < margin || x >= w - margin || y < margin || y >= h - margin {
            return Luma([20]);
        }
        let dark = spots
            .iter()
            .any(|&(cx, cy, r)| (x as f32 - cx).hypot(y as f32 - cy) < r);
        Luma([if dark { 60 } else { 240 }])
    })
}

fn bench_profile(c: &mut Criterion) {
    let img = make_plate_fixture(1280, 960, 6, 3);
    let grid = IntensityGrid::from_gray(&img);
    c.bench_function("profile_1280x960_vertical", |b| {
        b.iter(|| {
            let p = compute_profile(black_box(&grid), ScanAxis::Vertical, true, true);
            black_box(p.map(|p| p.len()).unwrap_or(0))
        })
    });
}

fn bench_cut_points(c: &mut Criterion) {
    let values: Vec<u32> = (0..1280u32 * 960)
        .map(|i| {
            let (x, y) = (i % 1280, i / 1280);
            if (80..1200).contains(&x) && (60..900).contains(&y) {
                0
            } else {
                255
            }
        })
        .collect();
    let grid = IntensityGrid::from_raw(1280, 960, values, GridKind::Binary).expect("grid");
    let cfg = CutPointConfig::default();
    c.bench_function("cut_points_1280x960", |b| {
        b.iter(|| black_box(locate_cut_points(black_box(&grid), &cfg).ok()))
    });
}

fn bench_peaks(c: &mut Criterion) {
    let profile = make_profile_fixture(2000, 11);
    let peak_cfg = PeakSearchConfig::default();
    let base_cfg = BaselineConfig::default();

    c.bench_function("search_areas_2000", |b| {
        b.iter(|| black_box(search_areas(black_box(&profile), &peak_cfg).len()))
    });

    let areas = search_areas(&profile, &peak_cfg);
    c.bench_function("validate_areas_2000", |b| {
        b.iter(|| black_box(validate_areas(black_box(&profile), &areas, &base_cfg).len()))
    });
}

fn bench_analyzer(c: &mut Criterion) {
    let img = make_plate_fixture(1280, 960, 6, 5);
    let analyzer = Analyzer::new();
    c.bench_function("analyze_1280x960_6lanes", |b| {
        b.iter(|| {
            let result = analyzer.analyze(black_box(&img));
            black_box(result.map(|r| r.samples.len()).unwrap_or(0))
        })
    });
}

criterion_group!(
    hotpaths,
    bench_profile,
    bench_cut_points,
    bench_peaks,
    bench_analyzer
);
criterion_main!(hotpaths);
