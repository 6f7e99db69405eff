use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pano_core::{Image, Match, Point};
use pano_stitch::{combine_images, compute_homography, ransac, Homography, RansacConfig, MAX_CANVAS};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Matches following a shift of (40, 12) with every fifth one scrambled
fn create_matches(n: usize) -> Vec<Match> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let a = Point::new(rng.gen_range(0.0..400.0), rng.gen_range(0.0..300.0));
            let b = if i % 5 == 0 {
                Point::new(rng.gen_range(0.0..400.0), rng.gen_range(0.0..300.0))
            } else {
                Point::new(a.x + 40.0, a.y + 12.0)
            };
            Match {
                index_a: i,
                index_b: i,
                point_a: a,
                point_b: b,
                distance: 0.0,
            }
        })
        .collect()
}

fn create_benchmark_image(width: usize, height: usize) -> Image {
    let mut img = Image::new(width, height, 3);
    for c in 0..3 {
        for y in 0..height {
            for x in 0..width {
                let v = ((x * (c + 1) + y) % 17) as f32 / 17.0;
                img.set_pixel(x as isize, y as isize, c, v);
            }
        }
    }
    img
}

fn bench_homography(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_homography");
    for &n in &[4, 50, 500] {
        let matches: Vec<Match> = create_matches(n * 2)
            .into_iter()
            .filter(|m| m.index_a % 5 != 0)
            .take(n)
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &matches, |b, matches| {
            b.iter(|| black_box(compute_homography(black_box(matches)).unwrap()))
        });
    }
    group.finish();
}

fn bench_ransac(c: &mut Criterion) {
    let matches = create_matches(200);
    let config = RansacConfig {
        inlier_threshold: 2.0,
        iterations: 500,
        cutoff: usize::MAX,
    };
    c.bench_function("ransac_200_matches", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(10);
            black_box(ransac(&matches, &config, Homography::translation(400.0, 0.0), &mut rng).unwrap())
        })
    });
}

fn bench_combine(c: &mut Criterion) {
    let a = create_benchmark_image(320, 240);
    let b = create_benchmark_image(320, 240);
    let h = Homography::translation(40.0, 12.0);
    c.bench_function("combine_320x240", |bench| {
        bench.iter(|| black_box(combine_images(black_box(&a), black_box(&b), &h, MAX_CANVAS)))
    });
}

criterion_group!(benches, bench_homography, bench_ransac, bench_combine);
criterion_main!(benches);
