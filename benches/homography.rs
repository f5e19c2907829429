use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quadspace::{Homography, Mat3, Point, Quad, apply_homography, invert_mat3, solve_linear_system};
use quadspace::utils::geometry::homography_system;

fn image_quad() -> Quad {
    Quad::new([
        Point::new(200.0, 150.0),
        Point::new(500.0, 130.0),
        Point::new(520.0, 340.0),
        Point::new(190.0, 300.0),
    ])
}

fn bench_solve_8x8(c: &mut Criterion) {
    let (a, b) = homography_system(&Quad::unit(), &image_quad());
    c.bench_function("solve_linear_system_8x8", |bench| {
        bench.iter(|| solve_linear_system(black_box(&a), black_box(&b)))
    });
}

fn bench_invert_mat3(c: &mut Criterion) {
    let m = Mat3::from_row_major([1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
    c.bench_function("invert_mat3", |bench| bench.iter(|| invert_mat3(black_box(&m))));
}

fn bench_estimate(c: &mut Criterion) {
    let src = Quad::unit();
    let dst = image_quad();
    c.bench_function("homography_from_points", |bench| {
        bench.iter(|| Homography::from_points(black_box(&src), black_box(&dst)))
    });
}

fn bench_apply(c: &mut Criterion) {
    let h = Homography::from_points(&Quad::unit(), &image_quad()).unwrap();
    let p = Point::new(0.3, 0.7);
    c.bench_function("apply_homography", |bench| {
        bench.iter(|| apply_homography(black_box(&h.forward), black_box(p)))
    });
}

criterion_group!(
    benches,
    bench_solve_8x8,
    bench_invert_mat3,
    bench_estimate,
    bench_apply
);
criterion_main!(benches);
