use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quadspace::{Point, Quad, QuadEdit, RectSpace};

fn image_quad() -> Quad {
    Quad::new([
        Point::new(200.0, 150.0),
        Point::new(500.0, 130.0),
        Point::new(520.0, 340.0),
        Point::new(190.0, 300.0),
    ])
}

fn sample_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| Point::new((i % 101) as f64 / 100.0, (i / 101 % 101) as f64 / 100.0))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("rect_space_new", |b| {
        b.iter(|| RectSpace::new(black_box(image_quad())))
    });
}

fn bench_edit(c: &mut Criterion) {
    let space = RectSpace::new(image_quad()).unwrap();
    let edit = QuadEdit::Pan { du: 0.1, dv: 0.0 };
    c.bench_function("rect_space_apply_pan", |b| {
        b.iter(|| space.apply(black_box(&edit)))
    });
}

fn bench_to_image_sequential(c: &mut Criterion) {
    let space = RectSpace::new(image_quad()).unwrap();
    let points = sample_points(100_000);
    c.bench_function("to_image_all_100k", |b| {
        b.iter(|| space.to_image_all(black_box(&points)))
    });
}

fn bench_to_image_parallel(c: &mut Criterion) {
    let space = RectSpace::new(image_quad()).unwrap();
    let points = sample_points(100_000);
    c.bench_function("to_image_parallel_100k", |b| {
        b.iter(|| space.to_image_parallel(black_box(&points)))
    });
}

fn bench_mesh(c: &mut Criterion) {
    let space = RectSpace::new(image_quad()).unwrap();
    c.bench_function("mesh_256x256", |b| b.iter(|| space.mesh(black_box(256), black_box(256))));
}

criterion_group!(
    benches,
    bench_build,
    bench_edit,
    bench_to_image_sequential,
    bench_to_image_parallel,
    bench_mesh
);
criterion_main!(benches);
