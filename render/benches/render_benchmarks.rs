use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ember_core::color::Color;
use ember_core::math::{Point3, Vec2, Vec3};
use ember_render::mesh::{
    CubeBuilder, MeshBuilder, Polygon3dBuilder, PrimitiveTopology, SphereBuilder,
};

fn bench_cube(c: &mut Criterion) {
    let cube = CubeBuilder::new();
    c.bench_function("cube_build", |b| {
        b.iter(|| black_box(&cube).build());
    });
}

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_build");
    for (x, y) in [(16u16, 8u16), (64, 32)] {
        let sphere = SphereBuilder::new(x, y);
        let id = BenchmarkId::from_parameter(format!("{x}x{y}"));
        group.bench_with_input(id, &sphere, |b, sphere| {
            b.iter(|| sphere.build());
        });
    }
    group.finish();
}

fn bench_polygon(c: &mut Criterion) {
    let mut builder = Polygon3dBuilder::new(PrimitiveTopology::Triangles);
    for i in 0..1024u16 {
        let t = i as f32 / 1024.0;
        builder.add_position(Point3::new(t, t * t, 1.0 - t));
        builder.add_color(Color::new(t, 0.5, 1.0 - t, 1.0));
        builder.add_uv(Vec2::new(t, 1.0 - t));
        builder.add_normal(Vec3::new(0.0, 1.0, 0.0));
        if i >= 2 {
            builder.add_triangle(i - 2, i - 1, i);
        }
    }
    c.bench_function("polygon_build_1024", |b| {
        b.iter(|| black_box(&builder).build());
    });
}

criterion_group!(benches, bench_cube, bench_sphere, bench_polygon);
criterion_main!(benches);
