use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Mat4, Vec2, Vec3};
use meshview::asset::{
    walk, Bounds, SceneGraph, SceneMaterial, SceneMesh, SceneNode, TextureKind,
};
use meshview::camera::Frustum;
use meshview::scene::{asteroid_ring, visible_instances};

/// A flat `n` x `n` quad grid with UVs, one material, under one node.
fn grid_scene(n: u32) -> SceneGraph {
    let side = n + 1;
    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();
    for z in 0..side {
        for x in 0..side {
            positions.push(Vec3::new(x as f32, 0.0, z as f32));
            tex_coords.push(Vec2::new(x as f32 / n as f32, z as f32 / n as f32));
        }
    }
    let faces = (0..n)
        .flat_map(|z| (0..n).map(move |x| (x, z)))
        .map(|(x, z)| {
            let i = z * side + x;
            vec![i, i + side, i + side + 1, i + 1]
        })
        .collect();

    SceneGraph {
        root: SceneNode::with_meshes("grid", vec![0]),
        meshes: vec![SceneMesh {
            name: "grid".to_owned(),
            normals: vec![Vec3::Y; positions.len()],
            positions,
            tex_coords: Some(tex_coords),
            faces,
            material_index: Some(0),
        }],
        materials: vec![SceneMaterial {
            name: "ground".to_owned(),
            textures: vec![(TextureKind::Diffuse, "ground.png".to_owned())],
            shininess: Some(32.0),
        }],
    }
}

fn walk_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    for n in [16, 64, 256] {
        let scene = grid_scene(n);
        group.bench_function(format!("{n}x{n}_grid"), |b| {
            b.iter(|| black_box(walk(black_box(&scene), "assets")))
        });
    }
    group.finish();
}

fn ring_benchmark(c: &mut Criterion) {
    c.bench_function("asteroid_ring_10k", |b| {
        b.iter(|| black_box(asteroid_ring(black_box(10_000), 150.0, 25.0, 1)))
    });
}

fn culling_benchmark(c: &mut Criterion) {
    let transforms = asteroid_ring(10_000, 150.0, 25.0, 1);
    let bounds = Bounds {
        center: Vec3::ZERO,
        radius: 1.5,
    };
    let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 16.0 / 9.0, 0.1, 500.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 20.0, 200.0), Vec3::ZERO, Vec3::Y);
    let frustum = Frustum::from_view_projection(proj * view);

    c.bench_function("cull_10k_instances", |b| {
        b.iter(|| black_box(visible_instances(black_box(&transforms), &bounds, &frustum)))
    });
}

criterion_group!(benches, walk_benchmark, ring_benchmark, culling_benchmark);
criterion_main!(benches);
