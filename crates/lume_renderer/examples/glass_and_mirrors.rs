//! Demo scene: phong, mirror, and glass spheres over a meshed floor.
//!
//! Builds the grid, renders in parallel, reports diagnostics, and saves
//! a PNG.

use anyhow::{Context, Result};
use lume_core::Mesh;
use lume_renderer::{
    render_parallel, Accelerator, Camera, Grid, GridConfig, Light, Material, Object, Primitive,
    Projection, Renderer, RenderSettings, Scene, Vec3, DEFAULT_BUCKET_SIZE,
};

fn main() -> Result<()> {
    env_logger::init();

    let scene = build_scene()?;

    // Build the grid once; it is read-only for the rest of the render
    let start = std::time::Instant::now();
    let primitives = Primitive::collect(&scene);
    let mut grid = Grid::new(GridConfig::default());
    let build_stats = grid.construct(scene.bounds(), &primitives, &scene);
    log::info!(
        "grid construction took {:?} ({})",
        start.elapsed(),
        build_stats
    );

    let settings = RenderSettings::new(5, 1e-4, 4)?;
    let renderer = Renderer::new(&scene, &grid, settings);

    let mut camera = Camera::new()
        .with_resolution(960, 540)
        .with_position(
            Vec3::new(0.0, 2.0, 8.0),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::Y,
        )
        .with_projection(Projection::Perspective { vfov: 45.0 });
    camera.initialize();

    let start = std::time::Instant::now();
    let image = render_parallel(&renderer, &camera, DEFAULT_BUCKET_SIZE);
    log::info!("rendered in {:?}", start.elapsed());
    log::info!("render stats: {}", renderer.stats());

    let png = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("image buffer size mismatch")?;
    png.save("glass_and_mirrors.png")
        .context("failed to save PNG")?;
    log::info!("saved glass_and_mirrors.png");

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();
    scene.set_background(Vec3::new(0.235, 0.675, 0.843));

    // Checker-less floor: a big quad mesh with smooth normals
    let mut floor = Mesh::new(
        vec![
            Vec3::new(-12.0, 0.0, -12.0),
            Vec3::new(12.0, 0.0, -12.0),
            Vec3::new(12.0, 0.0, 12.0),
            Vec3::new(-12.0, 0.0, 12.0),
        ],
        vec![0, 2, 1, 0, 3, 2],
        None,
    )?;
    floor.compute_normals();
    scene.add_object(Object::mesh(
        floor,
        Material::phong(Vec3::new(0.75, 0.71, 0.68)).with_specular(0.1, 8.0),
    ));

    scene.add_object(Object::sphere(
        Vec3::new(-2.2, 1.0, 0.0),
        1.0,
        Material::phong(Vec3::new(0.82, 0.26, 0.2)),
    ));
    scene.add_object(Object::sphere(
        Vec3::new(0.0, 1.0, -1.5),
        1.0,
        Material::reflective(Vec3::new(0.9, 0.9, 0.95), 0.85),
    ));
    scene.add_object(Object::sphere(
        Vec3::new(2.2, 1.0, 0.0),
        1.0,
        Material::refractive(1.5),
    ));

    scene.add_light(Light::point(Vec3::new(-4.0, 7.0, 4.0), 900.0, Vec3::ONE));
    scene.add_light(Light::distant(
        Vec3::new(0.3, -1.0, -0.4),
        0.8,
        Vec3::new(1.0, 0.95, 0.85),
    ));

    log::info!(
        "scene: {} objects, {} primitives, {} lights",
        scene.objects().len(),
        scene.primitive_count(),
        scene.lights().len()
    );
    Ok(scene)
}
