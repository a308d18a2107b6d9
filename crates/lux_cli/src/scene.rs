//! Studio scene around the loaded models.

use std::sync::Arc;

use lux_core::Mesh;
use lux_math::{hex_color, kelvin, Color, Mat4, Vec3};
use lux_renderer::{Cube, DiffuseLight, Disney, Material, MeshGeometry, Scene, Sphere};

/// Spacing between models along Y when more than one is loaded.
const MODEL_SPACING: f64 = 1.1;

/// Normalize each model into the unit cube, turn it to face the camera and
/// line the models up along Y.
pub fn place_models(meshes: &mut [Mesh], up: Vec3, smooth: bool) {
    let n = meshes.len();
    for (i, mesh) in meshes.iter_mut().enumerate() {
        if smooth {
            mesh.smooth_normals();
        }
        mesh.fit_in_unit_cube();
        mesh.rotate(60f64.to_radians(), up);
        let offset = (i as f64 - (n as f64 - 1.0) / 2.0) * MODEL_SPACING;
        mesh.transform(&Mat4::from_translation(Vec3::new(0.0, offset, 0.0)));
    }
}

/// Models on a dark floor slab, lit by two key lights and a back light.
pub fn studio_scene(meshes: &[Mesh]) -> Scene {
    let mut scene = Scene::new();

    let model: Arc<dyn Material> = Arc::new(
        Disney::new()
            .with_base_color(hex_color(0x777880))
            .with_subsurface(0.1)
            .with_specular(0.1)
            .with_roughness(0.2)
            .with_clearcoat(0.1, 0.0),
    );
    for mesh in meshes {
        scene.add(MeshGeometry::new(mesh, model.clone()));
    }

    // Floor slab top sits at the lowest model point
    let floor_z = meshes
        .iter()
        .map(|m| m.bounds.z.min)
        .fold(f64::INFINITY, f64::min);
    let floor_z = if floor_z.is_finite() { floor_z } else { -0.5 };
    let floor: Arc<dyn Material> = Arc::new(
        Disney::new()
            .with_base_color(hex_color(0x2A2C2B))
            .with_subsurface(0.1)
            .with_specular(0.5)
            .with_roughness(0.5)
            .with_clearcoat(0.5, 0.5),
    );
    scene.add(Cube::new(Vec3::splat(-100.0), Vec3::new(100.0, 100.0, floor_z), floor));

    let key: Arc<dyn Material> = Arc::new(DiffuseLight::new(key_light()));
    scene.add(Sphere::new(Vec3::new(5.0, 3.0, 3.0), 2.0, key.clone()));
    scene.add(Sphere::new(Vec3::new(5.0, -3.0, 3.0), 2.0, key));

    let back: Arc<dyn Material> = Arc::new(DiffuseLight::new(kelvin(5000.0) * 2.0));
    scene.add(Sphere::new(Vec3::new(-5.0, 0.0, 3.0), 2.0, back));

    log::info!(
        "Scene: {} models, {} lights",
        meshes.len(),
        scene.light_count()
    );
    scene
}

/// Radiance of the two key lights.
pub fn key_light() -> Color {
    kelvin(5000.0) * 10.0
}
