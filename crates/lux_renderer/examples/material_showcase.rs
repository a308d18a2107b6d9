//! Material showcase.
//!
//! Renders one sphere per material on a checkered floor, a small sphere
//! cloud and a fog-filled cube, then saves PNG and PPM copies.

use std::sync::Arc;

use lux_core::Texture;
use lux_renderer::{
    BlinnDistribution, CameraConfig, CloudPoint, Color, ConstantMedium, Cube, Dielectric,
    DiffuseLight, Disney, FresnelBlend, Isotropic, Lambertian, Material, Metal, Microfacet,
    OrenNayar, RenderConfig, Renderer, Scene, SpecularReflection, Sphere, SphereCloud, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?} ({} objects, {} lights)", start.elapsed(), scene.len(), scene.light_count());

    let config = RenderConfig {
        width: 480,
        height: 270,
        samples_per_pixel: 32,
        frames: Some(1),
        camera: CameraConfig {
            eye: Vec3::new(0.0, -9.0, 3.0),
            center: Vec3::new(0.0, 0.0, 0.5),
            up: Vec3::Z,
            fovy: 35.0,
            aperture: 0.02,
            focal_distance: 9.3,
        },
        ..Default::default()
    };

    let renderer = Renderer::new(config.clone())?;
    let mut image = renderer.new_image();
    renderer.render_progressive(&scene, &config.camera(), &mut image, |_, _| Ok(()))?;
    println!("Rendered in {:?}", start.elapsed());

    image.save_png("showcase.png", config.exposure, config.gamma)?;
    image.save_ppm("showcase.ppm", config.exposure, config.gamma)?;
    println!("Saved showcase.png and showcase.ppm");
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let floor = Texture::Checker {
        frequency: 1.0,
        even: Color::splat(0.6),
        odd: Color::splat(0.2),
    };
    scene.add(Cube::new(
        Vec3::new(-50.0, -50.0, -1.0),
        Vec3::new(50.0, 50.0, 0.0),
        Arc::new(Lambertian::new(floor)),
    ));

    let tint = Color::new(0.8, 0.6, 0.4);
    let materials: Vec<Arc<dyn Material>> = vec![
        Arc::new(Lambertian::new(tint)),
        Arc::new(OrenNayar::new(tint, 20.0)),
        Arc::new(Metal::new(Color::splat(0.9))),
        Arc::new(Dielectric::new(Color::ONE, 1.5)),
        Arc::new(SpecularReflection::new(tint, 1.5)),
        Arc::new(Microfacet::new(tint, BlinnDistribution::new(100.0), 2.0)),
        Arc::new(FresnelBlend::new(tint, Color::ONE, BlinnDistribution::new(50.0))),
        Arc::new(Disney::plastic(tint, 0.3).with_clearcoat(0.5, 0.8)),
    ];
    let n = materials.len();
    for (i, material) in materials.into_iter().enumerate() {
        let x = (i as f64 - (n as f64 - 1.0) / 2.0) * 1.2;
        scene.add(Sphere::new(Vec3::new(x, 0.0, 0.5), 0.5, material));
    }

    // Sphere cloud with a two-material palette
    let palette: Vec<Arc<dyn Material>> = vec![
        Arc::new(Lambertian::new(Color::new(0.2, 0.4, 0.8))),
        Arc::new(Metal::new(Color::new(0.9, 0.8, 0.5))),
    ];
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<CloudPoint> = (0..200)
        .map(|i| {
            let center = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(2.0..4.0),
                rng.gen_range(0.05..1.5),
            );
            CloudPoint::new(center, 0.05, i % palette.len())
        })
        .collect();
    scene.add(SphereCloud::new(&points, &palette));

    // Fog-filled cube
    let boundary = Cube::new(
        Vec3::new(2.5, 2.0, 0.0),
        Vec3::new(4.0, 3.5, 1.5),
        Arc::new(Isotropic::new(Color::ONE)),
    );
    scene.add(ConstantMedium::new(boundary, Color::splat(0.9), 1.5));

    // Lights
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(8.0)));
    scene.add(Sphere::new(Vec3::new(-4.0, -4.0, 6.0), 1.5, light.clone()));
    scene.add(Sphere::new(Vec3::new(4.0, -2.0, 5.0), 1.0, light));

    scene
}
