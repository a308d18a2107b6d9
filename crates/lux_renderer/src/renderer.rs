//! Multi-threaded render scheduler.
//!
//! Rows are dealt round-robin to a fixed set of workers (`y % workers ==
//! worker`), so every pixel of the accumulator is owned by exactly one thread
//! for the whole pass and needs no locking. After the base samples, pixels
//! whose standard deviation is still above a threshold get extra samples.

use lux_math::{Color, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::accumulator::{Image, Pixel};
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::hittable::Scene;
use crate::integrator::{Sampler, DEFAULT_MAX_BOUNCES, DEFAULT_MIN_BOUNCES};
use crate::progress::Progress;
use crate::sampling::gen_f64;

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f64,
    pub aperture: f64,
    pub focal_distance: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(3.0, 0.0, 1.0),
            center: Vec3::new(0.0, 0.0, -0.075),
            up: Vec3::new(0.0, 0.0, 1.0),
            fovy: 25.0,
            aperture: 0.01,
            focal_distance: 3.0,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Base samples per pixel per pass
    pub samples_per_pixel: u32,
    /// Max channel standard deviation above which a pixel is refined
    pub adaptive_threshold: f64,
    /// Extra samples for pixels above the threshold
    pub adaptive_samples: u32,
    /// Worker count; 0 uses the available parallelism
    pub threads: usize,
    pub min_bounces: u32,
    pub max_bounces: u32,
    pub seed: u64,
    pub exposure: f64,
    pub gamma: f64,
    /// Number of passes; `None` renders until interrupted
    pub frames: Option<u32>,
    pub background: Color,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1600,
            samples_per_pixel: 16,
            adaptive_threshold: 1.0,
            adaptive_samples: 64,
            threads: 0,
            min_bounces: DEFAULT_MIN_BOUNCES,
            max_bounces: DEFAULT_MAX_BOUNCES,
            seed: 0,
            exposure: 1.0,
            gamma: 2.2,
            frames: None,
            background: Color::ZERO,
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Reject settings the scheduler cannot run with.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::Config(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_bounces == 0 {
            return Err(RenderError::Config("max_bounces must be at least 1".into()));
        }
        if !(self.gamma > 0.0) {
            return Err(RenderError::Config(format!("gamma must be positive, got {}", self.gamma)));
        }
        if !(self.exposure >= 0.0) {
            return Err(RenderError::Config(format!(
                "exposure must be non-negative, got {}",
                self.exposure
            )));
        }
        if self.camera.eye == self.camera.center {
            return Err(RenderError::Config("camera eye and center coincide".into()));
        }
        Ok(())
    }

    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Build the camera for this resolution.
    pub fn camera(&self) -> Camera {
        let c = &self.camera;
        Camera::new()
            .with_resolution(self.width, self.height)
            .with_position(c.eye, c.center, c.up)
            .with_lens(c.fovy, c.aperture, c.focal_distance)
    }
}

/// Owns the worker pool and settings for a sequence of passes.
pub struct Renderer {
    config: RenderConfig,
    workers: usize,
    pool: rayon::ThreadPool,
    progress: Progress,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        let workers = config.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lux-worker-{}", i))
            .build()
            .map_err(|e| RenderError::Config(format!("failed to build thread pool: {}", e)))?;
        Ok(Self {
            progress: Progress::new(config.height),
            config,
            workers,
            pool,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// An empty accumulator matching the configured resolution.
    pub fn new_image(&self) -> Image {
        Image::new(self.config.width, self.config.height)
    }

    /// Render one full pass over `image`, adding to its existing samples.
    pub fn render_pass(&self, scene: &Scene, camera: &Camera, image: &mut Image, pass: u32) -> RenderResult<()> {
        if image.width() != self.config.width || image.height() != self.config.height {
            return Err(RenderError::Config(format!(
                "image is {}x{} but the render is configured for {}x{}",
                image.width(),
                image.height(),
                self.config.width,
                self.config.height
            )));
        }

        let width = image.width();
        let height = image.height();
        let sampler = Sampler::new(scene)
            .with_bounces(self.config.min_bounces, self.config.max_bounces)
            .with_background(self.config.background);

        // Deal rows round-robin; each worker gets exclusive slices
        let mut assignments: Vec<Vec<(u32, &mut [Pixel])>> = (0..self.workers).map(|_| Vec::new()).collect();
        for (y, row) in image.rows_mut().enumerate() {
            assignments[y % self.workers].push((y as u32, row));
        }

        self.progress.start(height);
        let config = &self.config;
        let progress = &self.progress;
        let sampler = &sampler;

        self.pool.scope(|s| {
            for (worker, rows) in assignments.into_iter().enumerate() {
                s.spawn(move |_| {
                    let mut rng = StdRng::seed_from_u64(worker_seed(config.seed, pass, worker));
                    for (y, row) in rows {
                        render_row(sampler, camera, config, row, y, width, height, &mut rng);
                        progress.increment(1);
                    }
                });
            }
        });

        self.progress.done();
        Ok(())
    }

    /// Render passes until `frames` is reached, calling `checkpoint` after each.
    ///
    /// Samples keep accumulating in `image` across passes. Returns the number
    /// of passes rendered.
    pub fn render_progressive<F>(&self, scene: &Scene, camera: &Camera, image: &mut Image, mut checkpoint: F) -> RenderResult<u32>
    where
        F: FnMut(&Image, u32) -> RenderResult<()>,
    {
        log::info!(
            "Rendering {}x{} with {} workers, {} samples per pass",
            self.config.width,
            self.config.height,
            self.workers,
            self.config.samples_per_pixel
        );

        let mut pass = 0;
        while self.config.frames.map_or(true, |frames| pass < frames) {
            let start = std::time::Instant::now();
            self.render_pass(scene, camera, image, pass)?;
            pass += 1;
            log::info!(
                "Pass {} done in {:.3}s ({} samples total)",
                pass,
                start.elapsed().as_secs_f64(),
                image.total_samples()
            );
            checkpoint(image, pass)?;
        }
        Ok(pass)
    }
}

/// Sample every pixel of one row, refining noisy pixels.
#[allow(clippy::too_many_arguments)]
fn render_row(
    sampler: &Sampler<'_>,
    camera: &Camera,
    config: &RenderConfig,
    row: &mut [Pixel],
    y: u32,
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
) {
    for (x, pixel) in row.iter_mut().enumerate() {
        let x = x as u32;
        for _ in 0..config.samples_per_pixel {
            pixel.add_sample(sample_pixel(sampler, camera, x, y, width, height, rng));
        }
        if pixel.standard_deviation().max_element() > config.adaptive_threshold {
            for _ in 0..config.adaptive_samples {
                pixel.add_sample(sample_pixel(sampler, camera, x, y, width, height, rng));
            }
        }
    }
}

/// One jittered camera sample through pixel (x, y); row 0 is the top.
fn sample_pixel(
    sampler: &Sampler<'_>,
    camera: &Camera,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let u = (x as f64 + gen_f64(rng)) / width as f64;
    let v = (y as f64 + gen_f64(rng)) / height as f64;
    let ray = camera.make_ray(u, 1.0 - v, rng);
    sampler.sample(&ray, rng)
}

/// Seed for one worker of one pass.
fn worker_seed(seed: u64, pass: u32, worker: usize) -> u64 {
    seed ^ (pass as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15) ^ (worker as u64 + 1).wrapping_mul(0xbf58_476d_1ce4_e5b9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, Sphere};
    use std::sync::Arc;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 6,
            samples_per_pixel: 2,
            threads: 3,
            frames: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.samples_per_pixel, 16);
        assert_eq!(config.adaptive_samples, 64);
        assert_eq!(config.adaptive_threshold, 1.0);
        assert_eq!(config.min_bounces, 8);
        assert_eq!(config.max_bounces, 64);
        assert_eq!(config.camera.fovy, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero = RenderConfig { width: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(RenderError::Config(_))));

        let gamma = RenderConfig { gamma: 0.0, ..Default::default() };
        assert!(gamma.validate().is_err());

        let mut camera = RenderConfig::default();
        camera.camera.center = camera.camera.eye;
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 64, "camera": { "fovy": 40.0 } }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 1600);
        assert_eq!(config.camera.fovy, 40.0);
        assert_eq!(config.camera.eye, Vec3::new(3.0, 0.0, 1.0));
    }

    #[test]
    fn test_worker_seeds_differ() {
        assert_ne!(worker_seed(1, 0, 0), worker_seed(1, 0, 1));
        assert_ne!(worker_seed(1, 0, 0), worker_seed(1, 1, 0));
        assert_eq!(worker_seed(1, 2, 3), worker_seed(1, 2, 3));
    }

    #[test]
    fn test_every_pixel_sampled_once_per_pass() {
        let config = small_config();
        let renderer = Renderer::new(config.clone()).unwrap();
        let scene = Scene::new();
        let camera = config.camera();
        let mut image = renderer.new_image();

        renderer.render_pass(&scene, &camera, &mut image, 0).unwrap();
        for y in 0..config.height {
            for x in 0..config.width {
                // Empty scene has zero variance, so no refinement
                assert_eq!(image.pixel(x, y).count(), 2);
                assert_eq!(image.color(x, y), Color::ZERO);
            }
        }
    }

    #[test]
    fn test_noisy_pixels_are_refined() {
        // Camera inside a bright light sees it only from behind: zero.
        // Outside, pixels that straddle the light's edge are noisy.
        let config = RenderConfig {
            width: 16,
            height: 16,
            samples_per_pixel: 4,
            adaptive_threshold: 0.1,
            adaptive_samples: 8,
            threads: 2,
            camera: CameraConfig {
                eye: Vec3::new(0.0, 0.0, 5.0),
                center: Vec3::ZERO,
                up: Vec3::Y,
                fovy: 30.0,
                aperture: 0.0,
                focal_distance: 5.0,
            },
            ..Default::default()
        };
        let renderer = Renderer::new(config.clone()).unwrap();
        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3::ZERO, 1.0, Arc::new(DiffuseLight::new(Color::splat(10.0)))));
        let mut image = renderer.new_image();
        renderer.render_pass(&scene, &config.camera(), &mut image, 0).unwrap();

        let counts: Vec<u32> = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .map(|(x, y)| image.pixel(x, y).count())
            .collect();
        assert!(counts.iter().all(|&n| n == 4 || n == 12));
        assert!(counts.iter().any(|&n| n == 12));
        // Image center sits well inside the light
        assert_eq!(image.pixel(8, 8).count(), 4);
        assert_eq!(image.color(8, 8), Color::splat(10.0));
    }

    #[test]
    fn test_progressive_accumulates() {
        let config = small_config();
        let renderer = Renderer::new(config.clone()).unwrap();
        let scene = Scene::new();
        let camera = config.camera();
        let mut image = renderer.new_image();

        let mut checkpoints = Vec::new();
        let passes = renderer
            .render_progressive(&scene, &camera, &mut image, |img, pass| {
                checkpoints.push((pass, img.total_samples()));
                Ok(())
            })
            .unwrap();

        assert_eq!(passes, 2);
        assert_eq!(checkpoints, vec![(1, 96), (2, 192)]);
    }

    #[test]
    fn test_same_seed_same_image() {
        let config = RenderConfig {
            width: 6,
            height: 4,
            samples_per_pixel: 3,
            threads: 2,
            seed: 7,
            camera: CameraConfig {
                eye: Vec3::new(0.0, 0.0, 5.0),
                center: Vec3::ZERO,
                up: Vec3::Y,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3::ZERO, 1.0, Arc::new(crate::Lambertian::new(Color::splat(0.5)))));
        scene.add(Sphere::new(Vec3::new(0.0, 4.0, 4.0), 1.0, Arc::new(DiffuseLight::new(Color::splat(4.0)))));

        let render = || {
            let renderer = Renderer::new(config.clone()).unwrap();
            let mut image = renderer.new_image();
            renderer.render_pass(&scene, &config.camera(), &mut image, 0).unwrap();
            image.to_rgb8(1.0, 2.2)
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_mismatched_image_is_rejected() {
        let renderer = Renderer::new(small_config()).unwrap();
        let mut image = Image::new(3, 3);
        let result = renderer.render_pass(&Scene::new(), &Camera::new(), &mut image, 0);
        assert!(matches!(result, Err(RenderError::Config(_))));
    }
}
