//! Thin-lens camera for ray generation.

use lux_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::random_in_unit_disk;

/// Camera for generating rays into the scene.
///
/// Rays start on a lens of diameter `aperture` and pass through the point of
/// the focal plane (at `focal_distance`) that the image coordinates select.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    eye: Vec3,
    center: Vec3,
    up: Vec3,

    // Lens settings
    fovy: f64,           // Vertical field of view in degrees
    aspect: f64,         // Width over height
    aperture: f64,       // Lens diameter
    focal_distance: f64, // Distance from camera to plane of perfect focus

    // Cached computed values (refreshed by every setter)
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, 0.0),
            center: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fovy: 90.0,
            aspect: 1.0,
            aperture: 0.0,
            focal_distance: 1.0,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.update();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3, center: Vec3, up: Vec3) -> Self {
        self.eye = eye;
        self.center = center;
        self.up = up;
        self.update();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, fovy: f64, aperture: f64, focal_distance: f64) -> Self {
        self.fovy = fovy;
        self.aperture = aperture;
        self.focal_distance = focal_distance;
        self.update();
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self.update();
        self
    }

    /// Set the aspect ratio from an image resolution.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.with_aspect(width as f64 / height.max(1) as f64)
    }

    fn update(&mut self) {
        let d = self.focal_distance;
        let theta = self.fovy.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = half_height * self.aspect;

        // Calculate camera basis vectors
        self.w = (self.eye - self.center).normalize();
        self.u = self.up.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.lower_left = self.eye - half_width * d * self.u - half_height * d * self.v - d * self.w;
        self.horizontal = 2.0 * half_width * d * self.u;
        self.vertical = 2.0 * half_height * d * self.v;
    }

    /// Camera position.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Generate a ray through image coordinates `(s, t)` in `[0, 1]^2`.
    ///
    /// `(0, 0)` is the bottom-left corner. The direction is unit length.
    pub fn make_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = random_in_unit_disk(rng) * (self.aperture / 2.0);
        let offset = self.u * rd.x + self.v * rd.y;
        let target = self.lower_left + self.horizontal * s + self.vertical * t;
        let direction = (target - self.eye - offset).normalize();
        Ray::new(self.eye + offset, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_lens(90.0, 0.0, 1.0);

        assert_eq!(camera.eye(), Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray points straight down -Z
        let ray = camera.make_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction() - (-Vec3::Z)).length() < 1e-12);

        // 90 degree fov: the top edge is 45 degrees up
        let ray = camera.make_ray(0.5, 1.0, &mut rng);
        assert!((ray.direction().y - ray.direction().z.abs()).abs() < 1e-12);
    }

    #[test]
    fn test_thin_lens_focuses() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(40.0, 0.5, 3.0);
        let mut rng = StdRng::seed_from_u64(7);

        // All lens samples for one image point meet on the focal plane
        for _ in 0..20 {
            let ray = camera.make_ray(0.3, 0.7, &mut rng);
            assert!(ray.origin().length() <= 0.25 + 1e-12);
            let t = -3.0 / ray.direction().z;
            let p = ray.at(t);
            let reference = camera.lower_left + camera.horizontal * 0.3 + camera.vertical * 0.7;
            assert!((p - reference).length() < 1e-9);
        }
    }
}
