//! Sphere primitive for ray tracing.
//!
//! Spheres are the only primitive that can be sampled as a light: a ray
//! toward a random point of the disk facing the shading point covers the
//! cone the sphere subtends.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Onb, Ray, Vec3, EPS, INF, PI};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::random_in_unit_disk;
use crate::Material;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    pub(crate) fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

/// Nearest root of `|o + t d - center|^2 = r^2` strictly inside `ray_t`.
pub(crate) fn intersect_sphere(center: Vec3, radius: f64, ray: &Ray, ray_t: Interval) -> Option<f64> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let t = intersect_sphere(self.center, self.radius, ray, ray_t)?;
        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_sphere_uv(normal);

        Some(HitRecord {
            t,
            p,
            normal,
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn emits(&self) -> bool {
        self.material.emits()
    }

    fn random_ray(&self, origin: Vec3, rng: &mut dyn RngCore) -> Ray {
        let onb = Onb::new(self.center - origin);
        let p = self.center + onb.local_to_world(random_in_unit_disk(rng) * self.radius);
        Ray::new(origin, (p - origin).normalize())
    }

    fn pdf(&self, ray: &Ray) -> f64 {
        if intersect_sphere(self.center, self.radius, ray, Interval::new(EPS, INF)).is_none() {
            return 0.0;
        }
        let distance_squared = (self.center - ray.origin()).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).max(0.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }
}
