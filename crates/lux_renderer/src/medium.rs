//! Homogeneous participating medium.

use lux_core::Texture;
use lux_math::{Aabb, Interval, Ray, Vec3, EPS, INF};

use crate::hittable::{HitRecord, Hittable};
use crate::Isotropic;

/// Fog of constant density filling a closed boundary.
///
/// Rays that cross the boundary scatter after an exponentially distributed
/// free-flight distance, using the isotropic phase function.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    phase: Isotropic,
    density: f64,
}

impl ConstantMedium {
    pub fn new(boundary: impl Hittable + 'static, albedo: impl Into<Texture>, density: f64) -> Self {
        Self {
            boundary: Box::new(boundary),
            phase: Isotropic::new(albedo),
            density,
        }
    }

    /// Free-flight distance `-ln(xi) / density`.
    ///
    /// `hit` has no random source, so `xi` is a hash of the ray's origin and
    /// direction bits. Re-tracing the identical ray yields the identical
    /// distance; every bounce and camera sample produces a new ray, so across
    /// a render the draws behave as independent uniform variates.
    fn free_flight(&self, ray: &Ray) -> f64 {
        let xi = ray_hash_unit(ray);
        -xi.ln() / self.density
    }
}

/// Hash a ray's bits to a number in (0, 1].
fn ray_hash_unit(ray: &Ray) -> f64 {
    let o = ray.origin();
    let d = ray.direction();
    let mut h = 0x9e37_79b9_7f4a_7c15u64;
    for bits in [o.x, o.y, o.z, d.x, d.y, d.z].map(f64::to_bits) {
        h = splitmix64(h ^ bits);
    }
    ((h >> 11) + 1) as f64 / (1u64 << 53) as f64
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let first = self.boundary.hit(ray, Interval::new(EPS, INF))?;

        // Leaving through the first boundary hit means the origin is inside
        let (t_enter, t_exit) = if ray.direction().dot(first.normal) > 0.0 {
            (0.0, first.t)
        } else {
            let second = self.boundary.hit(ray, Interval::new(first.t + EPS, INF))?;
            if ray.direction().dot(second.normal) <= 0.0 {
                return None;
            }
            (first.t, second.t)
        };

        let speed = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * speed;
        let hit_distance = self.free_flight(ray);
        if hit_distance >= distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / speed;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord {
            t,
            p: ray.at(t),
            // Arbitrary: the phase function ignores orientation
            normal: Vec3::Y,
            u: 0.0,
            v: 0.0,
            material: &self.phase,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lux_math::Color;
    use std::sync::Arc;

    fn fog(density: f64) -> ConstantMedium {
        let boundary = Sphere::new(Vec3::ZERO, 1.0, Arc::new(Lambertian::new(Color::ONE)));
        ConstantMedium::new(boundary, Color::splat(0.5), density)
    }

    #[test]
    fn test_dense_fog_scatters_near_entry() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = medium.hit(&ray, Interval::new(EPS, INF)).unwrap();
        assert!(rec.t >= 4.0 && rec.t < 4.01, "t = {}", rec.t);
    }

    #[test]
    fn test_thin_fog_mostly_transmits() {
        let medium = fog(1e-6);
        let scattered = (0..200)
            .filter(|i| {
                let ray = Ray::new(Vec3::new(*i as f64 * 1e-3, 0.0, 5.0), -Vec3::Z);
                medium.hit(&ray, Interval::new(EPS, INF)).is_some()
            })
            .count();
        assert!(scattered < 5);
    }

    #[test]
    fn test_inside_origin_scatters_before_exit() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let rec = medium.hit(&ray, Interval::new(0.0, INF)).unwrap();
        assert!(rec.t < 1.0);
    }

    #[test]
    fn test_miss_outside_boundary() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X);
        assert!(medium.hit(&ray, Interval::new(EPS, INF)).is_none());
    }

    #[test]
    fn test_same_ray_same_distance() {
        let medium = fog(2.0);
        let ray = Ray::new(Vec3::new(0.1, 0.2, 5.0), -Vec3::Z);
        let a = medium.hit(&ray, Interval::new(EPS, INF)).map(|rec| rec.t);
        let b = medium.hit(&ray, Interval::new(EPS, INF)).map(|rec| rec.t);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mean_free_path_matches_density() {
        let medium = fog(2.0);
        let n = 20_000;
        let total: f64 = (0..n)
            .map(|i| {
                let ray = Ray::new(Vec3::new(i as f64 * 1e-4, 0.0, 5.0), -Vec3::Z);
                medium.free_flight(&ray)
            })
            .sum();
        let mean = total / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean = {}", mean);
    }

    #[test]
    fn test_hash_in_unit_interval() {
        for i in 0..100 {
            let ray = Ray::new(Vec3::splat(i as f64), Vec3::new(1.0, -(i as f64), 0.5));
            let xi = ray_hash_unit(&ray);
            assert!(xi > 0.0 && xi <= 1.0);
        }
    }
}
