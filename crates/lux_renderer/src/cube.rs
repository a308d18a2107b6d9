//! Axis-aligned box primitive.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray, Vec3, EPS};

use crate::hittable::{HitRecord, Hittable};
use crate::Material;

/// A solid axis-aligned box.
pub struct Cube {
    min: Vec3,
    max: Vec3,
    material: Arc<dyn Material>,
}

impl Cube {
    /// Create a box spanning the two corners (in any order).
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            material,
        }
    }

    /// Outward normal of the face `p` lies on.
    ///
    /// Faces are tested in -x, +x, -y, +y, -z, +z order within `EPS`.
    fn normal_at(&self, p: Vec3) -> Vec3 {
        if p.x < self.min.x + EPS {
            -Vec3::X
        } else if p.x > self.max.x - EPS {
            Vec3::X
        } else if p.y < self.min.y + EPS {
            -Vec3::Y
        } else if p.y > self.max.y - EPS {
            Vec3::Y
        } else if p.z < self.min.z + EPS {
            -Vec3::Z
        } else if p.z > self.max.z - EPS {
            Vec3::Z
        } else {
            Vec3::Y
        }
    }
}

impl Hittable for Cube {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let near = (self.min - ray.origin()) / ray.direction();
        let far = (self.max - ray.origin()) / ray.direction();
        let t0 = near.min(far).max_element();
        let t1 = near.max(far).min_element();
        if t0 > t1 {
            return None;
        }

        // Entry when the origin is outside, exit otherwise
        let t = if ray_t.surrounds(t0) {
            t0
        } else if ray_t.surrounds(t1) {
            t1
        } else {
            return None;
        };

        let p = ray.at(t);
        Some(HitRecord {
            t,
            p,
            normal: self.normal_at(p),
            u: 0.0,
            v: 0.0,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.min, self.max)
    }
}
