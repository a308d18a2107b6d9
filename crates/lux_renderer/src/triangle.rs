//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::Material;

/// A triangle primitive.
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Per-vertex shading normals, interpolated when present
    vertex_normals: Option<[Vec3; 3]>,
    /// Material
    material: Arc<dyn Material>,
    /// Bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a new flat-shaded triangle from three counter-clockwise vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        // Zero-area triangles never report hits, so any unit normal will do
        let normal = (v1 - v0).cross(v2 - v0).try_normalize().unwrap_or(Vec3::Z);

        // Pad thin dimensions to avoid degenerate AABBs
        let delta = Vec3::splat(0.0001);
        let bbox = Aabb::from_points(v0.min(v1).min(v2) - delta, v0.max(v1).max(v2) + delta);

        Self {
            v0,
            v1,
            v2,
            normal,
            vertex_normals: None,
            material,
            bbox,
        }
    }

    /// Create a triangle with vertex normals (for smooth shading).
    pub fn with_normals(vertices: [Vec3; 3], normals: [Vec3; 3], material: Arc<dyn Material>) -> Self {
        let [v0, v1, v2] = vertices;
        Self {
            vertex_normals: Some(normals),
            ..Self::new(v0, v1, v2, material)
        }
    }

    /// Shading normal at barycentric `(u, v)`.
    fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        match self.vertex_normals {
            None => self.normal,
            Some([n0, n1, n2]) => (n0 * (1.0 - u - v) + n1 * u + n2 * v)
                .try_normalize()
                .unwrap_or(self.normal),
        }
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-12 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: self.normal_at(u, v),
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
