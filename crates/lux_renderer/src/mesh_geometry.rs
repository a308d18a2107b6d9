//! Triangle mesh wrapped in a BVH.

use std::sync::Arc;

use lux_core::Mesh;
use lux_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};
use crate::{BvhNode, Material, Triangle};

/// A renderable mesh: one [`Triangle`] per non-degenerate face, in a BVH.
pub struct MeshGeometry {
    bvh: BvhNode,
    triangle_count: usize,
}

impl MeshGeometry {
    /// Build the acceleration structure for `mesh` with a single material.
    ///
    /// Zero-area faces are dropped. Meshes with vertex normals are smooth shaded.
    pub fn new(mesh: &Mesh, material: Arc<dyn Material>) -> Self {
        let mut skipped = 0usize;
        let mut triangles: Vec<Box<dyn Hittable>> = Vec::with_capacity(mesh.triangle_count());

        for i in 0..mesh.triangle_count() {
            if mesh.is_degenerate(i) {
                skipped += 1;
                continue;
            }
            let [v0, v1, v2] = mesh.triangle(i);
            let triangle = match &mesh.normals {
                Some(normals) => {
                    let face = &mesh.indices[i * 3..i * 3 + 3];
                    Triangle::with_normals(
                        [v0, v1, v2],
                        [
                            normals[face[0] as usize],
                            normals[face[1] as usize],
                            normals[face[2] as usize],
                        ],
                        material.clone(),
                    )
                }
                None => Triangle::new(v0, v1, v2, material.clone()),
            };
            triangles.push(Box::new(triangle));
        }

        if skipped > 0 {
            log::warn!("Skipped {} zero-area triangles", skipped);
        }

        let triangle_count = triangles.len();
        log::debug!("Building mesh BVH over {} triangles", triangle_count);

        Self {
            bvh: BvhNode::new(triangles),
            triangle_count,
        }
    }

    /// Number of triangles kept after dropping degenerate faces.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}

impl Hittable for MeshGeometry {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.bvh.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }
}
