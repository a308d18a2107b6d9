//! Point set rendered as spheres, accelerated by a BVH.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::{BvhNode, Material, Sphere};

/// One point of a [`SphereCloud`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPoint {
    pub center: Vec3,
    pub radius: f64,
    /// Index into the cloud's material palette
    pub material: usize,
}

impl CloudPoint {
    pub fn new(center: Vec3, radius: f64, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// Many small spheres sharing a material palette.
///
/// Each point names its own material, so points can be in any order.
pub struct SphereCloud {
    bvh: BvhNode,
    len: usize,
}

impl SphereCloud {
    /// Build the cloud. Points whose material index is outside `palette` are dropped.
    pub fn new(points: &[CloudPoint], palette: &[Arc<dyn Material>]) -> Self {
        let spheres: Vec<Box<dyn Hittable>> = points
            .iter()
            .filter_map(|point| {
                let material = palette.get(point.material)?.clone();
                Some(Box::new(Sphere::new(point.center, point.radius, material)) as Box<dyn Hittable>)
            })
            .collect();

        let dropped = points.len() - spheres.len();
        if dropped > 0 {
            log::warn!(
                "Dropped {} cloud points with material index >= {}",
                dropped,
                palette.len()
            );
        }

        let len = spheres.len();
        Self {
            bvh: BvhNode::new(spheres),
            len,
        }
    }

    /// Number of spheres in the cloud.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Hittable for SphereCloud {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.bvh.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Metal};
    use lux_math::{Color, EPS, INF};

    #[test]
    fn test_points_use_their_own_material() {
        let palette: Vec<Arc<dyn Material>> = vec![
            Arc::new(Lambertian::new(Color::ONE)),
            Arc::new(Metal::new(Color::ONE)),
        ];
        let points = [
            CloudPoint::new(Vec3::new(0.0, 0.0, 0.0), 0.25, 1),
            CloudPoint::new(Vec3::new(1.0, 0.0, 0.0), 0.25, 0),
            CloudPoint::new(Vec3::new(2.0, 0.0, 0.0), 0.25, 7),
        ];
        let cloud = SphereCloud::new(&points, &palette);
        assert_eq!(cloud.len(), 2);

        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(42);

        // The metal point mirrors; the diffuse one does not
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = cloud.hit(&ray, Interval::new(EPS, INF)).unwrap();
        let s = rec.material.sample_f(rec.p, Vec3::Z, &mut rng);
        assert!(s.specular);

        let ray = Ray::new(Vec3::new(1.0, 0.0, 5.0), -Vec3::Z);
        let rec = cloud.hit(&ray, Interval::new(EPS, INF)).unwrap();
        let s = rec.material.sample_f(rec.p, Vec3::Z, &mut rng);
        assert!(!s.specular);

        // Dropped point is not there
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), -Vec3::Z);
        assert!(cloud.hit(&ray, Interval::new(EPS, INF)).is_none());
    }
}
