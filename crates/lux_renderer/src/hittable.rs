//! Hittable trait, HitRecord and the Scene aggregate.

use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::Material;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Point of intersection
    pub p: Vec3,
    /// Unit outward surface normal (not flipped toward the ray)
    pub normal: Vec3,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Whether the ray arrived from the side the normal points to.
    pub fn front_face(&self, ray: &Ray) -> bool {
        self.normal.dot(ray.direction()) < 0.0
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// True if this object can be sampled as a light.
    fn emits(&self) -> bool {
        false
    }

    /// A ray from `origin` toward a random point on this object.
    fn random_ray(&self, origin: Vec3, _rng: &mut dyn RngCore) -> Ray {
        Ray::new(origin, Vec3::Z)
    }

    /// Solid-angle density with which [`Hittable::random_ray`] produces `ray`.
    ///
    /// Zero for objects that cannot be sampled or rays that miss.
    fn pdf(&self, _ray: &Ray) -> f64 {
        0.0
    }
}

/// Ordered collection of objects plus the indices of those that emit.
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
    lights: Vec<usize>,
    bbox: Aabb,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object, registering it as a light when it emits.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.add_boxed(Box::new(object));
    }

    /// Add an already boxed object.
    pub fn add_boxed(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        if object.emits() {
            self.lights.push(self.objects.len());
        }
        self.objects.push(object);
    }

    /// Objects flagged as emitters at insertion time.
    pub fn lights(&self) -> impl Iterator<Item = &dyn Hittable> + '_ {
        self.lights.iter().map(|&i| self.objects[i].as_ref())
    }

    /// Number of registered lights.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let interval = match &closest {
                Some(rec) => ray_t.with_max(rec.t),
                None => ray_t,
            };
            if let Some(rec) = object.hit(ray, interval) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
