//! Lux renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with next-event estimation, Russian roulette
//! and per-pixel adaptive sampling. Scenes are built programmatically from
//! [`Hittable`] shapes carrying shared [`Material`]s, then rendered in
//! progressive passes by a [`Renderer`].

mod accumulator;
mod bvh;
mod camera;
mod cube;
mod disney;
mod error;
mod hittable;
mod integrator;
mod material;
mod medium;
mod mesh_geometry;
mod microfacet;
mod progress;
mod renderer;
pub mod sampling;
mod sphere;
mod sphere_cloud;
mod triangle;

pub use accumulator::{color_to_rgb, tone_map, Image, Pixel};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cube::Cube;
pub use disney::Disney;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Scene};
pub use integrator::{PathResult, Sampler, Termination, DEFAULT_MAX_BOUNCES, DEFAULT_MIN_BOUNCES};
pub use material::{
    BsdfSample, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, OrenNayar,
    SpecularReflection,
};
pub use medium::ConstantMedium;
pub use mesh_geometry::MeshGeometry;
pub use microfacet::{BlinnDistribution, FresnelBlend, Microfacet, MicrofacetDistribution};
pub use progress::Progress;
pub use renderer::{CameraConfig, RenderConfig, Renderer};
pub use sphere::Sphere;
pub use sphere_cloud::{CloudPoint, SphereCloud};
pub use triangle::Triangle;

/// Re-export math types from lux_math
pub use lux_math::{Aabb, Color, Interval, Onb, Ray, Vec3};
