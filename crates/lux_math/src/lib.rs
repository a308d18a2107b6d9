// Re-export glam for convenience. Everything in lux runs in double precision,
// so the f64 variants are exported under the short names.
pub use glam;
pub use glam::{DMat3 as Mat3, DMat4 as Mat4, DQuat as Quat, DVec3 as Vec3, DVec4 as Vec4};

// Lux math types
mod aabb;
mod color;
mod interval;
mod onb;
mod optics;
mod ray;
mod shading;

pub use aabb::Aabb;
pub use color::{hex_color, kelvin, Color};
pub use interval::Interval;
pub use onb::Onb;
pub use optics::{barycentric, reflect, refract, schlick};
pub use ray::Ray;
pub use shading::{
    abs_cos_theta, cos_phi, cos_theta, same_hemisphere, sin_phi, sin_theta, sin_theta2,
};

/// Self-intersection and degenerate-density threshold.
pub const EPS: f64 = 1e-5;

/// Upper bound used for "unbounded" ray intervals.
pub const INF: f64 = 1e9;

pub use std::f64::consts::PI;
