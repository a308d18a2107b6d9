//! Reflection, refraction and Fresnel helpers.

use crate::Vec3;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` and index ratio `eta_i / eta_t`.
///
/// Returns `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ratio: f64) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ratio * ratio * (1.0 - dt * dt);
    if discriminant <= 0.0 {
        return None;
    }
    Some(ratio * (uv - n * dt) - n * discriminant.sqrt())
}

/// Schlick's approximation for Fresnel reflectance.
#[inline]
pub fn schlick(cosine: f64, index: f64) -> f64 {
    let r0 = ((1.0 - index) / (1.0 + index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Barycentric coordinates `(u, v, w)` of `p` with respect to triangle `(p1, p2, p3)`.
pub fn barycentric(p1: Vec3, p2: Vec3, p3: Vec3, p: Vec3) -> Vec3 {
    let v0 = p2 - p1;
    let v1 = p3 - p1;
    let v2 = p - p1;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let d = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / d;
    let w = (d00 * d21 - d01 * d20) / d;
    Vec3::new(1.0 - v - w, v, w)
}
