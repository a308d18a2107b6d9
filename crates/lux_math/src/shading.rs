//! Spherical-coordinate helpers for directions in a local shading frame.
//!
//! All functions assume the frame of [`crate::Onb`]: the normal is +z.

use crate::Vec3;

#[inline]
pub fn cos_theta(w: Vec3) -> f64 {
    w.z
}

#[inline]
pub fn abs_cos_theta(w: Vec3) -> f64 {
    w.z.abs()
}

#[inline]
pub fn sin_theta2(w: Vec3) -> f64 {
    (1.0 - w.z * w.z).max(0.0)
}

#[inline]
pub fn sin_theta(w: Vec3) -> f64 {
    sin_theta2(w).sqrt()
}

/// Cosine of the azimuth; 1 for directions along the normal.
#[inline]
pub fn cos_phi(w: Vec3) -> f64 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        return 1.0;
    }
    (w.x / sin_theta).clamp(-1.0, 1.0)
}

/// Sine of the azimuth; 0 for directions along the normal.
#[inline]
pub fn sin_phi(w: Vec3) -> f64 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        return 0.0;
    }
    (w.y / sin_theta).clamp(-1.0, 1.0)
}

#[inline]
pub fn same_hemisphere(a: Vec3, b: Vec3) -> bool {
    a.z * b.z > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trig_of_tilted_direction() {
        let w = Vec3::new(0.6, 0.0, 0.8);
        assert!((cos_theta(w) - 0.8).abs() < 1e-12);
        assert!((sin_theta(w) - 0.6).abs() < 1e-12);
        assert!((cos_phi(w) - 1.0).abs() < 1e-12);
        assert!(sin_phi(w).abs() < 1e-12);
    }

    #[test]
    fn test_azimuth_of_normal_is_defined() {
        assert_eq!(cos_phi(Vec3::Z), 1.0);
        assert_eq!(sin_phi(Vec3::Z), 0.0);
    }

    #[test]
    fn test_same_hemisphere() {
        assert!(same_hemisphere(Vec3::new(0.1, 0.0, 0.5), Vec3::new(-0.4, 0.2, 0.1)));
        assert!(!same_hemisphere(Vec3::new(0.1, 0.0, 0.5), Vec3::new(0.0, 0.0, -0.1)));
        assert!(!same_hemisphere(Vec3::X, Vec3::Z));
    }
}
