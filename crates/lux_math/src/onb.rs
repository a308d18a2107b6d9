//! Orthonormal basis for local shading frames.

use crate::Vec3;

const INV_SQRT_3: f64 = 0.577_350_269_189_625_8;

/// Orthonormal basis with the surface normal as the local +z axis.
///
/// BSDFs are evaluated in this frame, so `cos_theta(w) == w.z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    s: Vec3,
    t: Vec3,
    n: Vec3,
}

impl Onb {
    /// Build a basis around `normal` (normalized internally).
    ///
    /// The helper axis is the first world axis the normal is far from, which
    /// keeps the cross product well conditioned.
    pub fn new(normal: Vec3) -> Self {
        let n = normal.normalize();
        let major_axis = if n.x.abs() < INV_SQRT_3 {
            Vec3::X
        } else if n.y.abs() < INV_SQRT_3 {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let s = n.cross(major_axis).normalize();
        let t = n.cross(s);
        Self { s, t, n }
    }

    /// Tangent axis (local x).
    #[inline]
    pub fn s(&self) -> Vec3 {
        self.s
    }

    /// Bitangent axis (local y).
    #[inline]
    pub fn t(&self) -> Vec3 {
        self.t
    }

    /// Normal axis (local z).
    #[inline]
    pub fn n(&self) -> Vec3 {
        self.n
    }

    #[inline]
    pub fn world_to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
    }

    #[inline]
    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        self.s * v.x + self.t * v.y + self.n * v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normals() -> Vec<Vec3> {
        vec![
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            -Vec3::Z,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-0.3, 0.9, 0.1),
            Vec3::new(0.0, -0.2, -5.0),
        ]
    }

    #[test]
    fn test_onb_is_orthonormal() {
        for normal in normals() {
            let onb = Onb::new(normal);
            assert!(onb.s().dot(onb.t()).abs() < 1e-12);
            assert!(onb.s().dot(onb.n()).abs() < 1e-12);
            assert!(onb.t().dot(onb.n()).abs() < 1e-12);
            assert!((onb.s().length() - 1.0).abs() < 1e-12);
            assert!((onb.t().length() - 1.0).abs() < 1e-12);
            assert!((onb.n() - normal.normalize()).length() < 1e-12);
        }
    }

    #[test]
    fn test_onb_round_trip() {
        let vectors = [
            Vec3::new(0.2, -0.7, 0.4),
            Vec3::new(3.0, 1.0, -2.0),
            Vec3::ZERO,
        ];
        for normal in normals() {
            let onb = Onb::new(normal);
            for v in vectors {
                let back = onb.world_to_local(onb.local_to_world(v));
                assert!((back - v).length() < 1e-12, "{:?} -> {:?}", v, back);
            }
        }
    }

    #[test]
    fn test_normal_maps_to_local_z() {
        let normal = Vec3::new(0.3, -0.4, 0.8).normalize();
        let onb = Onb::new(normal);
        let local = onb.world_to_local(normal);
        assert!((local - Vec3::Z).length() < 1e-12);
    }
}
