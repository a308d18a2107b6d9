//! Indexed triangle mesh.
//!
//! Meshes arrive as triangle soup (for example from STL), are welded into
//! shared vertices, and can be repositioned before the renderer builds its
//! acceleration structure over them.

use std::collections::HashMap;

use lux_math::{Aabb, Mat4, Vec3};

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Smooth vertex normals (None means flat shading)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Build a mesh from a flat list of triangle corners, merging identical vertices.
    ///
    /// `corners.len()` should be a multiple of 3; a trailing partial triangle is dropped.
    pub fn from_triangle_soup(corners: &[Vec3]) -> Self {
        let mut lookup: HashMap<[u64; 3], u32> = HashMap::with_capacity(corners.len() / 2);
        let mut positions = Vec::new();
        let mut indices = Vec::with_capacity(corners.len() - corners.len() % 3);

        for triangle in corners.chunks_exact(3) {
            for &corner in triangle {
                let key = [corner.x.to_bits(), corner.y.to_bits(), corner.z.to_bits()];
                let index = *lookup.entry(key).or_insert_with(|| {
                    positions.push(corner);
                    (positions.len() - 1) as u32
                });
                indices.push(index);
            }
        }

        log::debug!(
            "Welded {} corners into {} vertices",
            corners.len(),
            positions.len()
        );

        Self::new(positions, indices, None)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::empty();
        }

        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// Compute smooth vertex normals by averaging unit face normals.
    ///
    /// Zero-area faces contribute nothing. A vertex touched only by
    /// zero-area faces gets +Z.
    pub fn smooth_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            let Some(n) = self.face_normal(i0, i1, i2) else {
                continue;
            };
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Z);
        }

        self.normals = Some(normals);
    }

    /// Unit normal of the face with the given vertex indices (counter-clockwise winding).
    ///
    /// Returns `None` for zero-area faces or out-of-range indices.
    fn face_normal(&self, i0: usize, i1: usize, i2: usize) -> Option<Vec3> {
        let p0 = *self.positions.get(i0)?;
        let p1 = *self.positions.get(i1)?;
        let p2 = *self.positions.get(i2)?;
        (p1 - p0).cross(p2 - p0).try_normalize()
    }

    /// Check if the mesh has smooth normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let face = &self.indices[index * 3..index * 3 + 3];
        [
            self.positions[face[0] as usize],
            self.positions[face[1] as usize],
            self.positions[face[2] as usize],
        ]
    }

    /// True when triangle `index` has (numerically) zero area.
    pub fn is_degenerate(&self, index: usize) -> bool {
        let face = &self.indices[index * 3..index * 3 + 3];
        self.face_normal(face[0] as usize, face[1] as usize, face[2] as usize)
            .is_none()
    }

    /// Apply an affine transform to positions and normals, then refresh the bounds.
    pub fn transform(&mut self, m: &Mat4) {
        for p in &mut self.positions {
            *p = m.transform_point3(*p);
        }
        if let Some(normals) = &mut self.normals {
            let normal_matrix = m.inverse().transpose();
            for n in normals.iter_mut() {
                *n = normal_matrix.transform_vector3(*n).try_normalize().unwrap_or(*n);
            }
        }
        self.bounds = Self::compute_bounds(&self.positions);
    }

    /// Translate so that the bounding-box point at `anchor` lands on `position`.
    pub fn move_to(&mut self, position: Vec3, anchor: Vec3) -> Mat4 {
        let d = position - self.bounds.anchor(anchor);
        let m = Mat4::from_translation(d);
        self.transform(&m);
        m
    }

    /// Center the bounding box on the origin.
    pub fn center(&mut self) -> Mat4 {
        self.move_to(Vec3::ZERO, Vec3::splat(0.5))
    }

    /// Uniformly scale and translate the mesh to fit inside `bounds`.
    ///
    /// Leftover space on each axis is distributed according to `anchor`.
    pub fn fit_inside(&mut self, bounds: &Aabb, anchor: Vec3) -> Mat4 {
        let current = self.bounds;
        let scale = (bounds.size() / current.size()).min_element();
        let extra = bounds.size() - current.size() * scale;
        let m = Mat4::from_translation(bounds.min() + extra * anchor)
            * Mat4::from_scale(Vec3::splat(scale))
            * Mat4::from_translation(-current.min());
        self.transform(&m);
        m
    }

    /// Fit inside the cube `[-0.5, 0.5]^3`, centered.
    pub fn fit_in_unit_cube(&mut self) -> Mat4 {
        let unit = Aabb::from_points(Vec3::splat(-0.5), Vec3::splat(0.5));
        self.fit_inside(&unit, Vec3::splat(0.5))
    }

    /// Fit inside the cube `[-1, 1]^3`, centered.
    pub fn fit_in_bi_unit_cube(&mut self) -> Mat4 {
        let bi_unit = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        self.fit_inside(&bi_unit, Vec3::splat(0.5))
    }

    /// Rotate about `axis` through the origin.
    pub fn rotate(&mut self, radians: f64, axis: Vec3) {
        self.transform(&Mat4::from_axis_angle(axis.normalize(), radians));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_soup() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_mesh_creation() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_soup_is_welded() {
        let mesh = Mesh::from_triangle_soup(&quad_soup());

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_soup_keeps_winding() {
        let mesh = Mesh::from_triangle_soup(&quad_soup());
        for i in 0..mesh.triangle_count() {
            let [p0, p1, p2] = mesh.triangle(i);
            let n = (p1 - p0).cross(p2 - p0).normalize();
            assert!((n - Vec3::Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_smooth_normals_skip_degenerate_faces() {
        let mut soup = quad_soup();
        // Zero-area sliver sharing vertex 0
        soup.extend([Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)]);
        let mut mesh = Mesh::from_triangle_soup(&soup);
        mesh.smooth_normals();

        assert!(mesh.is_degenerate(2));
        let normals = mesh.normals.as_ref().unwrap();
        for normal in normals {
            assert!(normal.is_finite());
            assert!((normal.length() - 1.0).abs() < 1e-12);
        }
        assert!((normals[0] - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None);

        assert_eq!(mesh.bounds.min(), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_fit_in_unit_cube() {
        let positions = vec![
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(14.0, 10.0, 10.0),
            Vec3::new(10.0, 12.0, 11.0),
        ];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2], None);
        mesh.fit_in_unit_cube();

        // Longest axis (x, length 4) spans the full cube
        assert!((mesh.bounds.x.min + 0.5).abs() < 1e-9);
        assert!((mesh.bounds.x.max - 0.5).abs() < 1e-9);
        // Shorter axes are centered
        assert!(mesh.bounds.centroid().length() < 1e-9);
    }

    #[test]
    fn test_rotate_moves_normals() {
        let mut mesh = Mesh::from_triangle_soup(&quad_soup());
        mesh.smooth_normals();
        mesh.rotate(std::f64::consts::FRAC_PI_2, Vec3::X);

        for n in mesh.normals.as_ref().unwrap() {
            assert!((*n - (-Vec3::Y)).length() < 1e-9);
        }
    }
}
