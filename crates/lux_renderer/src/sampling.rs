//! Random sampling helpers shared by materials, lights and the camera.

use lux_math::{Vec3, PI};
use rand::{Rng, RngCore};

/// Uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Rejection-sample a point inside the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f64(rng) * 2.0 - 1.0, gen_f64(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Rejection-sample a point inside the unit ball.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        if let Some(v) = p.try_normalize() {
            return v;
        }
    }
}

/// Cosine-weighted direction on the +z hemisphere (Malley's method).
///
/// Density is `cos(theta) / PI`.
pub fn cosine_sample_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let d = random_in_unit_disk(rng);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Density of [`cosine_sample_hemisphere`] for a direction in the same hemisphere as `wo`.
#[inline]
pub fn cosine_hemisphere_pdf(wo: Vec3, wi: Vec3) -> f64 {
    if wo.z * wi.z <= 0.0 {
        return 0.0;
    }
    wi.z.abs() / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unit_disk_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_cosine_hemisphere_is_upper() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut mean_cos = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let w = cosine_sample_hemisphere(&mut rng);
            assert!(w.z >= 0.0);
            assert!((w.length() - 1.0).abs() < 1e-9);
            mean_cos += w.z;
        }
        // E[cos] under cos/PI is 2/3
        mean_cos /= n as f64;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01, "mean cos {}", mean_cos);
    }

    #[test]
    fn test_unit_vector_length() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-12);
        }
    }
}
