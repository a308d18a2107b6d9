//! Material trait for surface scattering.
//!
//! Every method works in the local shading frame built by [`lux_math::Onb`]:
//! the surface normal is +z, `wo` points back toward the viewer and `wi`
//! toward the light. Both are unit length.

use lux_core::Texture;
use lux_math::{abs_cos_theta, cos_phi, refract, same_hemisphere, schlick, sin_phi, sin_theta};
use lux_math::{Color, Vec3, EPS, PI};
use rand::RngCore;

use crate::sampling::{
    cosine_hemisphere_pdf, cosine_sample_hemisphere, gen_f64, random_unit_vector,
};

/// Result of importance-sampling a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    /// `f(p, wo, wi)` for non-specular samples; the complete weight for specular ones
    pub value: Color,
    /// Sampled incident direction (local frame)
    pub wi: Vec3,
    /// Density of `wi`; meaningless when `specular` is set
    pub pdf: f64,
    /// True for Dirac lobes: the caller must not divide by `pdf` or apply the cosine
    pub specular: bool,
}

impl BsdfSample {
    /// A sample that carries no energy. The integrator ends the path on it.
    pub fn absorbed() -> Self {
        Self {
            value: Color::ZERO,
            wi: Vec3::Z,
            pdf: 0.0,
            specular: false,
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scattering value for the non-delta part of the lobe.
    ///
    /// Zero for direction pairs outside the lobe's support.
    fn f(&self, p: Vec3, wo: Vec3, wi: Vec3) -> Color;

    /// Importance-sample an incident direction.
    ///
    /// The default draws a cosine-weighted direction in `wo`'s hemisphere.
    fn sample_f(&self, p: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        let mut wi = cosine_sample_hemisphere(rng);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        BsdfSample {
            value: self.f(p, wo, wi),
            wi,
            pdf: self.pdf(wo, wi),
            specular: false,
        }
    }

    /// Density with which `sample_f` would produce `wi` given `wo`.
    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64 {
        cosine_hemisphere_pdf(wo, wi)
    }

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// True for light emitters.
    fn emits(&self) -> bool {
        false
    }
}

/// Mirror direction about the local normal.
#[inline]
pub(crate) fn mirror(wo: Vec3) -> Vec3 {
    Vec3::new(-wo.x, -wo.y, wo.z)
}

/// Lambertian (diffuse) material.
#[derive(Clone, Debug)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo.
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }
}

impl Material for Lambertian {
    fn f(&self, p: Vec3, wo: Vec3, wi: Vec3) -> Color {
        if !same_hemisphere(wo, wi) {
            return Color::ZERO;
        }
        self.albedo.value(0.0, 0.0, p) / PI
    }
}

/// Oren-Nayar rough diffuse material.
#[derive(Clone, Debug)]
pub struct OrenNayar {
    albedo: Texture,
    a: f64,
    b: f64,
}

impl OrenNayar {
    /// Create an Oren-Nayar material; `sigma_degrees` is the facet slope deviation.
    pub fn new(albedo: impl Into<Texture>, sigma_degrees: f64) -> Self {
        let sigma = sigma_degrees.to_radians();
        let sigma2 = sigma * sigma;
        Self {
            albedo: albedo.into(),
            a: 1.0 - sigma2 / (2.0 * (sigma2 + 0.33)),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        }
    }
}

impl Material for OrenNayar {
    fn f(&self, p: Vec3, wo: Vec3, wi: Vec3) -> Color {
        if !same_hemisphere(wo, wi) {
            return Color::ZERO;
        }

        let sin_theta_i = sin_theta(wi);
        let sin_theta_o = sin_theta(wo);

        // Cosine of the azimuth difference, clamped to the forward half
        let max_cos = if sin_theta_i > EPS && sin_theta_o > EPS {
            let d_cos = cos_phi(wi) * cos_phi(wo) + sin_phi(wi) * sin_phi(wo);
            d_cos.max(0.0)
        } else {
            0.0
        };

        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };

        self.albedo.value(0.0, 0.0, p) * (self.a + self.b * max_cos * sin_alpha * tan_beta) / PI
    }
}

/// Perfect mirror.
#[derive(Clone, Debug)]
pub struct Metal {
    albedo: Texture,
}

impl Metal {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }
}

impl Material for Metal {
    fn f(&self, _p: Vec3, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn sample_f(&self, p: Vec3, wo: Vec3, _rng: &mut dyn RngCore) -> BsdfSample {
        BsdfSample {
            value: self.albedo.value(0.0, 0.0, p),
            wi: mirror(wo),
            pdf: 1.0,
            specular: true,
        }
    }

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f64 {
        0.0
    }
}

/// Dielectric (glass) material.
///
/// Chooses reflection or refraction stochastically using Schlick's
/// approximation as the reflection probability.
#[derive(Clone, Debug)]
pub struct Dielectric {
    albedo: Texture,
    /// Index of refraction
    eta: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `eta`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(albedo: impl Into<Texture>, eta: f64) -> Self {
        Self {
            albedo: albedo.into(),
            eta,
        }
    }
}

impl Material for Dielectric {
    fn f(&self, _p: Vec3, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn sample_f(&self, p: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        // wo below the surface means we are leaving the medium
        let (outward_normal, ratio) = if wo.z < 0.0 {
            (-Vec3::Z, self.eta)
        } else {
            (Vec3::Z, 1.0 / self.eta)
        };

        let refracted = refract(-wo, outward_normal, ratio);
        let reflect_probability = match refracted {
            Some(_) => schlick(abs_cos_theta(wo), self.eta),
            None => 1.0,
        };

        let wi = match refracted {
            Some(t) if gen_f64(rng) >= reflect_probability => t,
            _ => mirror(wo),
        };

        BsdfSample {
            value: self.albedo.value(0.0, 0.0, p),
            wi,
            pdf: 1.0,
            specular: true,
        }
    }

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f64 {
        0.0
    }
}

/// Mirror reflection weighted by Schlick reflectance, without transmission.
#[derive(Clone, Debug)]
pub struct SpecularReflection {
    albedo: Texture,
    eta: f64,
}

impl SpecularReflection {
    pub fn new(albedo: impl Into<Texture>, eta: f64) -> Self {
        Self {
            albedo: albedo.into(),
            eta,
        }
    }
}

impl Material for SpecularReflection {
    fn f(&self, _p: Vec3, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn sample_f(&self, p: Vec3, wo: Vec3, _rng: &mut dyn RngCore) -> BsdfSample {
        let fr = schlick(abs_cos_theta(wo), self.eta);
        BsdfSample {
            value: self.albedo.value(0.0, 0.0, p) * fr,
            wi: mirror(wo),
            pdf: 1.0,
            specular: true,
        }
    }

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f64 {
        0.0
    }
}

/// Isotropic phase function for participating media.
///
/// Scatters uniformly over the sphere. The sample is flagged specular so the
/// integrator applies the albedo directly and skips light sampling.
#[derive(Clone, Debug)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }
}

impl Material for Isotropic {
    fn f(&self, _p: Vec3, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn sample_f(&self, p: Vec3, _wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        BsdfSample {
            value: self.albedo.value(0.0, 0.0, p),
            wi: random_unit_vector(rng),
            pdf: 1.0,
            specular: true,
        }
    }

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f64 {
        0.0
    }
}

/// Diffuse light emitter.
#[derive(Clone, Debug)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission.
    pub fn new(emit: impl Into<Texture>) -> Self {
        Self { emit: emit.into() }
    }
}

impl Material for DiffuseLight {
    fn f(&self, _p: Vec3, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    fn sample_f(&self, _p: Vec3, _wo: Vec3, _rng: &mut dyn RngCore) -> BsdfSample {
        // Lights don't scatter rays
        BsdfSample::absorbed()
    }

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f64 {
        0.0
    }

    fn emitted(&self, u: f64, v: f64, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }

    fn emits(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dir(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3::new(x, y, z).normalize()
    }

    #[test]
    fn test_lambertian_is_constant_in_hemisphere() {
        let albedo = Color::new(0.8, 0.4, 0.2);
        let mat = Lambertian::new(albedo);
        let pairs = [
            (dir(0.0, 0.0, 1.0), dir(0.3, 0.1, 0.9)),
            (dir(0.7, -0.2, 0.1), dir(-0.5, 0.5, 0.2)),
            (dir(0.1, 0.1, -1.0), dir(0.4, -0.3, -0.6)),
        ];
        for (wo, wi) in pairs {
            let f = mat.f(Vec3::ZERO, wo, wi);
            assert!((f - albedo / PI).length() < 1e-12);
        }
    }

    #[test]
    fn test_lambertian_zero_across_surface() {
        let mat = Lambertian::new(Color::ONE);
        assert_eq!(mat.f(Vec3::ZERO, dir(0.0, 0.2, 1.0), dir(0.0, 0.2, -1.0)), Color::ZERO);
    }

    #[test]
    fn test_default_sampling_matches_pdf() {
        let mat = Lambertian::new(Color::ONE);
        let mut rng = StdRng::seed_from_u64(1);
        let wo = dir(0.2, 0.3, -0.8);
        for _ in 0..100 {
            let s = mat.sample_f(Vec3::ZERO, wo, &mut rng);
            assert!(!s.specular);
            assert!(same_hemisphere(wo, s.wi));
            assert!((s.pdf - mat.pdf(wo, s.wi)).abs() < 1e-12);
            assert!(s.pdf > 0.0);
        }
    }

    #[test]
    fn test_oren_nayar_zero_roughness_is_lambertian() {
        let mat = OrenNayar::new(Color::ONE, 0.0);
        let f = mat.f(Vec3::ZERO, dir(0.4, 0.0, 0.6), dir(-0.1, 0.3, 0.9));
        assert!((f - Color::splat(1.0 / PI)).length() < 1e-12);
    }

    #[test]
    fn test_oren_nayar_backscatter_brightens() {
        let mat = OrenNayar::new(Color::ONE, 30.0);
        let wo = dir(0.6, 0.0, 0.4);
        let back = mat.f(Vec3::ZERO, wo, dir(0.6, 0.01, 0.4));
        let side = mat.f(Vec3::ZERO, wo, dir(0.0, 0.6, 0.4));
        assert!(back.x > side.x);
        assert!(mat.f(Vec3::ZERO, wo, -wo).x == 0.0);
    }

    #[test]
    fn test_metal_mirrors() {
        let mat = Metal::new(Color::new(0.9, 0.8, 0.7));
        let mut rng = StdRng::seed_from_u64(2);
        let wo = dir(0.3, -0.4, 0.5);
        let s = mat.sample_f(Vec3::ZERO, wo, &mut rng);

        assert!(s.specular);
        assert_eq!(s.pdf, 1.0);
        assert_eq!(s.wi, Vec3::new(-wo.x, -wo.y, wo.z));
        assert_eq!(s.value, Color::new(0.9, 0.8, 0.7));
        assert_eq!(mat.f(Vec3::ZERO, wo, s.wi), Color::ZERO);
    }

    #[test]
    fn test_dielectric_total_internal_reflection_always_reflects() {
        let mat = Dielectric::new(Color::ONE, 1.5);
        let mut rng = StdRng::seed_from_u64(3);
        // Inside the glass, grazing
        let wo = dir(0.95, 0.0, -0.1);
        for _ in 0..50 {
            let s = mat.sample_f(Vec3::ZERO, wo, &mut rng);
            assert!(s.specular);
            assert_eq!(s.wi, mirror(wo));
        }
    }

    #[test]
    fn test_dielectric_mostly_refracts_at_normal_incidence() {
        let mat = Dielectric::new(Color::ONE, 1.5);
        let mut rng = StdRng::seed_from_u64(4);
        let refracted = (0..1000)
            .filter(|_| mat.sample_f(Vec3::ZERO, Vec3::Z, &mut rng).wi.z < 0.0)
            .count();
        // Reflectance at normal incidence is 4%
        assert!(refracted > 900, "refracted {}", refracted);
    }

    #[test]
    fn test_specular_reflection_scaled_by_fresnel() {
        let mat = SpecularReflection::new(Color::ONE, 1.5);
        let mut rng = StdRng::seed_from_u64(5);
        let s = mat.sample_f(Vec3::ZERO, Vec3::Z, &mut rng);
        assert!(s.specular);
        assert!((s.value.x - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_isotropic_samples_sphere() {
        let mat = Isotropic::new(Color::splat(0.5));
        let mut rng = StdRng::seed_from_u64(6);
        let below = (0..1000)
            .filter(|_| mat.sample_f(Vec3::ZERO, Vec3::Z, &mut rng).wi.z < 0.0)
            .count();
        assert!(below > 400 && below < 600);
    }

    #[test]
    fn test_diffuse_light() {
        let light = DiffuseLight::new(Color::splat(4.0));
        let mut rng = StdRng::seed_from_u64(7);

        assert!(light.emits());
        assert_eq!(light.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
        let s = light.sample_f(Vec3::ZERO, Vec3::Z, &mut rng);
        assert_eq!(s.value, Color::ZERO);
        assert_eq!(s.pdf, 0.0);
        assert!(!Lambertian::new(Color::ONE).emits());
    }
}
