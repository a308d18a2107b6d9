//! Microfacet reflection models.
//!
//! A [`MicrofacetDistribution`] describes the density of facet normals around
//! the shading normal. [`Microfacet`] is a Cook-Torrance glossy lobe built on
//! it and [`FresnelBlend`] layers that lobe over a substrate diffuse term.

use lux_core::Texture;
use lux_math::{abs_cos_theta, same_hemisphere, schlick, Color, Vec3, PI};
use rand::RngCore;

use crate::material::{BsdfSample, Material};
use crate::sampling::{cosine_sample_hemisphere, gen_f64};

/// Distribution of microfacet normals in the local shading frame.
pub trait MicrofacetDistribution: Send + Sync {
    /// Differential area of facets with normal `wh`.
    fn d(&self, wh: Vec3) -> f64;

    /// Density of `wi` when sampled through [`MicrofacetDistribution::sample_wi`].
    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64;

    /// Sample a half-vector and reflect `wo` about it.
    ///
    /// Returns the incident direction and its density.
    fn sample_wi(&self, wo: Vec3, rng: &mut dyn RngCore) -> (Vec3, f64);
}

/// Blinn-Phong facet distribution, `D = (e + 2) cos^e / (2 PI)` up to normalisation.
#[derive(Clone, Copy, Debug)]
pub struct BlinnDistribution {
    exponent: f64,
}

impl BlinnDistribution {
    pub fn new(exponent: f64) -> Self {
        Self { exponent }
    }
}

impl MicrofacetDistribution for BlinnDistribution {
    fn d(&self, wh: Vec3) -> f64 {
        (self.exponent + 2.0) * abs_cos_theta(wh).powf(self.exponent) / PI
    }

    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64 {
        let Some(wh) = (wo + wi).try_normalize() else {
            return 0.0;
        };
        let wo_dot_wh = wo.dot(wh);
        if wo_dot_wh <= 0.0 {
            return 0.0;
        }
        let cos_theta = abs_cos_theta(wh);
        (self.exponent + 1.0) * cos_theta.powf(self.exponent) / (2.0 * PI * 4.0 * wo_dot_wh)
    }

    fn sample_wi(&self, wo: Vec3, rng: &mut dyn RngCore) -> (Vec3, f64) {
        let cos_theta = gen_f64(rng).powf(1.0 / (self.exponent + 1.0));
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = gen_f64(rng) * 2.0 * PI;

        let mut wh = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        if wh.z * wo.z < 0.0 {
            wh = -wh;
        }

        let wi = (-wo + 2.0 * wo.dot(wh) * wh).normalize_or_zero();
        (wi, self.pdf(wo, wi))
    }
}

/// Torrance-Sparrow shadowing and masking.
fn geometric_attenuation(wo: Vec3, wi: Vec3, wh: Vec3) -> f64 {
    let n_dot_wh = abs_cos_theta(wh);
    let n_dot_wo = abs_cos_theta(wo);
    let n_dot_wi = abs_cos_theta(wi);
    let wo_dot_wh = wo.dot(wh).abs();
    if wo_dot_wh == 0.0 {
        return 0.0;
    }
    (2.0 * n_dot_wh * n_dot_wo / wo_dot_wh)
        .min(2.0 * n_dot_wh * n_dot_wi / wo_dot_wh)
        .min(1.0)
}

/// Cook-Torrance glossy reflection with a Schlick Fresnel term.
pub struct Microfacet<D: MicrofacetDistribution> {
    albedo: Texture,
    distribution: D,
    eta: f64,
}

impl<D: MicrofacetDistribution> Microfacet<D> {
    pub fn new(albedo: impl Into<Texture>, distribution: D, eta: f64) -> Self {
        Self {
            albedo: albedo.into(),
            distribution,
            eta,
        }
    }
}

impl<D: MicrofacetDistribution> Material for Microfacet<D> {
    fn f(&self, p: Vec3, wo: Vec3, wi: Vec3) -> Color {
        let cos_theta_o = abs_cos_theta(wo);
        let cos_theta_i = abs_cos_theta(wi);
        if cos_theta_o == 0.0 || cos_theta_i == 0.0 || !same_hemisphere(wo, wi) {
            return Color::ZERO;
        }
        let Some(wh) = (wi + wo).try_normalize() else {
            return Color::ZERO;
        };

        let fresnel = schlick(wi.dot(wh), self.eta);
        self.albedo.value(0.0, 0.0, p)
            * self.distribution.d(wh)
            * geometric_attenuation(wo, wi, wh)
            * fresnel
            / (4.0 * cos_theta_i * cos_theta_o)
    }

    fn sample_f(&self, p: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        let (wi, pdf) = self.distribution.sample_wi(wo, rng);
        if !same_hemisphere(wo, wi) {
            return BsdfSample::absorbed();
        }
        BsdfSample {
            value: self.f(p, wo, wi),
            wi,
            pdf,
            specular: false,
        }
    }

    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64 {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        self.distribution.pdf(wo, wi)
    }
}

/// Ashikhmin-Shirley diffuse substrate under a glossy coat.
pub struct FresnelBlend<D: MicrofacetDistribution> {
    diffuse: Texture,
    specular: Texture,
    distribution: D,
}

impl<D: MicrofacetDistribution> FresnelBlend<D> {
    pub fn new(diffuse: impl Into<Texture>, specular: impl Into<Texture>, distribution: D) -> Self {
        Self {
            diffuse: diffuse.into(),
            specular: specular.into(),
            distribution,
        }
    }
}

/// Schlick Fresnel interpolated from a colored normal-incidence reflectance.
fn schlick_fresnel(rs: Color, cos_theta: f64) -> Color {
    rs + (1.0 - cos_theta).powi(5) * (Color::ONE - rs)
}

impl<D: MicrofacetDistribution> Material for FresnelBlend<D> {
    fn f(&self, p: Vec3, wo: Vec3, wi: Vec3) -> Color {
        if !same_hemisphere(wo, wi) {
            return Color::ZERO;
        }
        let rd = self.diffuse.value(0.0, 0.0, p);
        let rs = self.specular.value(0.0, 0.0, p);

        let diffuse = 28.0 / (23.0 * PI)
            * rd
            * (Color::ONE - rs)
            * (1.0 - (1.0 - 0.5 * abs_cos_theta(wi)).powi(5))
            * (1.0 - (1.0 - 0.5 * abs_cos_theta(wo)).powi(5));

        let Some(wh) = (wi + wo).try_normalize() else {
            return diffuse;
        };
        let denom = 4.0 * wi.dot(wh).abs() * abs_cos_theta(wi).max(abs_cos_theta(wo));
        if denom == 0.0 {
            return diffuse;
        }
        let specular = self.distribution.d(wh) / denom * schlick_fresnel(rs, wi.dot(wh));

        diffuse + specular
    }

    fn sample_f(&self, p: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        let wi = if gen_f64(rng) < 0.5 {
            let mut wi = cosine_sample_hemisphere(rng);
            if wo.z < 0.0 {
                wi.z = -wi.z;
            }
            wi
        } else {
            let (wi, _) = self.distribution.sample_wi(wo, rng);
            if !same_hemisphere(wo, wi) {
                return BsdfSample::absorbed();
            }
            wi
        };

        BsdfSample {
            value: self.f(p, wo, wi),
            wi,
            pdf: self.pdf(wo, wi),
            specular: false,
        }
    }

    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64 {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        0.5 * (abs_cos_theta(wi) / PI + self.distribution.pdf(wo, wi))
    }
}
