//! Disney Principled BSDF implementation.
//!
//! Based on the 2012 Disney paper "Physically Based Shading at Disney"
//! and the 2015 extension for clearcoat and sheen.
//!
//! All evaluation happens in the local shading frame with the tangent along
//! +x, so the anisotropic lobe stretches along the surface's first basis
//! vector.

use lux_math::{Color, Vec3, EPS, PI};
use rand::RngCore;

use crate::material::{BsdfSample, Material};
use crate::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere, gen_f64};

/// Disney Principled BSDF material.
///
/// A physically-based material with intuitive artist-friendly parameters.
#[derive(Clone, Debug)]
pub struct Disney {
    /// Base color (albedo for dielectrics, reflectance for metals)
    pub base_color: Color,

    /// Metallic: 0 = dielectric, 1 = metal
    pub metallic: f64,

    /// Subsurface: blend to subsurface approximation
    pub subsurface: f64,

    /// Specular: controls Fresnel reflectance at normal incidence
    pub specular: f64,

    /// Roughness: 0 = smooth/glossy, 1 = rough/diffuse
    pub roughness: f64,

    /// Specular tint: tints the specular towards base_color
    pub specular_tint: f64,

    /// Anisotropic: aspect ratio for anisotropic reflection
    pub anisotropic: f64,

    /// Sheen: additional grazing component for cloth-like materials
    pub sheen: f64,

    /// Sheen tint: tints the sheen towards base_color
    pub sheen_tint: f64,

    /// Clearcoat: second specular lobe for car paint, lacquered wood
    pub clearcoat: f64,

    /// Clearcoat gloss: 0 = satin, 1 = gloss
    pub clearcoat_gloss: f64,
}

impl Default for Disney {
    fn default() -> Self {
        Self {
            base_color: Color::new(0.8, 0.8, 0.8),
            metallic: 0.0,
            subsurface: 0.0,
            specular: 0.5,
            roughness: 0.5,
            specular_tint: 0.0,
            anisotropic: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 1.0,
        }
    }
}

impl Disney {
    /// Create a new Disney BSDF with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simple diffuse material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            base_color: color,
            metallic: 0.0,
            roughness: 1.0,
            specular: 0.0,
            ..Default::default()
        }
    }

    /// Create a metallic material.
    pub fn metal(color: Color, roughness: f64) -> Self {
        Self {
            base_color: color,
            metallic: 1.0,
            roughness,
            specular: 1.0,
            ..Default::default()
        }
    }

    /// Create a glossy plastic-like material.
    pub fn plastic(color: Color, roughness: f64) -> Self {
        Self {
            base_color: color,
            metallic: 0.0,
            roughness,
            specular: 0.5,
            ..Default::default()
        }
    }

    /// Builder method to set base color.
    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    /// Builder method to set metallic.
    pub fn with_metallic(mut self, metallic: f64) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set roughness.
    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set specular.
    pub fn with_specular(mut self, specular: f64) -> Self {
        self.specular = specular.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the clearcoat layer.
    pub fn with_clearcoat(mut self, clearcoat: f64, gloss: f64) -> Self {
        self.clearcoat = clearcoat.clamp(0.0, 1.0);
        self.clearcoat_gloss = gloss.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set sheen.
    pub fn with_sheen(mut self, sheen: f64, tint: f64) -> Self {
        self.sheen = sheen.clamp(0.0, 1.0);
        self.sheen_tint = tint.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set anisotropy.
    pub fn with_anisotropic(mut self, anisotropic: f64) -> Self {
        self.anisotropic = anisotropic.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the subsurface blend.
    pub fn with_subsurface(mut self, subsurface: f64) -> Self {
        self.subsurface = subsurface.clamp(0.0, 1.0);
        self
    }

    /// Anisotropic roughness along x and y.
    fn alphas(&self) -> (f64, f64) {
        let aspect = (1.0 - self.anisotropic * 0.9).sqrt();
        let r2 = self.roughness * self.roughness;
        ((r2 / aspect).max(0.001), (r2 * aspect).max(0.001))
    }

    /// Clearcoat roughness.
    fn clearcoat_alpha(&self) -> f64 {
        lerp(0.1, 0.001, self.clearcoat_gloss)
    }

    /// Hue and saturation of the base color with luminance normalised out.
    fn tint(&self) -> Color {
        let c = self.base_color;
        let lum = 0.3 * c.x + 0.6 * c.y + 0.1 * c.z;
        if lum > 0.0 {
            c / lum
        } else {
            Color::ONE
        }
    }

    /// Specular color at normal incidence.
    fn cspec0(&self) -> Color {
        let dielectric = self.specular * 0.08 * Color::ONE.lerp(self.tint(), self.specular_tint);
        dielectric.lerp(self.base_color, self.metallic)
    }

    fn diffuse_term(&self, n_dot_l: f64, n_dot_v: f64, l_dot_h: f64) -> Color {
        let fl = schlick_weight(n_dot_l);
        let fv = schlick_weight(n_dot_v);
        let fd90 = 0.5 + 2.0 * l_dot_h * l_dot_h * self.roughness;
        let fd = lerp(1.0, fd90, fl) * lerp(1.0, fd90, fv);
        fd * self.base_color / PI
    }

    fn subsurface_term(&self, n_dot_l: f64, n_dot_v: f64, l_dot_h: f64) -> Color {
        let fl = schlick_weight(n_dot_l);
        let fv = schlick_weight(n_dot_v);
        let fss90 = l_dot_h * l_dot_h * self.roughness;
        let fss = lerp(1.0, fss90, fl) * lerp(1.0, fss90, fv);
        let ss = 1.25 * (fss * (1.0 / (n_dot_l + n_dot_v) - 0.5) + 0.5);
        ss * self.base_color / PI
    }

    fn specular_term(&self, wi: Vec3, wo: Vec3, h: Vec3, l_dot_h: f64) -> Color {
        let (ax, ay) = self.alphas();
        let ds = gtr2_aniso(h.z, h.x, h.y, ax, ay);
        let fs = self.cspec0().lerp(Color::ONE, schlick_weight(l_dot_h));
        let gs = smith_g_ggx_aniso(wi.z, wi.x, wi.y, ax, ay)
            * smith_g_ggx_aniso(wo.z, wo.x, wo.y, ax, ay);
        gs * fs * ds
    }

    fn clearcoat_term(&self, n_dot_l: f64, n_dot_v: f64, n_dot_h: f64, l_dot_h: f64) -> f64 {
        let dr = gtr1(n_dot_h.abs(), self.clearcoat_alpha());
        let fr = lerp(0.04, 1.0, schlick_weight(l_dot_h));
        let gr = smith_g_ggx(n_dot_l, 0.25) * smith_g_ggx(n_dot_v, 0.25);
        self.clearcoat * fr * gr * dr
    }

    fn sheen_term(&self, l_dot_h: f64) -> Color {
        let csheen = Color::ONE.lerp(self.tint(), self.sheen_tint);
        schlick_weight(l_dot_h) * self.sheen * csheen
    }

    /// Density of the anisotropic specular strategy.
    fn specular_pdf(&self, wo: Vec3, wh: Vec3) -> f64 {
        let (ax, ay) = self.alphas();
        let wo_dot_wh = wo.dot(wh);
        if wo_dot_wh <= 0.0 {
            return 0.0;
        }
        gtr2_aniso(wh.z, wh.x, wh.y, ax, ay) * wh.z / (4.0 * wo_dot_wh)
    }

    /// Density of the clearcoat strategy.
    fn clearcoat_pdf(&self, wo: Vec3, wh: Vec3) -> f64 {
        let wo_dot_wh = wo.dot(wh);
        if wo_dot_wh <= 0.0 {
            return 0.0;
        }
        let n_dot_h = wh.z.abs();
        gtr1(n_dot_h, self.clearcoat_alpha()) * n_dot_h / (4.0 * wo_dot_wh)
    }

    /// Sample a half-vector proportional to `D(h) cos(theta_h)` of the anisotropic GTR2 lobe.
    fn sample_specular_half(&self, rng: &mut dyn RngCore) -> Vec3 {
        let (ax, ay) = self.alphas();
        let u1 = gen_f64(rng);
        let u2 = gen_f64(rng);
        let t = (u1 / (1.0 - u1)).sqrt();
        let phi = 2.0 * PI * u2;
        Vec3::new(t * ax * phi.cos(), t * ay * phi.sin(), 1.0).normalize()
    }

    /// Sample a half-vector proportional to `D(h) cos(theta_h)` of the GTR1 lobe.
    fn sample_clearcoat_half(&self, rng: &mut dyn RngCore) -> Vec3 {
        let a = self.clearcoat_alpha();
        let a2 = a * a;
        let u1 = gen_f64(rng);
        let u2 = gen_f64(rng);
        let cos_theta = ((1.0 - a2.powf(1.0 - u1)) / (1.0 - a2)).max(0.0).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * u2;
        Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
    }
}

impl Material for Disney {
    fn f(&self, _p: Vec3, wo: Vec3, wi: Vec3) -> Color {
        let n_dot_l = wi.z;
        let n_dot_v = wo.z;
        if n_dot_l <= 0.0 || n_dot_v <= 0.0 {
            return Color::ZERO;
        }
        let Some(h) = (wo + wi).try_normalize() else {
            return Color::ZERO;
        };
        let n_dot_h = h.z;
        let l_dot_h = wi.dot(h);

        let diffuse = self.diffuse_term(n_dot_l, n_dot_v, l_dot_h);
        let subsurface = self.subsurface_term(n_dot_l, n_dot_v, l_dot_h);
        let glossy = self.specular_term(wi, wo, h, l_dot_h);
        let clearcoat = self.clearcoat_term(n_dot_l, n_dot_v, n_dot_h, l_dot_h);
        let sheen = self.sheen_term(l_dot_h);

        (diffuse.lerp(subsurface, self.subsurface) + sheen) * (1.0 - self.metallic)
            + glossy
            + Color::splat(clearcoat)
    }

    /// Picks one of the diffuse, specular and clearcoat strategies uniformly
    /// and reports the density of the full one-third mixture.
    fn sample_f(&self, p: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        if wo.z <= 0.0 {
            return BsdfSample::absorbed();
        }

        let strategy = gen_f64(rng) * 3.0;
        let wi = if strategy < 1.0 {
            cosine_sample_hemisphere(rng)
        } else {
            let wh = if strategy < 2.0 {
                self.sample_specular_half(rng)
            } else {
                self.sample_clearcoat_half(rng)
            };
            -wo + 2.0 * wo.dot(wh) * wh
        };

        if wi.z <= 0.0 {
            return BsdfSample::absorbed();
        }

        BsdfSample {
            value: self.f(p, wo, wi),
            wi,
            pdf: self.pdf(wo, wi),
            specular: false,
        }
    }

    fn pdf(&self, wo: Vec3, wi: Vec3) -> f64 {
        if wo.z * wi.z <= 0.0 {
            return 0.0;
        }
        let Some(wh) = (wo + wi).try_normalize() else {
            return 0.0;
        };
        let sum = cosine_hemisphere_pdf(wo, wi) + self.specular_pdf(wo, wh) + self.clearcoat_pdf(wo, wh);
        sum / 3.0
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Linear interpolation.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Schlick weight for Fresnel.
#[inline]
fn schlick_weight(cos_theta: f64) -> f64 {
    let x = (1.0 - cos_theta).clamp(0.0, 1.0);
    let x2 = x * x;
    x2 * x2 * x // (1 - cos_theta)^5
}

/// Berry distribution (GTR with gamma = 1), used by the clearcoat lobe.
#[inline]
fn gtr1(n_dot_h: f64, a: f64) -> f64 {
    if a >= 1.0 {
        return 1.0 / PI;
    }
    let a2 = a * a;
    let t = 1.0 + (a2 - 1.0) * n_dot_h * n_dot_h;
    (a2 - 1.0) / (PI * a2.ln() * t)
}

/// Anisotropic GGX/Trowbridge-Reitz distribution.
#[inline]
fn gtr2_aniso(n_dot_h: f64, h_dot_x: f64, h_dot_y: f64, ax: f64, ay: f64) -> f64 {
    let s = (h_dot_x / ax).powi(2) + (h_dot_y / ay).powi(2) + n_dot_h * n_dot_h;
    1.0 / (PI * ax * ay * s * s)
}

/// Separable Smith G for GGX, pre-divided by `2 cos`.
#[inline]
fn smith_g_ggx(n_dot_v: f64, alpha: f64) -> f64 {
    let a = alpha * alpha;
    let b = n_dot_v * n_dot_v;
    1.0 / (n_dot_v.abs() + (a + b - a * b).sqrt().max(EPS))
}

/// Anisotropic Smith G for GGX, pre-divided by `2 cos`.
#[inline]
fn smith_g_ggx_aniso(n_dot_v: f64, v_dot_x: f64, v_dot_y: f64, ax: f64, ay: f64) -> f64 {
    1.0 / (n_dot_v + ((v_dot_x * ax).powi(2) + (v_dot_y * ay).powi(2) + n_dot_v * n_dot_v).sqrt())
}
