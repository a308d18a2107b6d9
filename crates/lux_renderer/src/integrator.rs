//! Unidirectional path tracer with next-event estimation.
//!
//! Each bounce samples the hit material for a continuation direction and,
//! for non-specular bounces, shoots one shadow ray toward every light.
//! Emitters hit by a path only contribute directly after a specular bounce
//! (or from the camera), since diffuse bounces already counted them.

use lux_math::{Color, Interval, Onb, Ray, EPS, INF};
use rand::RngCore;

use crate::hittable::{Hittable, Scene};
use crate::sampling::gen_f64;

/// Default number of bounces before Russian roulette may end a path.
pub const DEFAULT_MIN_BOUNCES: u32 = 8;

/// Default hard bounce limit.
pub const DEFAULT_MAX_BOUNCES: u32 = 64;

/// How a path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Left the scene; background added
    Escaped,
    /// Struck an emitter
    HitEmitter,
    /// Material returned a (near) zero density
    DegeneratePdf,
    /// Killed by Russian roulette
    RussianRoulette,
    /// Reached the bounce limit
    MaxBounces,
}

/// Radiance estimate for one camera ray plus how its path ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathResult {
    pub radiance: Color,
    /// Bounce index at which the path ended
    pub bounces: u32,
    pub termination: Termination,
}

/// Monte Carlo estimator of the radiance along camera rays.
pub struct Sampler<'a> {
    scene: &'a Scene,
    min_bounces: u32,
    max_bounces: u32,
    background: Color,
}

impl<'a> Sampler<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            min_bounces: DEFAULT_MIN_BOUNCES,
            max_bounces: DEFAULT_MAX_BOUNCES,
            background: Color::ZERO,
        }
    }

    /// Set the Russian roulette threshold and the hard bounce limit.
    pub fn with_bounces(mut self, min_bounces: u32, max_bounces: u32) -> Self {
        self.min_bounces = min_bounces;
        self.max_bounces = max_bounces;
        self
    }

    /// Set the radiance returned by rays that leave the scene.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Radiance arriving along `camera_ray`.
    pub fn sample(&self, camera_ray: &Ray, rng: &mut dyn RngCore) -> Color {
        self.trace(camera_ray, rng).radiance
    }

    /// Trace one path and report how it ended.
    pub fn trace(&self, camera_ray: &Ray, rng: &mut dyn RngCore) -> PathResult {
        let mut color = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut specular = true;
        let mut ray = *camera_ray;

        let end = |radiance, bounces, termination| PathResult {
            radiance,
            bounces,
            termination,
        };

        for bounces in 0..self.max_bounces {
            let Some(hit) = self.scene.hit(&ray, Interval::new(EPS, INF)) else {
                color += throughput * self.background;
                return end(color, bounces, Termination::Escaped);
            };

            let emitted = hit.material.emitted(hit.u, hit.v, hit.p);
            if emitted.max_element() > 0.0 {
                if specular && hit.front_face(&ray) {
                    color += throughput * emitted;
                }
                return end(color, bounces, Termination::HitEmitter);
            }

            let onb = Onb::new(hit.normal);
            let p = hit.p;
            let wo = onb.world_to_local(-ray.direction().normalize());

            let sample = hit.material.sample_f(p, wo, rng);
            specular = sample.specular;

            // Direct lighting
            if !specular {
                for light in self.scene.lights() {
                    let light_ray = light.random_ray(p, rng);
                    let Some(light_hit) = light.hit(&light_ray, Interval::new(EPS, INF)) else {
                        continue;
                    };
                    // Occluded, possibly by another light
                    let visible = self
                        .scene
                        .hit(&light_ray, Interval::new(EPS, light_hit.t))
                        .is_none();
                    if !visible {
                        continue;
                    }
                    let li = light_hit.material.emitted(light_hit.u, light_hit.v, light_hit.p);
                    if li.max_element() <= 0.0 || !light_hit.front_face(&light_ray) {
                        continue;
                    }
                    let light_pdf = light.pdf(&light_ray);
                    if !(light_pdf.is_finite() && light_pdf > 0.0) {
                        continue;
                    }
                    let lwi = onb.world_to_local(light_ray.direction());
                    let f = hit.material.f(p, wo, lwi);
                    color += throughput * f * li / light_pdf * lwi.z.abs();
                }
            }

            if specular {
                throughput *= sample.value;
            } else {
                if sample.pdf < EPS {
                    return end(color, bounces, Termination::DegeneratePdf);
                }
                throughput *= sample.value * sample.wi.z.abs() / sample.pdf;
            }

            ray = Ray::new(p, onb.local_to_world(sample.wi));

            if bounces >= self.min_bounces {
                let prob = throughput.max_element();
                if gen_f64(rng) > prob {
                    return end(color, bounces, Termination::RussianRoulette);
                }
                throughput /= prob;
            }
        }

        end(color, self.max_bounces, Termination::MaxBounces)
    }
}
