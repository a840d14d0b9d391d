// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::emitters::area::AreaLight;
use crate::emitters::point::PointLight;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Closed set of emitter models, dispatched per operation.
pub enum Light {
    Area(AreaLight),
    Point(PointLight),
}

impl Light {
    pub fn area(position: Vector3f, radiance: Vector3f, size: Vector2f) -> Self {
        Light::Area(AreaLight::new(position, radiance, size))
    }

    pub fn point(position: Vector3f, radiance: Vector3f) -> Self {
        Light::Point(PointLight::new(position, radiance))
    }

    /// Radiance emitted from `pos` toward `dir`; zero when the direction
    /// does not satisfy the emitter's facing convention.
    pub fn emission(&self, pos: Vector3f, dir: Vector3f) -> Vector3f {
        match self {
            Light::Area(lt) => lt.emission(pos, dir),
            Light::Point(lt) => lt.emission(pos, dir),
        }
    }

    /// Projected solid-angle term of the sampled point (cos/d^2 for area
    /// emitters, 1 for point emitters).
    pub fn pdf(&self, ref_it: &Interaction, pos: Vector3f) -> Float {
        match self {
            Light::Area(lt) => lt.pdf(ref_it, pos),
            Light::Point(lt) => lt.pdf(ref_it, pos),
        }
    }

    /// Draws a point on the emitter and its area-measure pdf.
    pub fn sample(&self, ref_it: &mut Interaction, rng: &mut LcgRng) -> (Vector3f, Float) {
        match self {
            Light::Area(lt) => lt.sample(ref_it, rng),
            Light::Point(lt) => lt.sample(ref_it, rng),
        }
    }

    pub fn intersect(&self, ray: &Ray3f) -> Option<Interaction> {
        match self {
            Light::Area(lt) => lt.intersect(ray),
            Light::Point(lt) => lt.intersect(ray),
        }
    }

    /// Photon emission: a ray leaving the emitter plus the power it carries.
    pub fn generate_ray(&self, rng: &mut LcgRng) -> (Ray3f, Vector3f) {
        match self {
            Light::Area(lt) => lt.generate_ray(rng),
            Light::Point(lt) => lt.generate_ray(rng),
        }
    }
}
