// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_uniform_sphere;

/// Isotropic emitter without a physical surface; it can be sampled and can
/// shoot photons but never shows up in intersection queries.
pub struct PointLight {
    position: Vector3f,
    radiance: Vector3f,
}

impl PointLight {
    pub fn new(position: Vector3f, radiance: Vector3f) -> Self {
        Self { position, radiance }
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }

    pub fn radiance(&self) -> Vector3f {
        self.radiance
    }

    pub fn emission(&self, _pos: Vector3f, _dir: Vector3f) -> Vector3f {
        self.radiance
    }

    pub fn pdf(&self, _ref_it: &Interaction, _pos: Vector3f) -> Float {
        1.0
    }

    pub fn sample(&self, ref_it: &mut Interaction, _rng: &mut LcgRng) -> (Vector3f, Float) {
        ref_it.wi = (ref_it.p - self.position).normalize();
        (self.position, 1.0)
    }

    pub fn intersect(&self, _ray: &Ray3f) -> Option<Interaction> {
        None
    }

    pub fn generate_ray(&self, rng: &mut LcgRng) -> (Ray3f, Vector3f) {
        let direction = sample_uniform_sphere(rng);
        let ray = Ray3f::new(self.position + EPSILON * direction, direction, None, None);
        (ray, self.radiance)
    }
}
