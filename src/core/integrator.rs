// Copyright @yucwang 2026

use crate::core::camera::Camera;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;

pub trait Integrator: Sync {
    /// Fill the camera's film with an estimate of the scene's radiance.
    fn render(&self, scene: &Scene, camera: &mut Camera) -> Result<(), String>;

    /// Radiance arriving along a single ray.
    fn radiance(&self, scene: &Scene, ray: &Ray3f, rng: &mut LcgRng) -> Vector3f;
}
