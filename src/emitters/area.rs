// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::core::geometry::Geometry;
use crate::math::constants::EPSILON;
use crate::shapes::parallelogram::Parallelogram;
use nalgebra::UnitQuaternion;

/// Rectangular emitter facing -Y. Emission is visible only to rays arriving
/// from below (direction entering the back hemisphere of the normal).
pub struct AreaLight {
    position: Vector3f,
    radiance: Vector3f,
    size: Vector2f,
    quad: Parallelogram,
}

impl AreaLight {
    pub fn new(position: Vector3f, radiance: Vector3f, size: Vector2f) -> Self {
        let quad = Parallelogram::new(
            position - Vector3f::new(size.x, 0.0, size.y) / 2.0,
            Vector3f::new(size.x, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, size.y),
            Vector3f::new(0.0, -1.0, 0.0),
            None);
        Self { position, radiance, size, quad }
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }

    pub fn radiance(&self) -> Vector3f {
        self.radiance
    }

    pub fn normal(&self) -> Vector3f {
        self.quad.normal()
    }

    pub fn area(&self) -> Float {
        self.size.x * self.size.y
    }

    pub fn emission(&self, _pos: Vector3f, dir: Vector3f) -> Vector3f {
        if dir.dot(&self.quad.normal()) < 0.0 {
            self.radiance
        } else {
            Vector3f::zeros()
        }
    }

    /// Solid-angle measure of the sampled point as seen from the reference
    /// interaction: cos(theta_light) / distance^2.
    pub fn pdf(&self, ref_it: &Interaction, pos: Vector3f) -> Float {
        let cos_theta = self.quad.normal().dot(&ref_it.wi).abs();
        let distance = (pos - ref_it.p).norm();
        cos_theta / (distance * distance)
    }

    /// Uniform point on the patch; sets `wi` pointing from the light toward
    /// the shading point and returns the point with its area pdf (1/A).
    pub fn sample(&self, ref_it: &mut Interaction, rng: &mut LcgRng) -> (Vector3f, Float) {
        let x1 = rng.next_f32();
        let z1 = rng.next_f32();
        let sample_position = self.position
            + (x1 - 0.5) * self.size.x * Vector3f::new(1.0, 0.0, 0.0)
            + (z1 - 0.5) * self.size.y * Vector3f::new(0.0, 0.0, 1.0);
        ref_it.wi = (ref_it.p - sample_position).normalize();
        (sample_position, 1.0 / (self.size.x * self.size.y))
    }

    pub fn intersect(&self, ray: &Ray3f) -> Option<Interaction> {
        let hit = self.quad.intersect(ray)?;
        let emission = self.emission(hit.p, ray.dir());
        Some(Interaction::light(hit.p, hit.t, self.quad.normal(), emission))
    }

    /// Emits a photon: uniform surface point, cosine-weighted direction about
    /// the emitter normal. The returned power is radiance * pi * area, the
    /// measure conversion for a single photon packet (divided later by the
    /// total photon count).
    pub fn generate_ray(&self, rng: &mut LcgRng) -> (Ray3f, Vector3f) {
        let x1 = rng.next_f32();
        let z1 = rng.next_f32();
        let sample_position = self.position
            + (x1 - 0.5) * self.size.x * Vector3f::new(1.0, 0.0, 0.0)
            + (z1 - 0.5) * self.size.y * Vector3f::new(0.0, 0.0, 1.0);

        let s1 = rng.next_f32();
        let s2 = rng.next_f32();
        let local = Vector3f::new(
            (2.0 * PI * s2).cos() * (1.0 - s1 * s1).sqrt(),
            (2.0 * PI * s2).sin() * (1.0 - s1 * s1).sqrt(),
            s1);

        let normal = self.quad.normal();
        let rotation = UnitQuaternion::rotation_between(&Vector3f::new(0.0, 0.0, 1.0), &normal)
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), PI));
        let direction = rotation.transform_vector(&local).normalize();

        let energy = self.radiance * PI * self.area();
        let ray = Ray3f::new(sample_position + EPSILON * direction, direction, None, None);
        (ray, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> AreaLight {
        AreaLight::new(Vector3f::new(0.0, 2.0, 0.0),
                       Vector3f::new(10.0, 8.0, 6.0),
                       Vector2f::new(0.5, 0.4))
    }

    #[test]
    fn test_emission_facing_convention() {
        let lt = light();
        // ray travelling upward sees the -Y face
        let up = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(lt.emission(lt.position(), up), Vector3f::new(10.0, 8.0, 6.0));
        // ray travelling downward sees nothing
        let down = Vector3f::new(0.0, -1.0, 0.0);
        assert_eq!(lt.emission(lt.position(), down), Vector3f::zeros());
    }

    #[test]
    fn test_pdf_is_projected_solid_angle() {
        let lt = light();
        let mut it = Interaction::geometry(
            Vector3f::zeros(), 1.0,
            Vector3f::new(0.0, 1.0, 0.0),
            Vector2f::new(0.0, 0.0), None);
        it.wi = Vector3f::new(0.0, 1.0, 0.0);
        let pdf = lt.pdf(&it, Vector3f::new(0.0, 2.0, 0.0));
        assert!((pdf - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_sample_on_patch() {
        let lt = light();
        let mut rng = LcgRng::new(1);
        let mut it = Interaction::geometry(
            Vector3f::new(0.1, 0.0, 0.1), 1.0,
            Vector3f::new(0.0, 1.0, 0.0),
            Vector2f::new(0.0, 0.0), None);
        for _ in 0..64 {
            let (p, pdf) = lt.sample(&mut it, &mut rng);
            assert!((pdf - 1.0 / 0.2).abs() < 1e-4);
            assert!((p.y - 2.0).abs() < 1e-6);
            assert!((p.x - 0.0).abs() <= 0.25 + 1e-5);
            assert!((p.z - 0.0).abs() <= 0.2 + 1e-5);
            // wi points from the light back to the shading point
            assert!(it.wi.y < 0.0);
        }
    }

    #[test]
    fn test_generate_ray_power_and_hemisphere() {
        let lt = light();
        let mut rng = LcgRng::new(2);
        for _ in 0..64 {
            let (ray, energy) = lt.generate_ray(&mut rng);
            assert!((energy - lt.radiance() * PI * 0.2).norm() < 1e-4);
            // photons leave through the -Y hemisphere
            assert!(ray.dir().y <= 1e-4);
        }
    }

    #[test]
    fn test_intersect_tags_light() {
        use crate::core::interaction::SurfaceKind;
        let lt = light();
        let ray = Ray3f::new(Vector3f::new(0.1, 0.0, 0.05),
                             Vector3f::new(0.0, 1.0, 0.0), None, None);
        let hit = lt.intersect(&ray).expect("upward ray hits the emitter");
        assert_eq!(hit.kind, SurfaceKind::Light);
        assert_eq!(hit.emission, Vector3f::new(10.0, 8.0, 6.0));
        assert!((hit.t - 2.0).abs() < 1e-4);
    }
}
