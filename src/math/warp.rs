// Copyright @yucwang 2023

use super::constants::{Float, PI, Vector3f};
use crate::core::rng::LcgRng;

/// Mirror `wo` about `normal`.
pub fn reflect(wo: &Vector3f, normal: &Vector3f) -> Vector3f {
    let wo_parallel = wo.dot(normal) * normal;
    let wo_perp = wo - wo_parallel;
    wo_parallel - wo_perp
}

/// Orthonormal basis around `axis`, built from a random perturbation so the
/// frame is not correlated with the lobe samples drawn in it.
pub fn perturbed_frame(axis: &Vector3f, rng: &mut LcgRng) -> (Vector3f, Vector3f) {
    let deviation = Vector3f::new(rng.next_range(-0.5, 0.5),
                                  rng.next_range(-0.5, 0.5),
                                  rng.next_range(-0.5, 0.5));
    let ref_x = axis + deviation;
    let ref_y = ref_x.cross(axis).normalize();
    let ref_x = axis.cross(&ref_y).normalize();
    (ref_x, ref_y)
}

/// Cosine-weighted direction about `axis`. The implied density constant is
/// 1/(2pi); the integrators rely on it cancelling against the diffuse eval.
pub fn sample_cosine_lobe(axis: &Vector3f, rng: &mut LcgRng) -> Vector3f {
    let s1 = rng.next_f32();
    let s2 = rng.next_f32();

    let x1 = (2.0 * PI * s2).cos() * (1.0 - s1 * s1).sqrt();
    let y1 = (2.0 * PI * s2).sin() * (1.0 - s1 * s1).sqrt();
    let z1 = s1;

    let (ref_x, ref_y) = perturbed_frame(axis, rng);
    (x1 * ref_x + y1 * ref_y + z1 * axis).normalize()
}

/// Power-cosine (Phong) lobe of exponent `alpha` about `axis`.
pub fn sample_power_cosine_lobe(axis: &Vector3f, alpha: Float, rng: &mut LcgRng) -> Vector3f {
    let s1 = rng.next_f32();
    let s2 = rng.next_f32();

    let sin_part = (1.0 - (1.0 - s1).powf(2.0 / (alpha + 1.0))).sqrt();
    let dx = sin_part * (2.0 * PI * s2).cos();
    let dy = sin_part * (2.0 * PI * s2).sin();
    let dz = (1.0 - s1).powf(1.0 / (alpha + 1.0));

    let (ref_x, ref_y) = perturbed_frame(axis, rng);
    dx * ref_x + dy * ref_y + dz * axis
}

/// Area-uniform direction on the full sphere.
pub fn sample_uniform_sphere(rng: &mut LcgRng) -> Vector3f {
    let s1 = rng.next_f32();
    let s2 = rng.next_f32();

    let z = 1.0 - 2.0 * s1;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * s2;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_about_normal() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(1.0, 0.0, 1.0).normalize();
        let wi = reflect(&wo, &n);
        assert!((wi.x + wo.x).abs() < 1e-6);
        assert!((wi.y - wo.y).abs() < 1e-6);
        assert!((wi.z - wo.z).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_lobe_stays_in_upper_hemisphere() {
        let mut rng = LcgRng::new(7);
        let axis = Vector3f::new(0.0, 1.0, 0.0);
        for _ in 0..256 {
            let wi = sample_cosine_lobe(&axis, &mut rng);
            assert!(wi.dot(&axis) >= -1e-5);
            assert!((wi.norm() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_uniform_sphere_is_normalized() {
        let mut rng = LcgRng::new(11);
        for _ in 0..256 {
            let d = sample_uniform_sphere(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-4);
        }
    }
}
