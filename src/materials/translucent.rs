// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::math::constants::{Float, Vector3f};
use crate::math::warp::reflect;

// Squared-difference tolerance when matching a direction against the
// deterministic refraction result.
const REFRACTION_TOLERANCE: Float = 1e-4;

/// Snell-law refraction with total-internal-reflection fallback. The stored
/// ratio applies when entering the medium; the reciprocal applies on exit.
pub struct Translucent {
    refraction: Float,
    color: Vector3f,
}

impl Translucent {
    pub fn new(refraction: Float, color: Vector3f) -> Self {
        Self { refraction, color }
    }

    fn refract_dir(&self, interaction: &Interaction) -> Vector3f {
        let w_in = -interaction.wo;
        let mut cos_in = -w_in.dot(&interaction.normal);
        let mut ratio = self.refraction;
        let mut normal = interaction.normal;
        if cos_in < 0.0 {
            cos_in = -cos_in;
            ratio = 1.0 / ratio;
            normal = -normal;
        }

        let cos_out2 = 1.0 - ratio * ratio * (1.0 - cos_in * cos_in);
        if cos_out2 > 0.0 {
            (ratio * w_in + (ratio * cos_in - cos_out2.sqrt()) * normal).normalize()
        } else {
            // total internal reflection
            reflect(&interaction.wo, &normal)
        }
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        let ideal = self.refract_dir(interaction);
        let diff = interaction.wi - ideal;
        if diff.dot(&diff) < REFRACTION_TOLERANCE {
            self.color
        } else {
            Vector3f::zeros()
        }
    }

    pub fn pdf(&self, interaction: &Interaction) -> Float {
        let ideal = self.refract_dir(interaction);
        let diff = interaction.wi - ideal;
        if diff.dot(&diff) < REFRACTION_TOLERANCE { 1.0 } else { 0.0 }
    }

    pub fn sample(&self, interaction: &mut Interaction) -> Float {
        interaction.wi = self.refract_dir(interaction);
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn interaction_with(normal: Vector3f, wo: Vector3f) -> Interaction {
        let mut it = Interaction::geometry(
            Vector3f::zeros(), 1.0, normal, Vector2f::new(0.0, 0.0), None);
        it.wo = wo;
        it
    }

    #[test]
    fn test_snell_refraction_on_entry() {
        let brdf = Translucent::new(0.667, Vector3f::new(1.0, 1.0, 1.0));
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.5, 0.0, 0.5).normalize();
        let mut it = interaction_with(n, wo);

        assert_eq!(brdf.sample(&mut it), 1.0);
        // sin(theta_t) = ratio * sin(theta_i)
        let sin_i = (1.0 - wo.z * wo.z).sqrt();
        let sin_t = (it.wi.x * it.wi.x + it.wi.y * it.wi.y).sqrt();
        assert!((sin_t - 0.667 * sin_i).abs() < 1e-4);
        // continues into the medium
        assert!(it.wi.z < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        let brdf = Translucent::new(0.667, Vector3f::new(1.0, 1.0, 1.0));
        let n = Vector3f::new(0.0, 0.0, 1.0);
        // leaving the medium at ~53 degrees, past the ~41.8 degree critical angle
        let wo = Vector3f::new(0.8, 0.0, -0.6);
        let mut it = interaction_with(n, wo);

        brdf.sample(&mut it);
        assert!((it.wi.x + 0.8).abs() < 1e-5);
        assert!((it.wi.y - 0.0).abs() < 1e-5);
        assert!((it.wi.z + 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_eval_consistent_with_sample() {
        let brdf = Translucent::new(0.667, Vector3f::new(0.8, 0.9, 1.0));
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.3, 0.4, 0.7).normalize();
        let mut it = interaction_with(n, wo);

        brdf.sample(&mut it);
        assert_eq!(brdf.eval(&it), Vector3f::new(0.8, 0.9, 1.0));
        assert_eq!(brdf.pdf(&it), 1.0);

        it.wi = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(brdf.eval(&it), Vector3f::zeros());
    }
}
