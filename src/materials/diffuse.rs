// Copyright @yucwang 2023

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, INV_PI, Vector3f};
use crate::math::warp::sample_cosine_lobe;

pub struct IdealDiffuse {
    reflectivity: Vector3f,
}

impl IdealDiffuse {
    pub fn new(reflectivity: Vector3f) -> Self {
        Self { reflectivity }
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        if interaction.wo.dot(&interaction.normal) < 0.0 {
            return Vector3f::zeros();
        }
        self.reflectivity * INV_PI
    }

    // Constant, not the cosine density implied by sample(): the path
    // throughput update multiplies by eval() only and never divides by this.
    pub fn pdf(&self, _interaction: &Interaction) -> Float {
        0.5 * INV_PI
    }

    pub fn sample(&self, interaction: &mut Interaction, rng: &mut LcgRng) -> Float {
        interaction.wi = sample_cosine_lobe(&interaction.normal, rng);
        0.5 * INV_PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;
    use crate::math::constants::PI;

    fn interaction_with(normal: Vector3f, wo: Vector3f, wi: Vector3f) -> Interaction {
        let mut it = Interaction::geometry(
            Vector3f::zeros(), 1.0, normal, Vector2f::new(0.0, 0.0), None);
        it.wo = wo;
        it.wi = wi;
        it
    }

    #[test]
    fn test_eval_uniform_over_wi() {
        let brdf = IdealDiffuse::new(Vector3f::new(0.7, 0.2, 0.1));
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.0, 0.3, 1.0).normalize();

        let a = brdf.eval(&interaction_with(n, wo, Vector3f::new(0.0, 0.0, 1.0)));
        let b = brdf.eval(&interaction_with(n, wo, Vector3f::new(0.9, 0.1, 0.3).normalize()));
        assert_eq!(a, b);
        assert!((a.x - 0.7 / PI).abs() < 1e-6);
        assert!(a.x >= 0.0 && a.y >= 0.0 && a.z >= 0.0);
    }

    #[test]
    fn test_eval_zero_on_back_hemisphere() {
        let brdf = IdealDiffuse::new(Vector3f::new(0.7, 0.2, 0.1));
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.0, 0.0, -1.0);
        let value = brdf.eval(&interaction_with(n, wo, Vector3f::new(0.0, 0.0, 1.0)));
        assert_eq!(value, Vector3f::zeros());
    }

    #[test]
    fn test_sample_stays_above_surface() {
        let brdf = IdealDiffuse::new(Vector3f::new(0.5, 0.5, 0.5));
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let mut rng = LcgRng::new(17);
        for _ in 0..128 {
            let mut it = interaction_with(n, n, Vector3f::zeros());
            let pdf = brdf.sample(&mut it, &mut rng);
            assert!(pdf > 0.0);
            assert!(it.wi.dot(&n) >= -1e-5);
            assert!((it.wi.norm() - 1.0).abs() < 1e-4);
        }
    }
}
