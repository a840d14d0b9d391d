// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, PI, Vector3f};
use crate::math::warp::{reflect, sample_power_cosine_lobe};

/// Phong-like power-cosine lobe around the ideal mirror direction.
pub struct Glossy {
    alpha: Float,
}

impl Glossy {
    pub fn new(alpha: Float) -> Self {
        Self { alpha }
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        if interaction.normal.dot(&interaction.wi) < 0.0 {
            return Vector3f::zeros();
        }
        let ideal = reflect(&interaction.wo, &interaction.normal);
        let cos_lobe = ideal.dot(&interaction.wi).max(0.0);
        cos_lobe.powf(self.alpha) * Vector3f::new(1.0, 1.0, 1.0)
    }

    pub fn pdf(&self, interaction: &Interaction) -> Float {
        if interaction.normal.dot(&interaction.wi) < 0.0 {
            return 0.0;
        }
        let ideal = reflect(&interaction.wo, &interaction.normal);
        let cos_lobe = ideal.dot(&interaction.wi).max(0.0);
        cos_lobe.powf(self.alpha) * (self.alpha + 1.0) / (2.0 * PI)
    }

    pub fn sample(&self, interaction: &mut Interaction, rng: &mut LcgRng) -> Float {
        let ideal = reflect(&interaction.wo, &interaction.normal);
        let wi = sample_power_cosine_lobe(&ideal, self.alpha, rng);
        if interaction.normal.dot(&wi) < 0.0 {
            // lobe leaked below the surface, degenerate sample
            interaction.wi = wi;
            return 0.0;
        }
        interaction.wi = wi.normalize();
        ideal.dot(&interaction.wi).max(0.0).powf(self.alpha) * (self.alpha + 1.0) / (2.0 * PI)
    }
}
