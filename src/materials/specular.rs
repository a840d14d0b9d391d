// Copyright @yucwang 2023

use crate::core::interaction::Interaction;
use crate::math::constants::{Float, Vector3f};
use crate::math::warp::reflect;

// Squared-difference tolerance for the mirror-direction indicator.
const MIRROR_TOLERANCE: Float = 0.1;

pub struct IdealSpecular;

impl IdealSpecular {
    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        let half = interaction.wi + interaction.wo;
        if half.norm_squared() == 0.0 {
            return Vector3f::zeros();
        }
        let diff = half.normalize() - interaction.normal;
        if diff.dot(&diff) < MIRROR_TOLERANCE {
            Vector3f::new(1.0, 1.0, 1.0)
        } else {
            Vector3f::zeros()
        }
    }

    pub fn pdf(&self, interaction: &Interaction) -> Float {
        let half = interaction.wi + interaction.wo;
        if half.norm_squared() == 0.0 {
            return 0.0;
        }
        let diff = half.normalize() - interaction.normal;
        if diff.dot(&diff) < MIRROR_TOLERANCE { 1.0 } else { 0.0 }
    }

    pub fn sample(&self, interaction: &mut Interaction) -> Float {
        interaction.wi = reflect(&interaction.wo, &interaction.normal);
        1.0
    }
}
