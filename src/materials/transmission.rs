// Copyright @yucwang 2023

use crate::core::interaction::Interaction;
use crate::math::constants::{Float, Vector3f};

// Squared-difference tolerance for the straight-through indicator.
const PASS_THROUGH_TOLERANCE: Float = 1e-5;

pub struct IdealTransmission;

impl IdealTransmission {
    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        let diff = interaction.wi + interaction.wo;
        if diff.dot(&diff) < PASS_THROUGH_TOLERANCE {
            Vector3f::new(1.0, 1.0, 1.0)
        } else {
            Vector3f::zeros()
        }
    }

    pub fn pdf(&self, interaction: &Interaction) -> Float {
        let diff = interaction.wi + interaction.wo;
        if diff.dot(&diff) < PASS_THROUGH_TOLERANCE { 1.0 } else { 0.0 }
    }

    pub fn sample(&self, interaction: &mut Interaction) -> Float {
        interaction.wi = -interaction.wo;
        1.0
    }
}
