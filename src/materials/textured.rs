// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::core::texture::Texture;
use crate::math::constants::{Float, INV_PI, Vector3f};
use crate::math::warp::sample_cosine_lobe;
use std::sync::Arc;

/// Diffuse reflectance modulated by a nearest-sampled image texture.
/// Sampling is identical to the plain diffuse variant.
pub struct TexturedDiffuse {
    texture: Arc<Texture>,
    shininess: Float,
}

impl TexturedDiffuse {
    pub fn new(texture: Arc<Texture>, shininess: Float) -> Self {
        Self { texture, shininess }
    }

    pub fn shininess(&self) -> Float {
        self.shininess
    }

    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        if interaction.wo.dot(&interaction.normal) < 0.0 {
            return Vector3f::zeros();
        }
        // V axis is flipped; stored texels are raw 0..255 channel values.
        let raw = self.texture.sample(interaction.uv.x, 1.0 - interaction.uv.y);
        raw / 255.0
    }

    pub fn pdf(&self, interaction: &Interaction) -> Float {
        interaction.normal.dot(&interaction.wi) * INV_PI
    }

    pub fn sample(&self, interaction: &mut Interaction, rng: &mut LcgRng) -> Float {
        interaction.wi = sample_cosine_lobe(&interaction.normal, rng);
        0.5 * INV_PI
    }
}
