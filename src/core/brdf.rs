// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::core::rng::LcgRng;
use crate::core::texture::Texture;
use crate::math::constants::{Float, Vector3f};
use crate::materials::diffuse::IdealDiffuse;
use crate::materials::glossy::Glossy;
use crate::materials::specular::IdealSpecular;
use crate::materials::textured::TexturedDiffuse;
use crate::materials::translucent::Translucent;
use crate::materials::transmission::IdealTransmission;
use std::sync::Arc;

/// Closed set of reflectance models. Mesh-scale sharing goes through
/// `Arc<Brdf>`; the variants themselves are immutable parameter bundles.
pub enum Brdf {
    Diffuse(IdealDiffuse),
    Specular(IdealSpecular),
    Transmission(IdealTransmission),
    Translucent(Translucent),
    TexturedDiffuse(TexturedDiffuse),
    Glossy(Glossy),
}

impl Brdf {
    pub fn diffuse(reflectivity: Vector3f) -> Self {
        Brdf::Diffuse(IdealDiffuse::new(reflectivity))
    }

    pub fn specular() -> Self {
        Brdf::Specular(IdealSpecular::new())
    }

    pub fn transmission() -> Self {
        Brdf::Transmission(IdealTransmission::new())
    }

    pub fn translucent(refraction: Float, color: Vector3f) -> Self {
        Brdf::Translucent(Translucent::new(refraction, color))
    }

    pub fn textured_diffuse(texture: Arc<Texture>, shininess: Float) -> Self {
        Brdf::TexturedDiffuse(TexturedDiffuse::new(texture, shininess))
    }

    pub fn glossy(alpha: Float) -> Self {
        Brdf::Glossy(Glossy::new(alpha))
    }

    /// Reflectance for the (wi, wo) pair already stored in the interaction.
    pub fn eval(&self, interaction: &Interaction) -> Vector3f {
        match self {
            Brdf::Diffuse(m) => m.eval(interaction),
            Brdf::Specular(m) => m.eval(interaction),
            Brdf::Transmission(m) => m.eval(interaction),
            Brdf::Translucent(m) => m.eval(interaction),
            Brdf::TexturedDiffuse(m) => m.eval(interaction),
            Brdf::Glossy(m) => m.eval(interaction),
        }
    }

    /// Density of the stored `wi` given `wo`. For delta variants this is an
    /// indicator mirroring `eval`, not a density; callers must not divide
    /// by it for Monte-Carlo weighting.
    pub fn pdf(&self, interaction: &Interaction) -> Float {
        match self {
            Brdf::Diffuse(m) => m.pdf(interaction),
            Brdf::Specular(m) => m.pdf(interaction),
            Brdf::Transmission(m) => m.pdf(interaction),
            Brdf::Translucent(m) => m.pdf(interaction),
            Brdf::TexturedDiffuse(m) => m.pdf(interaction),
            Brdf::Glossy(m) => m.pdf(interaction),
        }
    }

    /// Draws a new `wi`, writes it into the interaction and returns its
    /// density (1 for the deterministic delta variants, 0 when degenerate).
    pub fn sample(&self, interaction: &mut Interaction, rng: &mut LcgRng) -> Float {
        match self {
            Brdf::Diffuse(m) => m.sample(interaction, rng),
            Brdf::Specular(m) => m.sample(interaction),
            Brdf::Transmission(m) => m.sample(interaction),
            Brdf::Translucent(m) => m.sample(interaction),
            Brdf::TexturedDiffuse(m) => m.sample(interaction, rng),
            Brdf::Glossy(m) => m.sample(interaction, rng),
        }
    }

    /// True when the support is a zero-measure set of directions; such
    /// variants are excluded from next-event estimation.
    pub fn is_delta(&self) -> bool {
        match self {
            Brdf::Diffuse(_) | Brdf::TexturedDiffuse(_) | Brdf::Glossy(_) => false,
            Brdf::Specular(_) | Brdf::Transmission(_) | Brdf::Translucent(_) => true,
        }
    }

    /// Diffuse terminals for the photon-mapping passes: view points are
    /// recorded and photon density is deposited only on these variants.
    pub fn is_diffuse(&self) -> bool {
        matches!(self, Brdf::Diffuse(_) | Brdf::TexturedDiffuse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn dummy_interaction() -> Interaction {
        let mut it = Interaction::geometry(
            Vector3f::zeros(), 1.0,
            Vector3f::new(0.0, 0.0, 1.0),
            Vector2f::new(0.0, 0.0), None);
        it.wo = Vector3f::new(0.0, 0.0, 1.0);
        it.wi = Vector3f::new(0.0, 0.0, 1.0);
        it
    }

    #[test]
    fn test_is_delta_is_pure_per_variant() {
        let variants = vec![
            (Brdf::diffuse(Vector3f::new(0.5, 0.5, 0.5)), false),
            (Brdf::specular(), true),
            (Brdf::transmission(), true),
            (Brdf::translucent(0.667, Vector3f::new(1.0, 1.0, 1.0)), true),
            (Brdf::glossy(16.0), false),
        ];
        for (brdf, expected) in &variants {
            assert_eq!(brdf.is_delta(), *expected);
            // independent of any interaction state
            let _ = dummy_interaction();
            assert_eq!(brdf.is_delta(), *expected);
        }
    }

    #[test]
    fn test_diffuse_terminal_set() {
        assert!(Brdf::diffuse(Vector3f::zeros()).is_diffuse());
        assert!(!Brdf::specular().is_diffuse());
        assert!(!Brdf::glossy(4.0).is_diffuse());
        assert!(!Brdf::translucent(0.667, Vector3f::zeros()).is_diffuse());
    }
}
