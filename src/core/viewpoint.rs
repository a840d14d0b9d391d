// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// Measurement point deposited by a camera pass: a diffuse hit together
/// with the path throughput that led to it and the pixel it reports to.
#[derive(Clone, Debug)]
pub struct ViewPoint {
    pub p: Vector3f,
    pub normal: Vector3f,
    pub color: Vector3f,
    pub strength: Float,
    pub x: usize,
    pub y: usize,
}

impl ViewPoint {
    pub fn new(p: Vector3f, normal: Vector3f, color: Vector3f,
               strength: Float, x: usize, y: usize) -> Self {
        Self { p, normal, color, strength, x, y }
    }
}
