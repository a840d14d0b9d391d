// Copyright @yucwang 2023

use crate::core::brdf::Brdf;
use crate::math::constants::{Float, Vector2f, Vector3f};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Geometry,
    Light,
}

/// Per-hit record filled by intersection queries. `wo` points toward the
/// viewer and `wi` toward the light or the next bounce; `emission` is only
/// meaningful for Light hits and `brdf` only for Geometry hits.
#[derive(Clone)]
pub struct Interaction {
    pub kind: SurfaceKind,
    pub p: Vector3f,
    pub t: Float,
    pub normal: Vector3f,
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub uv: Vector2f,
    pub emission: Vector3f,
    pub brdf: Option<Arc<Brdf>>,
}

impl Interaction {
    pub fn geometry(p: Vector3f, t: Float, normal: Vector3f,
                    uv: Vector2f, brdf: Option<Arc<Brdf>>) -> Self {
        Self {
            kind: SurfaceKind::Geometry,
            p,
            t,
            normal,
            wi: Vector3f::zeros(),
            wo: Vector3f::zeros(),
            uv,
            emission: Vector3f::zeros(),
            brdf,
        }
    }

    pub fn light(p: Vector3f, t: Float, normal: Vector3f, emission: Vector3f) -> Self {
        Self {
            kind: SurfaceKind::Light,
            p,
            t,
            normal,
            wi: Vector3f::zeros(),
            wo: Vector3f::zeros(),
            uv: Vector2f::new(0.0, 0.0),
            emission,
            brdf: None,
        }
    }
}
