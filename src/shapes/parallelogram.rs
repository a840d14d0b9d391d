// Copyright @yucwang 2026

use crate::core::brdf::Brdf;
use crate::core::geometry::Geometry;
use crate::core::interaction::Interaction;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use std::sync::Arc;

/// One-sided planar patch spanned by two edges. Rays arriving from behind
/// the stated normal pass through.
pub struct Parallelogram {
    origin: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    brdf: Option<Arc<Brdf>>,
}

impl Parallelogram {
    pub fn new(origin: Vector3f, edge_u: Vector3f, edge_v: Vector3f,
               normal: Vector3f, brdf: Option<Arc<Brdf>>) -> Self {
        Self { origin, edge_u, edge_v, normal: normal.normalize(), brdf }
    }

    pub fn point_at(&self, u: Float, v: Float) -> Vector3f {
        self.origin + u * self.edge_u + v * self.edge_v
    }

    pub fn area(&self) -> Float {
        self.edge_u.cross(&self.edge_v).norm()
    }
}

impl Geometry for Parallelogram {
    fn intersect(&self, ray: &Ray3f) -> Option<Interaction> {
        let denom = ray.dir().dot(&self.normal);
        if denom >= -EPSILON {
            // grazing or back-facing
            return None;
        }

        let t = (self.origin - ray.origin()).dot(&self.normal) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        // project onto the (possibly non-orthogonal) edge basis
        let q = ray.at(t) - self.origin;
        let uu = self.edge_u.dot(&self.edge_u);
        let vv = self.edge_v.dot(&self.edge_v);
        let uv = self.edge_u.dot(&self.edge_v);
        let qu = q.dot(&self.edge_u);
        let qv = q.dot(&self.edge_v);
        let det = uu * vv - uv * uv;
        if det.abs() < 1e-12 {
            return None;
        }
        let u = (qu * vv - qv * uv) / det;
        let v = (qv * uu - qu * uv) / det;
        if u < 0.0 || u > 1.0 || v < 0.0 || v > 1.0 {
            return None;
        }

        Some(Interaction::geometry(
            ray.at(t), t, self.normal, Vector2f::new(u, v), self.brdf.clone()))
    }

    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::default();
        bbox.expand_by_point(&self.origin);
        bbox.expand_by_point(&(self.origin + self.edge_u));
        bbox.expand_by_point(&(self.origin + self.edge_v));
        bbox.expand_by_point(&(self.origin + self.edge_u + self.edge_v));
        bbox
    }

    fn normal(&self) -> Vector3f {
        self.normal
    }
}
