// Copyright @yucwang 2026

use crate::core::brdf::Brdf;
use crate::core::geometry::Geometry;
use crate::core::interaction::Interaction;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
    brdf: Option<Arc<Brdf>>,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float, brdf: Option<Arc<Brdf>>) -> Self {
        Self { center, radius, brdf }
    }
}

impl Geometry for Sphere {
    fn intersect(&self, ray: &Ray3f) -> Option<Interaction> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.norm_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let mut t = -b - sqrt_disc;
        if !ray.test_segment(t) {
            t = -b + sqrt_disc;
            if !ray.test_segment(t) {
                return None;
            }
        }

        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        let uv = Vector2f::new(
            0.5 + normal.z.atan2(normal.x) / (2.0 * PI),
            0.5 - normal.y.asin() / PI,
        );
        Some(Interaction::geometry(p, t, normal, uv, self.brdf.clone()))
    }

    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }
}
