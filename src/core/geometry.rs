// Copyright @yucwang 2023

use crate::core::interaction::Interaction;
use crate::math::aabb::AABB;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;

pub trait Geometry: Send + Sync {
    fn intersect(&self, ray: &Ray3f) -> Option<Interaction>;
    fn bounding_box(&self) -> AABB;
    /// Constant surface normal; meaningful for planar geometry only.
    fn normal(&self) -> Vector3f {
        Vector3f::zeros()
    }
}
