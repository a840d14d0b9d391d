// Copyright @yucwang 2026

use crate::core::bvh::Bvh;
use crate::core::geometry::Geometry;
use crate::core::interaction::{Interaction, SurfaceKind};
use crate::core::light::Light;
use crate::math::ray::Ray3f;
use std::sync::Arc;

/// Aggregate of geometry and emitters. Intersection queries consider both
/// and return the nearest hit purely by entry distance.
pub struct Scene {
    geometries: Vec<Arc<dyn Geometry>>,
    lights: Vec<Light>,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new() -> Self {
        Self { geometries: Vec::new(), lights: Vec::new(), bvh: None }
    }

    pub fn with_lights(lights: Vec<Light>) -> Self {
        Self { geometries: Vec::new(), lights, bvh: None }
    }

    pub fn add_geometry(&mut self, geometry: Arc<dyn Geometry>) {
        self.geometries.push(geometry);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Spatial index over geometry bounds. Optional: queries answer
    /// identically without it, only slower.
    pub fn build_accel(&mut self) {
        if self.geometries.is_empty() {
            return;
        }
        let bounds = self.geometries.iter().map(|g| g.bounding_box()).collect();
        self.bvh = Some(Bvh::new(bounds));
    }

    pub fn intersect(&self, ray: &Ray3f) -> Option<Interaction> {
        let mut nearest: Option<Interaction> = None;

        for light in &self.lights {
            if let Some(hit) = light.intersect(ray) {
                if nearest.as_ref().map_or(true, |n| hit.t < n.t) {
                    nearest = Some(hit);
                }
            }
        }

        let geometry_hit = match &self.bvh {
            Some(bvh) => bvh.intersect(ray, |prim, ray| self.geometries[prim].intersect(ray)),
            None => {
                let mut best: Option<Interaction> = None;
                for geometry in &self.geometries {
                    if let Some(hit) = geometry.intersect(ray) {
                        if best.as_ref().map_or(true, |b| hit.t < b.t) {
                            best = Some(hit);
                        }
                    }
                }
                best
            }
        };

        if let Some(hit) = geometry_hit {
            if nearest.as_ref().map_or(true, |n| hit.t < n.t) {
                nearest = Some(hit);
            }
        }

        nearest
    }

    /// True iff an opaque occluder is the nearest hit; reaching the light
    /// surface itself does not count as shadowed.
    pub fn is_shadowed(&self, ray: &Ray3f) -> bool {
        match self.intersect(ray) {
            Some(hit) => hit.kind == SurfaceKind::Geometry,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{Vector2f, Vector3f};
    use crate::shapes::parallelogram::Parallelogram;

    fn floor_at(height: f32) -> Arc<dyn Geometry> {
        Arc::new(Parallelogram::new(
            Vector3f::new(-1.0, height, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 1.0, 0.0),
            None))
    }

    fn down_ray() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 1.0, 0.0),
                   Vector3f::new(0.0, -1.0, 0.0), None, None)
    }

    #[test]
    fn test_nearest_of_overlapping_geometry() {
        let mut scene = Scene::new();
        scene.add_geometry(floor_at(0.2));
        scene.add_geometry(floor_at(0.5));

        let hit = scene.intersect(&down_ray()).expect("both planes cross the ray");
        assert!((hit.t - 0.5).abs() < 1e-5);

        // same answer through the acceleration structure
        scene.build_accel();
        let hit = scene.intersect(&down_ray()).expect("accel keeps results");
        assert!((hit.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_light_competes_by_distance() {
        let mut scene = Scene::with_lights(vec![
            Light::area(Vector3f::new(0.0, 0.8, 0.0),
                        Vector3f::new(1.0, 1.0, 1.0),
                        Vector2f::new(4.0, 4.0)),
        ]);
        scene.add_geometry(floor_at(0.2));

        // upward ray from below reaches the emitter before any geometry
        let up = Ray3f::new(Vector3f::new(0.0, 0.4, 0.0),
                            Vector3f::new(0.0, 1.0, 0.0), None, None);
        let hit = scene.intersect(&up).expect("emitter is in the way");
        assert_eq!(hit.kind, SurfaceKind::Light);
        assert!((hit.t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_is_shadowed_semantics() {
        let mut scene = Scene::with_lights(vec![
            Light::area(Vector3f::new(0.0, 2.0, 0.0),
                        Vector3f::new(1.0, 1.0, 1.0),
                        Vector2f::new(0.5, 0.5)),
        ]);

        // unoccluded shadow ray toward the light
        let toward = Ray3f::new(Vector3f::zeros(),
                                Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(!scene.is_shadowed(&toward));

        // an occluder between the point and the light, facing the ray
        scene.add_geometry(Arc::new(Parallelogram::new(
            Vector3f::new(-1.0, 1.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, -1.0, 0.0),
            None)));
        assert!(scene.is_shadowed(&toward));

        // a miss is not a shadow
        let away = Ray3f::new(Vector3f::zeros(),
                              Vector3f::new(0.0, -1.0, 0.0), None, None);
        assert!(!scene.is_shadowed(&away));
    }
}
