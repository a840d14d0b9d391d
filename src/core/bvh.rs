// Copyright @yucwang 2026

use crate::core::interaction::Interaction;
use crate::math::aabb::AABB;
use crate::math::constants::FLOAT_MAX;
use crate::math::ray::Ray3f;

const MAX_LEAF_SIZE: usize = 4;

#[derive(Clone)]
struct BvhNode {
    bounds: AABB,
    left: Option<usize>,
    right: Option<usize>,
    start: usize,
    count: usize,
}

impl BvhNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds, left: None, right: None, start, count }
    }

    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self { bounds, left: Some(left), right: Some(right), start: 0, count: 0 }
    }

    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Bounding-volume hierarchy over opaque primitives; intersection is
/// delegated to a callback so the structure stays independent of the
/// geometry representation.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<usize>,
    prim_bounds: Vec<AABB>,
}

impl Bvh {
    pub fn new(prim_bounds: Vec<AABB>) -> Self {
        let mut bvh = Self {
            indices: (0..prim_bounds.len()).collect(),
            nodes: Vec::new(),
            prim_bounds,
        };
        if !bvh.indices.is_empty() {
            let end = bvh.indices.len();
            bvh.build(0, end);
        }
        bvh
    }

    /// Closest hit reported by the callback, or None.
    pub fn intersect<F>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<Interaction>
    where
        F: FnMut(usize, &Ray3f) -> Option<Interaction>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<Interaction> = None;
        let mut closest_t = FLOAT_MAX;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            let range = match node.bounds.ray_intersect_range(ray) {
                Some(r) => r,
                None => continue,
            };
            if range.0 > closest_t {
                continue;
            }

            if node.is_leaf() {
                for i in node.start..(node.start + node.count) {
                    let prim = self.indices[i];
                    if let Some(hit) = hit_fn(prim, ray) {
                        if hit.t < closest_t {
                            closest_t = hit.t;
                            closest = Some(hit);
                        }
                    }
                }
            } else {
                if let Some(left) = node.left {
                    stack.push(left);
                }
                if let Some(right) = node.right {
                    stack.push(right);
                }
            }
        }

        closest
    }

    fn range_bounds(&self, start: usize, end: usize) -> (AABB, AABB) {
        let mut bounds = AABB::default();
        let mut centroid_bounds = AABB::default();
        for idx in &self.indices[start..end] {
            bounds.expand_by_aabb(&self.prim_bounds[*idx]);
            centroid_bounds.expand_by_point(&self.prim_bounds[*idx].center());
        }
        (bounds, centroid_bounds)
    }

    fn build(&mut self, start: usize, end: usize) -> usize {
        let (bounds, centroid_bounds) = self.range_bounds(start, end);
        let count = end - start;
        if count <= MAX_LEAF_SIZE {
            self.nodes.push(BvhNode::leaf(bounds, start, count));
            return self.nodes.len() - 1;
        }

        let extent = centroid_bounds.extent();
        let mut axis = 0;
        if extent.y > extent[axis] {
            axis = 1;
        }
        if extent.z > extent[axis] {
            axis = 2;
        }

        let midpoint = centroid_bounds.center()[axis];
        let mut split = start;
        for i in start..end {
            if self.prim_bounds[self.indices[i]].center()[axis] < midpoint {
                self.indices.swap(i, split);
                split += 1;
            }
        }

        // degenerate centroid spread, fall back to an even split
        if split == start || split == end {
            let prim_bounds = &self.prim_bounds;
            self.indices[start..end].sort_unstable_by(|a, b| {
                prim_bounds[*a].center()[axis]
                    .partial_cmp(&prim_bounds[*b].center()[axis])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            split = start + count / 2;
        }

        let placeholder = self.nodes.len();
        self.nodes.push(BvhNode::leaf(bounds, 0, 0));
        let left = self.build(start, split);
        let right = self.build(split, end);
        self.nodes[placeholder] = BvhNode::interior(bounds, left, right);
        placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    fn unit_box_at(x: f32) -> AABB {
        AABB::new(Vector3f::new(x - 0.5, -0.5, -0.5),
                  Vector3f::new(x + 0.5, 0.5, 0.5))
    }

    #[test]
    fn test_bvh_finds_nearest_box() {
        let bounds: Vec<AABB> = (0..8).map(|i| unit_box_at(i as f32 * 2.0)).collect();
        let bvh = Bvh::new(bounds.clone());

        let ray = Ray3f::new(Vector3f::new(-5.0, 0.0, 0.0),
                             Vector3f::new(1.0, 0.0, 0.0), None, None);
        let hit = bvh.intersect(&ray, |prim, ray| {
            let (t0, _) = bounds[prim].ray_intersect_range(ray)?;
            Some(Interaction::geometry(
                ray.at(t0), t0,
                Vector3f::new(-1.0, 0.0, 0.0),
                nalgebra::Vector2::new(0.0, 0.0), None))
        });

        let hit = hit.expect("ray crosses every box");
        // nearest is the box at x = 0 whose near face sits at x = -0.5
        assert!((hit.t - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = Bvh::new(Vec::new());
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(bvh.intersect(&ray, |_, _| None).is_none());
    }
}
