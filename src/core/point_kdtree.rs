// Copyright @yucwang 2026

use crate::core::viewpoint::ViewPoint;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};

const MAX_LEAF_SIZE: usize = 8;

struct KdNode {
    bounds: AABB,
    // leaves carry a non-empty range, interior nodes carry children
    start: usize,
    count: usize,
    left: usize,
    right: usize,
}

impl KdNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds, start, count, left: 0, right: 0 }
    }

    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self { bounds, start: 0, count: 0, left, right }
    }

    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Spatial index over view points answering fixed-radius ball queries.
/// Built once per photon round, queried from many threads.
pub struct PointKdTree {
    points: Vec<ViewPoint>,
    nodes: Vec<KdNode>,
    root: usize,
}

impl PointKdTree {
    pub fn new(points: Vec<ViewPoint>) -> Self {
        let mut tree = Self { points, nodes: Vec::new(), root: 0 };
        if !tree.points.is_empty() {
            let count = tree.points.len();
            tree.root = tree.build(0, count);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every view point within `radius` of `center`.
    pub fn search(&self, center: &Vector3f, radius: Float) -> Vec<&ViewPoint> {
        let mut found = Vec::new();
        if self.points.is_empty() {
            return found;
        }

        let radius2 = radius * radius;
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.bounds.distance2_to_point(center) > radius2 {
                continue;
            }
            if node.is_leaf() {
                for point in &self.points[node.start..node.start + node.count] {
                    if (point.p - center).norm_squared() <= radius2 {
                        found.push(point);
                    }
                }
            } else {
                stack.push(node.left);
                stack.push(node.right);
            }
        }
        found
    }

    fn build(&mut self, start: usize, end: usize) -> usize {
        let mut bounds = AABB::default();
        for point in &self.points[start..end] {
            bounds.expand_by_point(&point.p);
        }

        let count = end - start;
        if count <= MAX_LEAF_SIZE {
            self.nodes.push(KdNode::leaf(bounds, start, count));
            return self.nodes.len() - 1;
        }

        let extent = bounds.extent();
        let axis = if extent.x > extent.y && extent.x > extent.z {
            0
        } else if extent.y > extent.z {
            1
        } else {
            2
        };

        // median split keeps the tree balanced under clumped inputs
        let mid = start + count / 2;
        self.points[start..end].sort_unstable_by(|a, b| {
            a.p[axis].partial_cmp(&b.p[axis]).unwrap_or(std::cmp::Ordering::Equal)
        });

        let left = self.build(start, mid);
        let right = self.build(mid, end);
        self.nodes.push(KdNode::interior(bounds, left, right));
        self.nodes.len() - 1
    }
}
