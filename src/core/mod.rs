// Copyright @yucwang 2026

pub mod brdf;
pub mod bvh;
pub mod camera;
pub mod geometry;
pub mod integrator;
pub mod interaction;
pub mod light;
pub mod point_kdtree;
pub mod rng;
pub mod scene;
pub mod texture;
pub mod viewpoint;
