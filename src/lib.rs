// Copyright @yucwang 2026

#![allow(dead_code)]

pub mod core;
pub mod emitters;
pub mod integrators;
pub mod materials;
pub mod math;
pub mod shapes;
