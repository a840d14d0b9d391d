// Copyright @yucwang 2021

pub mod parallelogram;
pub mod sphere;
