// Copyright @yucwang 2021

pub mod diffuse;
pub mod glossy;
pub mod specular;
pub mod textured;
pub mod translucent;
pub mod transmission;
