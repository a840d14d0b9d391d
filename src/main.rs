// Copyright @yucwang 2026

#![allow(dead_code)]

pub extern crate nalgebra as na;

mod core;
mod emitters;
mod integrators;
mod materials;
mod math;
mod shapes;

use self::core::brdf::Brdf;
use self::core::camera::Camera;
use self::core::integrator::Integrator;
use self::core::light::Light;
use self::core::scene::Scene;
use self::integrators::path::PathIntegrator;
use self::integrators::photon::PhotonIntegrator;
use self::math::constants::{Vector2f, Vector3f};
use self::shapes::parallelogram::Parallelogram;
use self::shapes::sphere::Sphere;

use std::env;
use std::sync::Arc;

fn build_cornell_box() -> Scene {
    let red = Arc::new(Brdf::diffuse(Vector3f::new(0.63, 0.065, 0.05)));
    let green = Arc::new(Brdf::diffuse(Vector3f::new(0.14, 0.45, 0.091)));
    let white = Arc::new(Brdf::diffuse(Vector3f::new(0.725, 0.71, 0.68)));
    let mirror = Arc::new(Brdf::specular());
    let glass = Arc::new(Brdf::translucent(0.667, Vector3f::new(1.0, 1.0, 1.0)));

    let mut scene = Scene::with_lights(vec![
        Light::area(Vector3f::new(0.005, 1.98, -0.03),
                    Vector3f::new(17.0, 12.0, 4.0),
                    Vector2f::new(0.47, 0.38)),
    ]);

    // floor
    scene.add_geometry(Arc::new(Parallelogram::new(
        Vector3f::new(-1.0, 0.0, -1.0),
        Vector3f::new(2.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 2.0),
        Vector3f::new(0.0, 1.0, 0.0),
        Some(Arc::clone(&white)))));
    // ceiling
    scene.add_geometry(Arc::new(Parallelogram::new(
        Vector3f::new(-1.0, 2.0, -1.0),
        Vector3f::new(2.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 2.0),
        Vector3f::new(0.0, -1.0, 0.0),
        Some(Arc::clone(&white)))));
    // back wall
    scene.add_geometry(Arc::new(Parallelogram::new(
        Vector3f::new(-1.0, 0.0, -1.0),
        Vector3f::new(2.0, 0.0, 0.0),
        Vector3f::new(0.0, 2.0, 0.0),
        Vector3f::new(0.0, 0.0, 1.0),
        Some(white))));
    // left wall
    scene.add_geometry(Arc::new(Parallelogram::new(
        Vector3f::new(-1.0, 0.0, -1.0),
        Vector3f::new(0.0, 2.0, 0.0),
        Vector3f::new(0.0, 0.0, 2.0),
        Vector3f::new(1.0, 0.0, 0.0),
        Some(red))));
    // right wall
    scene.add_geometry(Arc::new(Parallelogram::new(
        Vector3f::new(1.0, 0.0, -1.0),
        Vector3f::new(0.0, 2.0, 0.0),
        Vector3f::new(0.0, 0.0, 2.0),
        Vector3f::new(-1.0, 0.0, 0.0),
        Some(green))));

    scene.add_geometry(Arc::new(Sphere::new(
        Vector3f::new(-0.45, 0.4, -0.3), 0.4, Some(mirror))));
    scene.add_geometry(Arc::new(Sphere::new(
        Vector3f::new(0.45, 0.35, 0.35), 0.35, Some(glass))));

    scene
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut integrator_name = String::from("photon");
    let mut output_path = String::from("output.png");
    let mut resolution: usize = 512;
    let mut spp: u32 = 1;
    let mut max_depth: u32 = 16;
    let mut rounds: u32 = 15;
    let mut photons: usize = 200_000;
    let mut seed: u64 = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--integrator" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    integrator_name = v.clone();
                }
            }
            "--output" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    output_path = v.clone();
                }
            }
            "--resolution" => {
                i += 1;
                resolution = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(512);
            }
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(1);
            }
            "--max-depth" => {
                i += 1;
                max_depth = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(16);
            }
            "--rounds" => {
                i += 1;
                rounds = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(15);
            }
            "--photons" => {
                i += 1;
                photons = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(200_000);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(0);
            }
            _ => {
                eprintln!("Usage: {} [--integrator path|photon] [--output FILE] [--resolution N] [--spp N] [--max-depth N] [--rounds N] [--photons N] [--seed N]", args[0]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut scene = build_cornell_box();
    scene.build_accel();

    let mut camera = Camera::new(Vector3f::new(0.0, 1.0, 6.8),
                                 Vector3f::new(0.0, 1.0, 0.0),
                                 Vector3f::new(0.0, 1.0, 0.0),
                                 (19.0f32).to_radians(),
                                 resolution, resolution);

    let integrator: Box<dyn Integrator> = match integrator_name.as_str() {
        "path" => Box::new(PathIntegrator::new(max_depth, spp, seed)),
        "photon" => Box::new(PhotonIntegrator::new(
            rounds, photons, 0.15, 0.8, 16, max_depth, spp, seed,
            Some(String::from("output_round")))),
        other => {
            eprintln!("unknown integrator: {}", other);
            std::process::exit(1);
        }
    };

    integrator.render(&scene, &mut camera).expect("render failed");
    camera.film().write_png(&output_path).expect("failed to write output");
}
