// Copyright @yucwang 2026

use crate::core::camera::Camera;
use crate::core::integrator::Integrator;
use crate::core::interaction::{Interaction, SurfaceKind};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Rotation2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

const BLOCK_SIZE: usize = 32;
const GRID_ROTATION_DEGREES: Float = 40.0;

/// Unidirectional path tracer with next event estimation. Each primary
/// sample shoots a fixed 3x3 sub-pixel grid rotated off-axis to break up
/// aliasing along screen-aligned edges.
pub struct PathIntegrator {
    max_depth: u32,
    spp: u32,
    seed: u64,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, spp: u32, seed: u64) -> Self {
        Self { max_depth, spp, seed }
    }

    fn subpixel_grid() -> [Vector2f; 9] {
        let rot = Rotation2::new(GRID_ROTATION_DEGREES.to_radians());
        let mut grid = [Vector2f::zeros(); 9];
        let offsets = [-0.333, 0.0, 0.333];
        let mut index = 0;
        for &dx in offsets.iter() {
            for &dy in offsets.iter() {
                grid[index] = rot * Vector2f::new(dx, dy);
                index += 1;
            }
        }
        grid
    }

    fn direct_lighting(&self, scene: &Scene, it: &mut Interaction,
                       rng: &mut LcgRng) -> Vector3f {
        let mut direct = Vector3f::zeros();
        let brdf = match it.brdf.clone() {
            Some(brdf) => brdf,
            None => return direct,
        };

        for light in scene.lights() {
            let (light_pos, pdf_area) = light.sample(it, rng);
            if pdf_area <= 0.0 {
                continue;
            }
            let to_light = light_pos - it.p;
            let distance2 = to_light.norm_squared();
            if distance2 <= 0.0 {
                continue;
            }
            it.wi = to_light.normalize();

            let shadow_ray = Ray3f::new(it.p + EPSILON * it.normal, it.wi, None, None);
            if scene.is_shadowed(&shadow_ray) {
                continue;
            }

            // the light pdf folds the cosine-over-distance-squared
            // conversion from area measure to solid angle
            let emission = light.emission(light_pos, it.wi);
            let contribution = brdf.eval(it).component_mul(&emission)
                * it.normal.dot(&it.wi)
                * light.pdf(it, light_pos)
                / pdf_area;
            if contribution.x > 0.0 && contribution.y > 0.0 && contribution.z > 0.0 {
                direct += contribution;
            }
        }
        direct
    }
}

impl Integrator for PathIntegrator {
    fn render(&self, scene: &Scene, camera: &mut Camera) -> Result<(), String> {
        let (width, height) = (camera.width(), camera.height());
        if width == 0 || height == 0 {
            return Err(String::from("camera has an empty film"));
        }
        let spp = self.spp.max(1);
        let inv_spp = 1.0 / (spp as Float);
        let grid = Self::subpixel_grid();

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;
        let camera_ref: &Camera = camera;

        log::info!("path tracing {}x{} at {} spp, depth {}",
                   width, height, spp, self.max_depth);
        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut output = vec![Vector3f::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                let grid = &grid;
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * BLOCK_SIZE;
                        let y0 = by * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        let mut block = vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let seed = ((self.seed & 0xFFF) << 32)
                                    | (((y as u64) & 0xFFFF) << 16)
                                    | ((x as u64) & 0xFFFF);
                                let mut rng = LcgRng::new(seed);
                                let mut color = Vector3f::zeros();
                                for _sample in 0..spp {
                                    let mut grid_sum = Vector3f::zeros();
                                    for offset in grid.iter() {
                                        let ray = camera_ref.generate_ray(
                                            x as Float + offset.x,
                                            y as Float + offset.y);
                                        grid_sum += self.radiance(scene, &ray, &mut rng);
                                    }
                                    color += grid_sum / 9.0;
                                }
                                block[(x - x0) + (x1 - x0) * (y - y0)] = color * inv_spp;
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            output[x + width * y] = block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        let film = camera.film_mut();
        for y in 0..height {
            for x in 0..width {
                film[(x, y)] = output[x + width * y];
            }
        }
        Ok(())
    }

    fn radiance(&self, scene: &Scene, ray: &Ray3f, rng: &mut LcgRng) -> Vector3f {
        let mut radiance = Vector3f::zeros();
        let mut beta = Vector3f::new(1.0, 1.0, 1.0);
        let mut ray = Ray3f::new(ray.origin(), ray.dir(), None, None);

        for _bounce in 0..self.max_depth {
            let mut it = match scene.intersect(&ray) {
                Some(it) => it,
                None => break,
            };

            if it.kind == SurfaceKind::Light {
                // emitters are path terminals, no scattering off them
                radiance += beta.component_mul(&it.emission);
                break;
            }

            it.wo = -ray.dir();
            let brdf = match it.brdf.clone() {
                Some(brdf) => brdf,
                None => break,
            };

            if !brdf.is_delta() {
                radiance += beta.component_mul(&self.direct_lighting(scene, &mut it, rng));
            }

            let pdf = brdf.sample(&mut it, rng);
            if pdf == 0.0 {
                break;
            }
            // importance sampling is arranged so that eval already carries
            // the pdf cancellation, so beta never divides by pdf
            beta = beta.component_mul(&brdf.eval(&it));
            ray = Ray3f::new(it.p + EPSILON * it.wi, it.wi, None, None);
        }

        radiance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::brdf::Brdf;
    use crate::core::light::Light;
    use crate::shapes::parallelogram::Parallelogram;
    use crate::math::constants::PI;

    #[test]
    fn test_subpixel_grid_is_rotated() {
        let grid = PathIntegrator::subpixel_grid();
        assert!((grid[4].norm() - 0.0).abs() < 1e-6);
        // corners keep their distance under rotation but leave the axes
        assert!((grid[0].norm() - (2.0f32).sqrt() * 0.333).abs() < 1e-4);
        assert!(grid[1].y.abs() > 1e-3);
    }

    #[test]
    fn test_radiance_of_directly_visible_light() {
        let scene = Scene::with_lights(vec![
            Light::area(Vector3f::new(0.0, 2.0, 0.0),
                        Vector3f::new(3.0, 2.0, 1.0),
                        Vector2f::new(1.0, 1.0)),
        ]);
        let integrator = PathIntegrator::new(4, 1, 0);
        let mut rng = LcgRng::new(1);

        let ray = Ray3f::new(Vector3f::zeros(),
                             Vector3f::new(0.0, 1.0, 0.0), None, None);
        let radiance = integrator.radiance(&scene, &ray, &mut rng);
        assert!((radiance - Vector3f::new(3.0, 2.0, 1.0)).norm() < 1e-5);

        // a ray that never reaches the light carries nothing
        let miss = Ray3f::new(Vector3f::zeros(),
                              Vector3f::new(0.0, -1.0, 0.0), None, None);
        assert!(integrator.radiance(&scene, &miss, &mut rng).norm() < 1e-6);
    }

    #[test]
    fn test_direct_lighting_matches_analytic_value() {
        // a tiny light high above a diffuse floor behaves like a point
        // source: L = rho/pi * Le * A * cos^2(theta) / d^2, and with the
        // light straight overhead cos(theta) = 1
        let light_height = 1.98;
        let light_size = 0.01;
        let le = 10.0;
        let rho = 0.5;

        let mut scene = Scene::with_lights(vec![
            Light::area(Vector3f::new(0.0, light_height, 0.0),
                        Vector3f::new(le, le, le),
                        Vector2f::new(light_size, light_size)),
        ]);
        let brdf = Arc::new(Brdf::diffuse(Vector3f::new(rho, rho, rho)));
        scene.add_geometry(Arc::new(Parallelogram::new(
            Vector3f::new(-2.0, 0.0, -2.0),
            Vector3f::new(4.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 4.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Some(brdf))));

        let integrator = PathIntegrator::new(1, 1, 0);
        let mut rng = LcgRng::new(7);
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0),
                             Vector3f::new(0.0, -1.0, 0.0), None, None);

        let mut mean = Vector3f::zeros();
        let trials = 64;
        for _ in 0..trials {
            mean += integrator.radiance(&scene, &ray, &mut rng);
        }
        mean /= trials as Float;

        let area = light_size * light_size;
        let expected = rho / PI * le * area / (light_height * light_height);
        assert!((mean.x - expected).abs() < expected * 0.01);
        assert!((mean.y - expected).abs() < expected * 0.01);
    }

    #[test]
    fn test_depth_one_skips_indirect_light() {
        // with max_depth = 1 a ray that has to bounce once before seeing
        // the emitter contributes nothing beyond next event estimation
        let mut scene = Scene::with_lights(vec![
            Light::area(Vector3f::new(0.0, 4.0, 10.0),
                        Vector3f::new(1.0, 1.0, 1.0),
                        Vector2f::new(0.5, 0.5)),
        ]);
        let brdf = Arc::new(Brdf::specular());
        scene.add_geometry(Arc::new(Parallelogram::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Some(brdf))));

        let shallow = PathIntegrator::new(1, 1, 0);
        let mut rng = LcgRng::new(3);
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0),
                             Vector3f::new(0.0, -1.0, 0.0), None, None);
        assert!(shallow.radiance(&scene, &ray, &mut rng).norm() < 1e-6);
    }
}
