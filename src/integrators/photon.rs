// Copyright @yucwang 2026

use crate::core::camera::Camera;
use crate::core::integrator::Integrator;
use crate::core::interaction::SurfaceKind;
use crate::core::point_kdtree::PointKdTree;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::viewpoint::ViewPoint;
use crate::math::constants::{EPSILON, Float, PI, Vector3f};
use crate::math::ray::Ray3f;

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

const BLOCK_SIZE: usize = 32;
const PHOTON_CHUNK: usize = 4096;

/// Progressive photon mapping. Every round runs a camera pass that drops
/// view points on diffuse surfaces, then a photon pass that splats light
/// energy onto the view points within a shrinking search radius.
pub struct PhotonIntegrator {
    render_round: u32,
    photon_num: usize,
    initial_radius: Float,
    re_decay: Float,
    bounce_max_depth: u32,
    max_depth: u32,
    spp: u32,
    seed: u64,
    /// When set, a snapshot named `<prefix><round>.png` is written after
    /// every round for progressive inspection.
    snapshot_prefix: Option<String>,
}

impl Default for PhotonIntegrator {
    fn default() -> Self {
        Self::new(15, 200_000, 0.15, 0.8, 16, 16, 1, 0, Some(String::from("output_round")))
    }
}

impl PhotonIntegrator {
    pub fn new(render_round: u32, photon_num: usize, initial_radius: Float,
               re_decay: Float, bounce_max_depth: u32, max_depth: u32,
               spp: u32, seed: u64, snapshot_prefix: Option<String>) -> Self {
        Self {
            render_round,
            photon_num,
            initial_radius,
            re_decay,
            bounce_max_depth,
            max_depth,
            spp,
            seed,
            snapshot_prefix,
        }
    }

    /// First-round photon energy, chosen so the geometric series of
    /// decayed per-round energies sums to one.
    fn initial_energy(decay: Float, rounds: u32) -> Float {
        (1.0 - decay) / (1.0 - decay.powi(rounds as i32))
    }

    /// Camera pass. Walks non-diffuse bounces, deposits a view point at
    /// the first diffuse hit, and returns any radiance seen directly on
    /// an emitter.
    fn ray_trace(&self, scene: &Scene, ray: &Ray3f, strength: Float,
                 x: usize, y: usize, depth: u32, color: Vector3f,
                 rng: &mut LcgRng, view_points: &Mutex<Vec<ViewPoint>>) -> Vector3f {
        if depth >= self.bounce_max_depth {
            return Vector3f::zeros();
        }

        let mut it = match scene.intersect(ray) {
            Some(it) => it,
            None => return Vector3f::zeros(),
        };

        if it.kind == SurfaceKind::Light {
            return it.emission.component_mul(&color) * strength;
        }

        it.wo = -ray.dir();
        let brdf = match it.brdf.clone() {
            Some(brdf) => brdf,
            None => return Vector3f::zeros(),
        };

        if brdf.is_diffuse() {
            let point = ViewPoint::new(it.p, it.normal,
                                       color.component_mul(&brdf.eval(&it)),
                                       strength, x, y);
            match view_points.lock() {
                Ok(mut points) => points.push(point),
                Err(poisoned) => poisoned.into_inner().push(point),
            }
            return Vector3f::zeros();
        }

        brdf.sample(&mut it, rng);
        let next = Ray3f::new(it.p + EPSILON * it.wi, it.wi, None, None);
        let color = color.component_mul(&brdf.eval(&it));
        self.ray_trace(scene, &next, strength, x, y, depth + 1, color, rng, view_points)
    }

    /// Photon pass. Carries `radi` through non-diffuse bounces; at each
    /// diffuse hit splats a disk-kernel density estimate onto the nearby
    /// view points, then keeps bouncing diffusely.
    fn photon_trace(&self, scene: &Scene, ray: &Ray3f, depth: u32,
                    radi: Vector3f, radius: Float, tree: &PointKdTree,
                    buffer: &Mutex<Vec<Vector3f>>, width: usize,
                    rng: &mut LcgRng) {
        if depth > self.max_depth {
            return;
        }

        let mut it = match scene.intersect(ray) {
            Some(it) if it.kind == SurfaceKind::Geometry => it,
            _ => return,
        };

        it.wo = -ray.dir();
        let brdf = match it.brdf.clone() {
            Some(brdf) => brdf,
            None => return,
        };

        if !brdf.is_diffuse() {
            brdf.sample(&mut it, rng);
            let next = Ray3f::new(it.p + EPSILON * it.wi, it.wi, None, None);
            let radi = brdf.eval(&it).component_mul(&radi).sup(&Vector3f::zeros());
            self.photon_trace(scene, &next, depth + 1, radi, radius, tree, buffer, width, rng);
            return;
        }

        let inv_kernel_area = 1.0 / (PI * radius * radius);
        let nearby = tree.search(&it.p, radius);
        if !nearby.is_empty() {
            let mut pixels = match buffer.lock() {
                Ok(pixels) => pixels,
                Err(poisoned) => poisoned.into_inner(),
            };
            for point in nearby {
                // only view points facing the photon receive energy
                if point.normal.dot(&ray.dir()) < 0.0 {
                    let res = point.color.component_mul(&radi).sup(&Vector3f::zeros())
                        * inv_kernel_area * point.strength;
                    pixels[point.x + width * point.y] += res;
                }
            }
        }

        brdf.sample(&mut it, rng);
        let next = Ray3f::new(it.p + EPSILON * it.wi, it.wi, None, None);
        // the extra pi undoes the diffuse brdf's 1/pi normalization under
        // the photon-density convention
        let radi = brdf.eval(&it).component_mul(&radi).sup(&Vector3f::zeros()) * PI;
        self.photon_trace(scene, &next, depth + 1, radi, radius, tree, buffer, width, rng);
    }

    /// Pass A over all pixels: returns the per-pixel direct-emitter
    /// radiance and the complete view point collection for this round.
    fn trace_camera_paths(&self, scene: &Scene, camera: &Camera, round: u32,
                          energy: Float) -> (Vec<Vector3f>, Vec<ViewPoint>) {
        let (width, height) = (camera.width(), camera.height());
        let spp = self.spp.max(1);
        let strength = energy / spp as Float;
        let inv_spp = 1.0 / spp as Float;

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.green/blue} {pos}/{len} camera blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let view_points = Mutex::new(Vec::new());
        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut round_buffer = vec![Vector3f::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                let view_points = &view_points;
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
                                let seed = (((self.seed + round as u64) & 0xFFF) << 32)
                                    | (((y as u64) & 0xFFFF) << 16)
                                    | ((x as u64) & 0xFFFF);
                                let mut rng = LcgRng::new(seed);
                                let mut color = Vector3f::zeros();
                                for _sample in 0..spp {
                                    // jitter anew every round so rounds decorrelate
                                    let dx = x as Float + rng.next_f32() - 0.5;
                                    let dy = y as Float + rng.next_f32() - 0.5;
                                    let ray = camera.generate_ray(dx, dy);
                                    color += self.ray_trace(
                                        scene, &ray, strength, x, y, 0,
                                        Vector3f::new(1.0, 1.0, 1.0),
                                        &mut rng, view_points);
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
                            round_buffer[x + width * y] = block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        let view_points = match view_points.into_inner() {
            Ok(points) => points,
            Err(poisoned) => poisoned.into_inner(),
        };
        (round_buffer, view_points)
    }

    /// Pass B: emit photons from every light, splitting the budget evenly,
    /// and splat their energy into `round_buffer`.
    fn trace_photons(&self, scene: &Scene, tree: &PointKdTree, round: u32,
                     radius: Float, round_buffer: Vec<Vector3f>,
                     width: usize) -> Vec<Vector3f> {
        if scene.lights().is_empty() || self.photon_num < scene.lights().len() {
            return round_buffer;
        }

        let progress = ProgressBar::new(self.photon_num as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.yellow/blue} {pos}/{len} photons")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let per_light = self.photon_num / scene.lights().len();
        let total_photons = per_light * scene.lights().len();
        let buffer = Mutex::new(round_buffer);
        let next_photon = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_photon = Arc::clone(&next_photon);
                let buffer = &buffer;
                let progress = &progress;
                scope.spawn(move || {
                    loop {
                        let start = next_photon.fetch_add(PHOTON_CHUNK, Ordering::Relaxed);
                        if start >= total_photons {
                            break;
                        }
                        let end = (start + PHOTON_CHUNK).min(total_photons);
                        for index in start..end {
                            let light = &scene.lights()[index / per_light];
                            let seed = self.seed
                                ^ ((round as u64) << 40)
                                ^ (index as u64);
                            let mut rng = LcgRng::new(seed);
                            let (light_ray, energy) = light.generate_ray(&mut rng);
                            let radi = energy / self.photon_num as Float;
                            self.photon_trace(scene, &light_ray, 1, radi,
                                              radius, tree, buffer, width, &mut rng);
                        }
                        progress.inc((end - start) as u64);
                    }
                });
            }
        });
        progress.finish_and_clear();

        match buffer.into_inner() {
            Ok(pixels) => pixels,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Integrator for PhotonIntegrator {
    fn render(&self, scene: &Scene, camera: &mut Camera) -> Result<(), String> {
        let (width, height) = (camera.width(), camera.height());
        if width == 0 || height == 0 {
            return Err(String::from("camera has an empty film"));
        }

        let mut current_radius = self.initial_radius;
        let mut current_energy = Self::initial_energy(self.re_decay, self.render_round);
        camera.film_mut().clear();

        for round in 0..self.render_round {
            let round_start = Instant::now();
            log::info!("round {}: radius {:.4}, energy {:.6}",
                       round, current_radius, current_energy);

            let (round_buffer, view_points) =
                self.trace_camera_paths(scene, camera, round, current_energy);
            log::info!("round {}: {} view points", round, view_points.len());

            // the photon pass must see the round's complete view point set
            let tree = PointKdTree::new(view_points);
            let round_buffer = self.trace_photons(
                scene, &tree, round, current_radius, round_buffer, width);

            let film = camera.film_mut();
            for y in 0..height {
                for x in 0..width {
                    film.update_pixel(x, y, &round_buffer[x + width * y]);
                }
            }

            if let Some(prefix) = &self.snapshot_prefix {
                camera.film().write_png(&format!("{}{}.png", prefix, round))?;
            }

            current_radius *= self.re_decay;
            current_energy *= self.re_decay;
            log::info!("round {} took {} ms", round,
                       round_start.elapsed().as_millis());
        }

        Ok(())
    }

    fn radiance(&self, _scene: &Scene, _ray: &Ray3f, _rng: &mut LcgRng) -> Vector3f {
        // density estimation has no meaningful single-ray answer
        Vector3f::zeros()
    }
}
