// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

use std::ops;

/// Accumulation buffer the integrators write into, row-major.
#[derive(Debug)]
pub struct Film {
    data: Vec<Vector3f>,
    width: usize,
    height: usize,
}

impl ops::Index<(usize, usize)> for Film {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Film {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self { data: vec![Vector3f::zeros(); width * height], width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn update_pixel(&mut self, x: usize, y: usize, value: &Vector3f) {
        self.data[x + self.width * y] += value;
    }

    pub fn clear(&mut self) {
        for pixel in self.data.iter_mut() {
            *pixel = Vector3f::zeros();
        }
    }

    /// Gamma-corrected 8-bit PNG.
    pub fn write_png(&self, path: &str) -> Result<(), String> {
        let mut buffer = image::RgbImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let pixel = &self.data[x + self.width * y];
                let quantize = |v: Float| -> u8 {
                    (v.max(0.0).min(1.0).powf(1.0 / 2.2) * 255.0 + 0.5) as u8
                };
                buffer.put_pixel(x as u32, y as u32,
                                 image::Rgb([quantize(pixel.x),
                                             quantize(pixel.y),
                                             quantize(pixel.z)]));
            }
        }
        buffer.save(path).map_err(|e| format!("failed to write {}: {}", path, e))?;
        log::info!("wrote image to {}", path);
        Ok(())
    }
}

/// Pinhole perspective camera carrying its own film.
pub struct Camera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    film: Film,
}

impl Camera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect: width as Float / height as Float,
            film: Film::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.film.width()
    }

    pub fn height(&self) -> usize {
        self.film.height()
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn film_mut(&mut self) -> &mut Film {
        &mut self.film
    }

    /// Ray through fractional pixel coordinates, (0, 0) being the top-left
    /// corner of the film.
    pub fn generate_ray(&self, x: Float, y: Float) -> Ray3f {
        let u = x / self.film.width() as Float;
        let v = y / self.film.height() as Float;
        let px = (2.0 * u - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * v) * self.tan_half_fov_y;

        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_film_indexing() {
        let mut film = Film::new(8, 4);
        film[(5, 2)] = Vector3f::new(1.0, 0.5, 0.25);
        film.update_pixel(5, 2, &Vector3f::new(0.5, 0.0, 0.0));
        assert!((film[(5, 2)].x - 1.5).abs() < 1e-6);
        assert!((film[(5, 2)].y - 0.5).abs() < 1e-6);

        film.clear();
        assert!(film[(5, 2)].norm() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let cam = Camera::new(Vector3f::zeros(),
                              Vector3f::new(0.0, 0.0, -1.0),
                              Vector3f::new(0.0, 1.0, 0.0),
                              std::f32::consts::FRAC_PI_2,
                              4, 4);
        let ray = cam.generate_ray(2.0, 2.0);
        assert!((ray.dir() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_corner_rays_spread_symmetrically() {
        let cam = Camera::new(Vector3f::zeros(),
                              Vector3f::new(0.0, 0.0, -1.0),
                              Vector3f::new(0.0, 1.0, 0.0),
                              std::f32::consts::FRAC_PI_2,
                              8, 8);
        let top_left = cam.generate_ray(0.0, 0.0);
        let bottom_right = cam.generate_ray(8.0, 8.0);
        assert!((top_left.dir().x + bottom_right.dir().x).abs() < 1e-5);
        assert!((top_left.dir().y + bottom_right.dir().y).abs() < 1e-5);
        assert!(top_left.dir().y > 0.0);
        assert!(top_left.dir().x < 0.0);
    }
}
