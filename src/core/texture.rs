// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use crate::math::constants::Float;

/// Decoded image table. Texels keep their raw 0..255 channel values; the
/// consuming BRDF normalizes to [0, 1].
pub struct Texture {
    width: usize,
    height: usize,
    data: Vec<Vector3f>,
}

impl Texture {
    pub fn from_pixels(width: usize, height: usize, data: Vec<Vector3f>) -> Self {
        assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    /// Missing or undecodable assets are a hard startup failure for the
    /// caller; rendering cannot proceed without them.
    pub fn from_file(path: &str) -> Result<Self, String> {
        log::info!("Loading texture from: {}.", path);
        let img = image::open(path)
            .map_err(|e| format!("failed to load texture {}: {}", path, e))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let px = img.get_pixel(x, y);
                data.push(Vector3f::new(px[0] as Float, px[1] as Float, px[2] as Float));
            }
        }
        Ok(Self { width: width as usize, height: height as usize, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-texel lookup, uv clamped to the table.
    pub fn sample(&self, u: Float, v: Float) -> Vector3f {
        let x = ((u * self.width as Float) as usize).min(self.width - 1);
        let y = ((v * self.height as Float) as usize).min(self.height - 1);
        self.data[y * self.width + x]
    }
}
