//! RGBA pixel buffers: loaded from PNG, generated procedurally, or produced
//! by the renderer as the off-screen framebuffer.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Texture {
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Texture {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let w = self.width as usize;
        self.pixels[y as usize * w + x as usize] = color;
    }

    /// Build a texture from a per-pixel colour function.
    fn from_fn(width: u32, height: u32, color_at: impl Fn(u32, u32) -> Color) -> Self {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| color_at(x, y))
            .collect();
        Texture {
            width,
            height,
            pixels,
        }
    }

    /// Hard-edged checkerboard. The tile touching the top-left corner uses `a`.
    pub fn checkerboard(a: Color, b: Color, width: u32, height: u32, tile_w: u32, tile_h: u32) -> Self {
        let tile_w = tile_w.max(1);
        let tile_h = tile_h.max(1);
        Self::from_fn(width, height, |x, y| {
            if (x / tile_w + y / tile_h) % 2 == 0 { a } else { b }
        })
    }

    /// Vertical gradient from `top` (row 0) towards `bottom`.
    pub fn gradient(top: Color, bottom: Color, width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, y| {
            Color::lerp(top, bottom, y as f32 / height as f32)
        })
    }

    /// Gradient that runs `top → bottom` over the upper half and back over the
    /// lower half. Both halves share `t = y / height`, so the lower half starts
    /// near `top` again rather than mirroring the upper half.
    pub fn double_gradient(top: Color, bottom: Color, width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, y| {
            let t = y as f32 / height as f32;
            if y < height / 2 {
                Color::lerp(top, bottom, t)
            } else {
                Color::lerp(bottom, top, t)
            }
        })
    }

    pub fn load_png(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("Failed to load image {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Texture {
            width,
            height,
            pixels,
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect();
        let Some(img) = image::RgbaImage::from_raw(self.width, self.height, raw) else {
            bail!("Pixel buffer does not match {}x{}", self.width, self.height);
        };
        img.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
