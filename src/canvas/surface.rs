use egui::{Color32, ColorImage};

use crate::error::ExportError;

/// CPU-side RGBA pixel buffer backing the painting canvas.
///
/// The surface is owned exclusively by the paint engine; every tool renders
/// into it through the raster methods below. Pixels are plain opaque
/// `Color32` values so the buffer can be handed to egui as a texture without
/// conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

/// A rasterized coverage mask for one primitive, limited to its bounding
/// box. Compositing a patch (optionally blurred and offset for a drop
/// shadow) is the single write path shared by every shape tool.
pub(crate) struct Patch {
    /// Top-left of the patch in surface coordinates. May be negative when a
    /// primitive pokes over the canvas edge.
    pub x0: i32,
    pub y0: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, 0 = untouched, 255 = fully covered.
    pub mask: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize, fill: Color32) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// A zero-area surface; every drawing operation on it is a no-op.
    pub fn empty() -> Self {
        Self::new(0, 0, Color32::TRANSPARENT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill(&mut self, color: Color32) {
        self.pixels.fill(color);
    }

    /// Copy `snapshot` back into this surface. Dimensions must match; a
    /// stale snapshot from before a resize is ignored.
    pub fn restore(&mut self, snapshot: &PixelSurface) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixels.copy_from_slice(&snapshot.pixels);
        }
    }

    /// Reallocate to `width x height`, writing the old content back at the
    /// origin. Content outside the new bounds is lost; newly exposed area is
    /// filled with `background`.
    pub fn resize(&mut self, width: usize, height: usize, background: Color32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut pixels = vec![background; width * height];
        let copy_w = self.width.min(width);
        let copy_h = self.height.min(height);
        for y in 0..copy_h {
            let src = &self.pixels[y * self.width..y * self.width + copy_w];
            pixels[y * width..y * width + copy_w].copy_from_slice(src);
        }
        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    /// View of the surface for texture upload.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: [self.width, self.height],
            pixels: self.pixels.clone(),
        }
    }

    /// Encode the surface as PNG bytes. Pure read, no mutation.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ExportError> {
        if self.is_empty() {
            return Err(ExportError::EmptySurface);
        }
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            raw.extend_from_slice(&px.to_array());
        }
        let img = image::RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
            .ok_or(ExportError::EmptySurface)?;
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )?;
        Ok(bytes)
    }

    /// Alpha-blend `color` over the pixel at (x, y). `alpha` is 0..=1 in
    /// straight (non-premultiplied) form; the canvas itself stays opaque.
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: Color32, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let dst = self.pixels[idx];
        let mix = |s: u8, d: u8| -> u8 { (s as f32 * a + d as f32 * (1.0 - a)).round() as u8 };
        self.pixels[idx] = Color32::from_rgb(
            mix(color.r(), dst.r()),
            mix(color.g(), dst.g()),
            mix(color.b(), dst.b()),
        );
    }

    /// Composite a coverage patch in `color`, scaled by `alpha` and shifted
    /// by `(dx, dy)`.
    pub(crate) fn composite(&mut self, patch: &Patch, color: Color32, alpha: f32, dx: i32, dy: i32) {
        for py in 0..patch.height {
            for px in 0..patch.width {
                let cov = patch.mask[py * patch.width + px];
                if cov == 0 {
                    continue;
                }
                self.blend(
                    patch.x0 + px as i32 + dx,
                    patch.y0 + py as i32 + dy,
                    color,
                    alpha * cov as f32 / 255.0,
                );
            }
        }
    }
}

impl Patch {
    /// Rasterize `covered` over the given bounding box (surface
    /// coordinates), sampling at pixel centers. `margin` grows the box so a
    /// later blur has room to bleed.
    pub(crate) fn rasterize<F>(
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        margin: f32,
        covered: F,
    ) -> Self
    where
        F: Fn(f32, f32) -> bool,
    {
        let x0 = (min_x - margin).floor() as i32;
        let y0 = (min_y - margin).floor() as i32;
        let x1 = (max_x + margin).ceil() as i32;
        let y1 = (max_y + margin).ceil() as i32;
        let width = (x1 - x0).max(0) as usize + 1;
        let height = (y1 - y0).max(0) as usize + 1;
        let mut mask = vec![0u8; width * height];
        for py in 0..height {
            let cy = y0 as f32 + py as f32 + 0.5;
            for px in 0..width {
                let cx = x0 as f32 + px as f32 + 0.5;
                if covered(cx, cy) {
                    mask[py * width + px] = 255;
                }
            }
        }
        Self {
            x0,
            y0,
            width,
            height,
            mask,
        }
    }

    /// Two-pass box blur of the coverage mask, used for drop shadows.
    pub(crate) fn blurred(&self, radius: usize) -> Self {
        if radius == 0 || self.mask.is_empty() {
            return Self {
                x0: self.x0,
                y0: self.y0,
                width: self.width,
                height: self.height,
                mask: self.mask.clone(),
            };
        }
        let w = self.width as i32;
        let h = self.height as i32;
        let r = radius as i32;
        let window = (2 * r + 1) as u32;

        let mut horiz = vec![0u8; self.mask.len()];
        for y in 0..h {
            for x in 0..w {
                let mut sum: u32 = 0;
                for k in -r..=r {
                    let sx = (x + k).clamp(0, w - 1);
                    sum += self.mask[(y * w + sx) as usize] as u32;
                }
                horiz[(y * w + x) as usize] = (sum / window) as u8;
            }
        }
        let mut out = vec![0u8; self.mask.len()];
        for y in 0..h {
            for x in 0..w {
                let mut sum: u32 = 0;
                for k in -r..=r {
                    let sy = (y + k).clamp(0, h - 1);
                    sum += horiz[(sy * w + x) as usize] as u32;
                }
                out[(y * w + x) as usize] = (sum / window) as u8;
            }
        }
        Self {
            x0: self.x0,
            y0: self.y0,
            width: self.width,
            height: self.height,
            mask: out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_preserves_origin_content() {
        let mut surface = PixelSurface::new(4, 4, Color32::WHITE);
        surface.set(1, 2, Color32::RED);
        surface.resize(8, 3, Color32::BLUE);
        assert_eq!(surface.get(1, 2), Some(Color32::RED));
        // Newly exposed area takes the background color.
        assert_eq!(surface.get(6, 1), Some(Color32::BLUE));
        // Row 3 of the old content is gone.
        assert_eq!(surface.height(), 3);
    }

    #[test]
    fn restore_ignores_mismatched_snapshot() {
        let snapshot = PixelSurface::new(2, 2, Color32::RED);
        let mut surface = PixelSurface::new(3, 3, Color32::WHITE);
        surface.restore(&snapshot);
        assert_eq!(surface.get(0, 0), Some(Color32::WHITE));
    }

    #[test]
    fn blend_is_clipped() {
        let mut surface = PixelSurface::new(2, 2, Color32::WHITE);
        surface.blend(-1, 0, Color32::RED, 1.0);
        surface.blend(5, 5, Color32::RED, 1.0);
        assert!(surface.pixels().iter().all(|&p| p == Color32::WHITE));
    }

    #[test]
    fn blur_spreads_coverage() {
        let patch = Patch::rasterize(4.0, 4.0, 4.0, 4.0, 3.0, |x, y| {
            (x - 4.5).abs() < 0.6 && (y - 4.5).abs() < 0.6
        });
        let blurred = patch.blurred(2);
        let center = blurred.mask.iter().filter(|&&m| m > 0).count();
        let sharp = patch.mask.iter().filter(|&&m| m > 0).count();
        assert!(center > sharp);
    }
}
