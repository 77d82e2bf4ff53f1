use egui::epaint::ImageData;
use egui::epaint::text::{FontDefinitions, Fonts};
use egui::{Color32, FontId, Pos2};
use log::debug;

use super::raster::{self, Shadow};
use super::surface::{Patch, PixelSurface};

const ATLAS_SIDE: usize = 2048;

/// Rasterizes sticker glyphs into the pixel surface.
///
/// Glyphs are shaped through egui's own font stack (whose default fonts
/// include emoji) and the coverage is read back the same way a painting
/// integration consumes it: by applying the font-atlas deltas to a local
/// copy. The stamp then composites like any other shape. egui's bundled
/// emoji are monochrome, so stamps are tinted with the active color.
pub struct StickerStamper {
    fonts: Option<Fonts>,
    atlas: Vec<f32>,
    atlas_size: [usize; 2],
}

impl Default for StickerStamper {
    fn default() -> Self {
        Self {
            fonts: None,
            atlas: Vec::new(),
            atlas_size: [0, 0],
        }
    }
}

impl StickerStamper {
    /// Stamp `glyph` centered at `center`, `size` points tall. A glyph the
    /// fonts cannot shape is skipped silently.
    pub fn stamp(
        &mut self,
        surface: &mut PixelSurface,
        glyph: &str,
        center: Pos2,
        size: f32,
        tint: Color32,
        shadow: Option<Shadow>,
    ) {
        if surface.is_empty() || glyph.is_empty() || size <= 0.0 {
            return;
        }
        let fonts = self
            .fonts
            .get_or_insert_with(|| Fonts::new(1.0, ATLAS_SIDE, FontDefinitions::default()));
        fonts.begin_pass(1.0, ATLAS_SIDE);
        let galley = fonts.layout_no_wrap(
            glyph.to_owned(),
            FontId::proportional(size),
            Color32::WHITE,
        );
        if galley.rows.is_empty() {
            return;
        }
        self.sync_atlas();
        let [atlas_w, atlas_h] = self.atlas_size;
        if atlas_w == 0 || atlas_h == 0 {
            return;
        }
        let origin = center - galley.size() / 2.0;

        // Collect every glyph's coverage into one patch so the drop shadow
        // blurs the whole sticker at once.
        let margin = shadow.map_or(0, |s| s.blur) as i32;
        let x0 = origin.x.floor() as i32 - margin;
        let y0 = origin.y.floor() as i32 - margin;
        let width = galley.size().x.ceil() as usize + 2 * margin as usize + 2;
        let height = galley.size().y.ceil() as usize + 2 * margin as usize + 2;
        let mut mask = vec![0u8; width * height];
        let mut touched = false;

        for row in &galley.rows {
            for g in &row.glyphs {
                let uv = g.uv_rect;
                if uv.min == uv.max {
                    continue;
                }
                let dest = origin + g.pos.to_vec2() + uv.offset;
                for (dy, ty) in (uv.min[1]..uv.max[1]).enumerate() {
                    for (dx, tx) in (uv.min[0]..uv.max[0]).enumerate() {
                        let (tx, ty) = (tx as usize, ty as usize);
                        if tx >= atlas_w || ty >= atlas_h {
                            continue;
                        }
                        let coverage = self.atlas[ty * atlas_w + tx];
                        if coverage <= 0.0 {
                            continue;
                        }
                        let px = dest.x.round() as i32 + dx as i32 - x0;
                        let py = dest.y.round() as i32 + dy as i32 - y0;
                        if px < 0 || py < 0 || px as usize >= width || py as usize >= height {
                            continue;
                        }
                        let idx = py as usize * width + px as usize;
                        let value = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                        mask[idx] = mask[idx].max(value);
                        touched = true;
                    }
                }
            }
        }
        if !touched {
            debug!("sticker {glyph:?} produced no coverage, skipped");
            return;
        }
        let patch = Patch {
            x0,
            y0,
            width,
            height,
            mask,
        };
        raster::paint_patch(surface, &patch, tint, shadow);
    }

    /// Apply pending font-texture changes to our atlas copy. The first
    /// delta carries the whole image; later ones patch sub-regions.
    fn sync_atlas(&mut self) {
        let Some(fonts) = &self.fonts else {
            return;
        };
        while let Some(delta) = fonts.font_image_delta() {
            let ImageData::Font(image) = delta.image else {
                continue;
            };
            match delta.pos {
                None => {
                    self.atlas_size = image.size;
                    self.atlas = image.pixels;
                }
                Some([px, py]) => {
                    let [dw, dh] = image.size;
                    let [aw, ah] = self.atlas_size;
                    for row in 0..dh {
                        let dest_y = py + row;
                        if dest_y >= ah {
                            break;
                        }
                        let copy_w = dw.min(aw.saturating_sub(px));
                        let src = &image.pixels[row * dw..row * dw + copy_w];
                        self.atlas[dest_y * aw + px..dest_y * aw + px + copy_w]
                            .copy_from_slice(src);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_marks_pixels_near_center() {
        let mut surface = PixelSurface::new(120, 120, Color32::WHITE);
        let mut stamper = StickerStamper::default();
        stamper.stamp(
            &mut surface,
            "⭐",
            Pos2::new(60.0, 60.0),
            50.0,
            Color32::BLACK,
            None,
        );
        let darkened = surface
            .pixels()
            .iter()
            .filter(|p| **p != Color32::WHITE)
            .count();
        assert!(darkened > 0, "sticker should touch the surface");
    }

    #[test]
    fn empty_glyph_is_a_noop() {
        let mut surface = PixelSurface::new(40, 40, Color32::WHITE);
        let before = surface.pixels().to_vec();
        let mut stamper = StickerStamper::default();
        stamper.stamp(&mut surface, "", Pos2::new(20.0, 20.0), 30.0, Color32::BLACK, None);
        assert_eq!(surface.pixels(), &before[..]);
    }

    #[test]
    fn repeated_stamps_reuse_the_atlas() {
        let mut surface = PixelSurface::new(200, 200, Color32::WHITE);
        let mut stamper = StickerStamper::default();
        for (i, glyph) in ["⭐", "🚀", "⭐"].iter().enumerate() {
            stamper.stamp(
                &mut surface,
                glyph,
                Pos2::new(40.0 + 60.0 * i as f32, 100.0),
                40.0,
                Color32::BLACK,
                None,
            );
        }
        let darkened = surface
            .pixels()
            .iter()
            .filter(|p| **p != Color32::WHITE)
            .count();
        assert!(darkened > 0);
    }
}
