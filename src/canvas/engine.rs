use egui::{Color32, Pos2};
use log::debug;
use rand::Rng;

use super::raster::{self, Shadow};
use super::sticker::StickerStamper;
use super::surface::PixelSurface;
use super::{ToolKind, ToolState};
use crate::error::ExportError;

/// One continuous pointer-down-to-pointer-up interaction.
///
/// The snapshot taken at gesture start lets shape tools restore the surface
/// before every preview frame, so an in-progress square/circle/triangle
/// never accumulates copies of itself while the pointer moves.
struct Gesture {
    start: Pos2,
    last: Pos2,
    snapshot: PixelSurface,
}

/// Owns the pixel surface and renders every tool's visual effect.
pub struct PaintEngine {
    surface: PixelSurface,
    tools: ToolState,
    gesture: Option<Gesture>,
    stamper: StickerStamper,
}

impl Default for PaintEngine {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl PaintEngine {
    pub fn new(width: usize, height: usize) -> Self {
        let tools = ToolState::default();
        Self {
            surface: PixelSurface::new(width, height, tools.background),
            tools,
            gesture: None,
            stamper: StickerStamper::default(),
        }
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    /// Palette mutations go through here; they are rejected mid-gesture so
    /// the tool state stays read-only while drawing.
    pub fn tools_mut(&mut self) -> Option<&mut ToolState> {
        if self.gesture.is_some() {
            None
        } else {
            Some(&mut self.tools)
        }
    }

    pub fn has_active_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture at `point`. A sticker stamps immediately and ends the
    /// gesture; there is no drag phase for it.
    pub fn begin_gesture(&mut self, point: Pos2) {
        if self.surface.is_empty() {
            return;
        }
        self.gesture = Some(Gesture {
            start: point,
            last: point,
            snapshot: self.surface.clone(),
        });
        if self.tools.tool == ToolKind::Sticker {
            let shadow = self.tools.shadow_enabled.then(Shadow::for_sticker);
            self.stamper.stamp(
                &mut self.surface,
                &self.tools.sticker,
                point,
                self.tools.stroke_width * 5.0,
                self.tools.color,
                shadow,
            );
            self.gesture = None;
        }
    }

    /// Advance the active gesture to `point`. No-op when no gesture is
    /// active (e.g. the pointer entered mid-drag or the surface is empty).
    pub fn continue_gesture(&mut self, point: Pos2, rng: &mut impl Rng) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let tools = &self.tools;
        let shadow = (tools.shadow_enabled
            && !matches!(tools.tool, ToolKind::Eraser | ToolKind::Spray))
        .then(|| Shadow::for_stroke(tools.stroke_width));

        match tools.tool {
            ToolKind::Brush => {
                raster::stroke_segment(
                    &mut self.surface,
                    gesture.last,
                    point,
                    tools.stroke_width,
                    tools.color,
                    shadow,
                );
            }
            ToolKind::Eraser => {
                // Erasing paints the paper color at double width, no shadow.
                raster::stroke_segment(
                    &mut self.surface,
                    gesture.last,
                    point,
                    tools.stroke_width * 2.0,
                    tools.background,
                    None,
                );
            }
            ToolKind::Spray => {
                raster::spray(&mut self.surface, point, tools.stroke_width, tools.color, rng);
            }
            ToolKind::Square => {
                self.surface.restore(&gesture.snapshot);
                raster::shape_rect(
                    &mut self.surface,
                    gesture.start,
                    point,
                    tools.stroke_width,
                    tools.color,
                    shadow,
                );
            }
            ToolKind::Circle => {
                self.surface.restore(&gesture.snapshot);
                raster::shape_circle(
                    &mut self.surface,
                    gesture.start,
                    point,
                    tools.stroke_width,
                    tools.color,
                    shadow,
                );
            }
            ToolKind::Triangle => {
                self.surface.restore(&gesture.snapshot);
                raster::shape_triangle(
                    &mut self.surface,
                    gesture.start,
                    point,
                    tools.stroke_width,
                    tools.color,
                    shadow,
                );
            }
            ToolKind::Sticker => {
                // Stamped on pointer-down; dragging does nothing.
            }
        }
        gesture.last = point;
    }

    /// Finish the gesture and discard its snapshot.
    pub fn end_gesture(&mut self) {
        self.gesture = None;
    }

    /// Fill the whole surface with the paper color.
    pub fn clear(&mut self) {
        self.surface.fill(self.tools.background);
    }

    /// Destructively repaint the paper. The caller obtains `confirmed` from
    /// a yes/no dialog; without confirmation the surface is left untouched.
    pub fn change_background(&mut self, color: Color32, confirmed: bool) {
        if !confirmed {
            return;
        }
        debug!("background changed, canvas cleared");
        self.tools.background = color;
        self.surface.fill(color);
        self.gesture = None;
    }

    /// Encode the surface as a PNG. Pure read.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        self.surface.to_png_bytes()
    }

    /// Reallocate the surface, keeping old content at the origin. An active
    /// gesture is dropped since its snapshot no longer matches.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.surface.width() && height == self.surface.height() {
            return;
        }
        self.gesture = None;
        self.surface.resize(width, height, self.tools.background);
    }
}
