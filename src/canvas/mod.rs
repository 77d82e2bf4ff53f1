//! The painting studio's drawing engine: a CPU pixel surface, a flat tool
//! palette, and a gesture state machine with snapshot-based shape preview.

use egui::Color32;
use serde::{Deserialize, Serialize};

mod engine;
mod raster;
mod sticker;
mod surface;

pub use engine::PaintEngine;
pub use surface::PixelSurface;

/// Smallest and largest brush width the palette slider allows.
pub const MIN_STROKE_WIDTH: f32 = 5.0;
pub const MAX_STROKE_WIDTH: f32 = 60.0;

/// Swatches offered by the color strip.
pub const PALETTE: [Color32; 11] = [
    Color32::from_rgb(0x00, 0x00, 0x00),
    Color32::from_rgb(0xff, 0x00, 0x00),
    Color32::from_rgb(0x00, 0xff, 0x00),
    Color32::from_rgb(0x00, 0x00, 0xff),
    Color32::from_rgb(0xff, 0xff, 0x00),
    Color32::from_rgb(0xff, 0x00, 0xff),
    Color32::from_rgb(0x00, 0xff, 0xff),
    Color32::from_rgb(0xff, 0xa5, 0x00),
    Color32::from_rgb(0x80, 0x00, 0x80),
    Color32::from_rgb(0xa5, 0x2a, 0x2a),
    Color32::from_rgb(0xff, 0xff, 0xff),
];

/// Glyphs offered by the sticker picker.
pub const STICKERS: [&str; 18] = [
    "⭐", "❤", "🌟", "🦋", "🌸", "🚗", "🚀", "🐶", "🐱", "🦄", "🌈", "🍦", "🍕", "⚽", "🎸",
    "🎈", "👑", "💎",
];

/// Paper colors offered by the background picker.
pub const BACKGROUNDS: [(&str, Color32); 4] = [
    ("Blank", Color32::from_rgb(0xff, 0xff, 0xff)),
    ("Night", Color32::from_rgb(0x1a, 0x1a, 0x2e)),
    ("Sky", Color32::from_rgb(0x87, 0xce, 0xeb)),
    ("Paper", Color32::from_rgb(0xf8, 0xf9, 0xfa)),
];

/// The active drawing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Brush,
    Eraser,
    Square,
    Circle,
    Triangle,
    Sticker,
    Spray,
}

impl ToolKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Sticker => "Sticker",
            Self::Spray => "Spray",
        }
    }

    /// Shape tools preview by restoring the gesture snapshot every frame.
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Square | Self::Circle | Self::Triangle)
    }
}

/// The palette selections consulted on every pointer event. Mutated only by
/// palette controls; read-only while a gesture is in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolState {
    pub tool: ToolKind,
    pub color: Color32,
    pub stroke_width: f32,
    pub shadow_enabled: bool,
    pub sticker: String,
    pub background: Color32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Color32::BLACK,
            stroke_width: 10.0,
            shadow_enabled: true,
            sticker: STICKERS[0].to_owned(),
            background: Color32::WHITE,
        }
    }
}

impl ToolState {
    /// Clamp the slider value into the supported range. The only validation
    /// the palette performs.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_width_is_clamped() {
        let mut tools = ToolState::default();
        tools.set_stroke_width(1.0);
        assert_eq!(tools.stroke_width, MIN_STROKE_WIDTH);
        tools.set_stroke_width(500.0);
        assert_eq!(tools.stroke_width, MAX_STROKE_WIDTH);
        tools.set_stroke_width(22.0);
        assert_eq!(tools.stroke_width, 22.0);
    }
}
