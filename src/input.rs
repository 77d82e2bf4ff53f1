//! Pointer input adapter for the painting canvas.
//!
//! egui already folds mouse and the first active touch point into one
//! primary pointer (additional touch points never reach the pointer state,
//! which gives us the ignore-multi-touch contract for free). What remains is
//! mapping viewport coordinates into canvas-local ones.

use egui::{Pos2, Rect};

/// Convert a viewport position into coordinates relative to the canvas's
/// top-left corner. Positions outside the canvas yield `None`.
pub fn canvas_local(pos: Pos2, canvas: Rect) -> Option<Pos2> {
    if !canvas.contains(pos) {
        return None;
    }
    Some(Pos2::new(pos.x - canvas.min.x, pos.y - canvas.min.y))
}

/// Like [`canvas_local`], but clamps outside positions onto the canvas edge
/// instead of rejecting them. Used mid-drag so a stroke follows the pointer
/// to the border instead of being cut off early.
pub fn canvas_local_clamped(pos: Pos2, canvas: Rect) -> Pos2 {
    let clamped = pos.clamp(canvas.min, canvas.max);
    Pos2::new(clamped.x - canvas.min.x, clamped.y - canvas.min.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn subtracts_canvas_offset() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(400.0, 300.0));
        let local = canvas_local(Pos2::new(140.0, 80.0), canvas).unwrap();
        assert_eq!(local, Pos2::new(40.0, 30.0));
    }

    #[test]
    fn rejects_positions_outside_canvas() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(400.0, 300.0));
        assert!(canvas_local(Pos2::new(10.0, 10.0), canvas).is_none());
    }

    #[test]
    fn clamped_variant_snaps_to_edge() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(400.0, 300.0));
        let local = canvas_local_clamped(Pos2::new(50.0, 500.0), canvas);
        assert_eq!(local, Pos2::new(0.0, 300.0));
    }
}
