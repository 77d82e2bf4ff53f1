//! Shape rasterizers for the painting surface.
//!
//! Every primitive renders a coverage [`Patch`] over its bounding box and
//! composites it through one shared path, so the drop shadow (blur + offset
//! of the same coverage) works identically for strokes, shapes and sticker
//! glyphs.

use egui::{Color32, Pos2};

use super::surface::{Patch, PixelSurface};

/// Drop-shadow parameters derived from the active stroke width.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Shadow {
    pub offset: (i32, i32),
    pub blur: usize,
    pub alpha: f32,
}

impl Shadow {
    /// The soft shadow strokes and shapes get in 3D mode.
    pub(crate) fn for_stroke(width: f32) -> Self {
        Self {
            offset: ((width / 4.0).round() as i32, (width / 4.0).round() as i32),
            blur: (width / 2.0).round().max(1.0) as usize,
            alpha: 0.2,
        }
    }

    /// Stickers use a blurrier, un-offset shadow.
    pub(crate) fn for_sticker() -> Self {
        Self {
            offset: (0, 0),
            blur: 10,
            alpha: 0.3,
        }
    }
}

/// Composite `patch` in `color`, rendering its shadow first when requested.
pub(crate) fn paint_patch(
    surface: &mut PixelSurface,
    patch: &Patch,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if let Some(shadow) = shadow {
        let soft = patch.blurred(shadow.blur);
        surface.composite(&soft, Color32::BLACK, shadow.alpha, shadow.offset.0, shadow.offset.1);
    }
    surface.composite(patch, color, 1.0, 0, 0);
}

fn dist_sq_to_segment(p: (f32, f32), a: Pos2, b: Pos2) -> f32 {
    let (px, py) = p;
    let ab = (b.x - a.x, b.y - a.y);
    let ap = (px - a.x, py - a.y);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0)
    };
    let dx = px - (a.x + ab.0 * t);
    let dy = py - (a.y + ab.1 * t);
    dx * dx + dy * dy
}

fn shadow_margin(shadow: Option<Shadow>) -> f32 {
    shadow.map_or(0.0, |s| {
        s.blur as f32 + s.offset.0.abs().max(s.offset.1.abs()) as f32
    })
}

/// Round-capped, round-joined line segment; the brush and eraser path.
pub(crate) fn stroke_segment(
    surface: &mut PixelSurface,
    a: Pos2,
    b: Pos2,
    width: f32,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if surface.is_empty() {
        return;
    }
    let hw = (width / 2.0).max(0.5);
    let r_sq = hw * hw;
    let patch = Patch::rasterize(
        a.x.min(b.x) - hw,
        a.y.min(b.y) - hw,
        a.x.max(b.x) + hw,
        a.y.max(b.y) + hw,
        shadow_margin(shadow),
        |x, y| dist_sq_to_segment((x, y), a, b) <= r_sq,
    );
    paint_patch(surface, &patch, color, shadow);
}

/// Filled rectangle between two drag corners plus a centered stroke band,
/// both in the same color.
pub(crate) fn shape_rect(
    surface: &mut PixelSurface,
    start: Pos2,
    end: Pos2,
    stroke_width: f32,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if surface.is_empty() {
        return;
    }
    let (x0, x1) = (start.x.min(end.x), start.x.max(end.x));
    let (y0, y1) = (start.y.min(end.y), start.y.max(end.y));
    let hw = (stroke_width / 2.0).max(0.5);
    // Fill plus a same-color stroke band centered on the border collapses
    // to the rect grown by half the stroke width.
    let patch = Patch::rasterize(x0 - hw, y0 - hw, x1 + hw, y1 + hw, shadow_margin(shadow), |x, y| {
        x >= x0 - hw && x <= x1 + hw && y >= y0 - hw && y <= y1 + hw
    });
    paint_patch(surface, &patch, color, shadow);
}

/// Filled + stroked circle centered on the drag start, radius to the
/// current pointer.
pub(crate) fn shape_circle(
    surface: &mut PixelSurface,
    center: Pos2,
    edge: Pos2,
    stroke_width: f32,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if surface.is_empty() {
        return;
    }
    let radius = center.distance(edge);
    let hw = (stroke_width / 2.0).max(0.5);
    let outer = radius + hw;
    let outer_sq = outer * outer;
    let patch = Patch::rasterize(
        center.x - outer,
        center.y - outer,
        center.x + outer,
        center.y + outer,
        shadow_margin(shadow),
        |x, y| {
            let dx = x - center.x;
            let dy = y - center.y;
            dx * dx + dy * dy <= outer_sq
        },
    );
    paint_patch(surface, &patch, color, shadow);
}

/// Isosceles triangle: apex at the drag start, one base corner at the
/// pointer and the other mirrored across the apex's x.
pub(crate) fn shape_triangle(
    surface: &mut PixelSurface,
    start: Pos2,
    end: Pos2,
    stroke_width: f32,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if surface.is_empty() {
        return;
    }
    let a = start;
    let b = end;
    let c = Pos2::new(start.x - (end.x - start.x), end.y);
    let hw = (stroke_width / 2.0).max(0.5);
    let hw_sq = hw * hw;

    let edge = |p: Pos2, q: Pos2, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);
    let min_x = a.x.min(b.x).min(c.x) - hw;
    let min_y = a.y.min(b.y).min(c.y) - hw;
    let max_x = a.x.max(b.x).max(c.x) + hw;
    let max_y = a.y.max(b.y).max(c.y) + hw;
    let patch = Patch::rasterize(min_x, min_y, max_x, max_y, shadow_margin(shadow), |x, y| {
        let e0 = edge(a, b, x, y);
        let e1 = edge(b, c, x, y);
        let e2 = edge(c, a, x, y);
        let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
        inside
            || dist_sq_to_segment((x, y), a, b) <= hw_sq
            || dist_sq_to_segment((x, y), b, c) <= hw_sq
            || dist_sq_to_segment((x, y), c, a) <= hw_sq
    });
    paint_patch(surface, &patch, color, shadow);
}

/// Scatter single-pixel dots inside a circle around `center`. Candidate
/// count and spread scale with the stroke width; density is whatever the
/// injected RNG produces.
pub(crate) fn spray(
    surface: &mut PixelSurface,
    center: Pos2,
    width: f32,
    color: Color32,
    rng: &mut impl rand::Rng,
) {
    if surface.is_empty() {
        return;
    }
    let count = (width * 2.0) as usize;
    let radius_sq = width * width;
    for _ in 0..count {
        let dx = (rng.random::<f32>() - 0.5) * width * 2.0;
        let dy = (rng.random::<f32>() - 0.5) * width * 2.0;
        if dx * dx + dy * dy <= radius_sq {
            surface.blend((center.x + dx) as i32, (center.y + dy) as i32, color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn white(size: usize) -> PixelSurface {
        PixelSurface::new(size, size, Color32::WHITE)
    }

    #[test]
    fn segment_has_round_caps() {
        let mut surface = white(40);
        stroke_segment(
            &mut surface,
            Pos2::new(10.0, 20.0),
            Pos2::new(30.0, 20.0),
            8.0,
            Color32::BLACK,
            None,
        );
        // Cap extends beyond the endpoint.
        assert_eq!(surface.get(7, 20), Some(Color32::BLACK));
        // Well outside the cap radius stays untouched.
        assert_eq!(surface.get(2, 20), Some(Color32::WHITE));
        // Above the line by more than half the width stays untouched.
        assert_eq!(surface.get(20, 10), Some(Color32::WHITE));
    }

    #[test]
    fn rect_covers_drag_bounds() {
        let mut surface = white(64);
        shape_rect(
            &mut surface,
            Pos2::new(10.0, 10.0),
            Pos2::new(50.0, 50.0),
            6.0,
            Color32::RED,
            None,
        );
        assert_eq!(surface.get(30, 30), Some(Color32::RED));
        assert_eq!(surface.get(10, 10), Some(Color32::RED));
        assert_eq!(surface.get(2, 2), Some(Color32::WHITE));
    }

    #[test]
    fn triangle_third_vertex_is_mirrored() {
        let mut surface = white(64);
        // Apex at (32, 10), dragged to (44, 40) -> mirrored corner (20, 40).
        shape_triangle(
            &mut surface,
            Pos2::new(32.0, 10.0),
            Pos2::new(44.0, 40.0),
            4.0,
            Color32::BLUE,
            None,
        );
        assert_eq!(surface.get(20, 40), Some(Color32::BLUE));
        assert_eq!(surface.get(32, 12), Some(Color32::BLUE));
        assert_eq!(surface.get(5, 12), Some(Color32::WHITE));
    }

    #[test]
    fn spray_is_reproducible_with_seeded_rng() {
        let mut a = white(64);
        let mut b = white(64);
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        spray(&mut a, Pos2::new(32.0, 32.0), 12.0, Color32::BLACK, &mut rng_a);
        spray(&mut b, Pos2::new(32.0, 32.0), 12.0, Color32::BLACK, &mut rng_b);
        assert_eq!(a.pixels(), b.pixels());
        assert!(a.pixels().iter().any(|&p| p == Color32::BLACK));
    }

    #[test]
    fn spray_stays_inside_radius() {
        let mut surface = white(100);
        let mut rng = StdRng::seed_from_u64(1);
        spray(&mut surface, Pos2::new(50.0, 50.0), 10.0, Color32::BLACK, &mut rng);
        for y in 0..100 {
            for x in 0..100 {
                if surface.get(x, y) == Some(Color32::BLACK) {
                    let dx = x as f32 - 50.0;
                    let dy = y as f32 - 50.0;
                    assert!(dx * dx + dy * dy <= 12.0 * 12.0);
                }
            }
        }
    }
}
