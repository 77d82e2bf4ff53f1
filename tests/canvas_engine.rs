use egui::{Color32, Pos2};
use kidspark::canvas::{PaintEngine, ToolKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn engine(width: usize, height: usize) -> PaintEngine {
    let mut engine = PaintEngine::new(width, height);
    let tools = engine.tools_mut().unwrap();
    tools.shadow_enabled = false;
    engine
}

fn set_tool(engine: &mut PaintEngine, tool: ToolKind) {
    engine.tools_mut().unwrap().tool = tool;
}

fn drag(engine: &mut PaintEngine, path: &[(f32, f32)]) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut points = path.iter().map(|&(x, y)| Pos2::new(x, y));
    let first = points.next().unwrap();
    engine.begin_gesture(first);
    for point in points {
        engine.continue_gesture(point, &mut rng);
    }
    engine.end_gesture();
}

#[test]
fn brush_replay_is_deterministic() {
    let path = [(10.0, 10.0), (30.0, 22.0), (55.0, 40.0), (70.0, 70.0)];
    let mut a = engine(100, 100);
    let mut b = engine(100, 100);
    drag(&mut a, &path);
    drag(&mut b, &path);
    assert_eq!(a.surface().pixels(), b.surface().pixels());
    assert!(a.surface().pixels().iter().any(|&p| p == Color32::BLACK));
}

#[test]
fn shape_preview_never_compounds() {
    // Dragging A -> B -> C must equal dragging A -> C directly.
    for tool in [ToolKind::Square, ToolKind::Circle, ToolKind::Triangle] {
        let mut stepped = engine(120, 120);
        set_tool(&mut stepped, tool);
        drag(&mut stepped, &[(20.0, 20.0), (90.0, 100.0), (60.0, 60.0)]);

        let mut direct = engine(120, 120);
        set_tool(&mut direct, tool);
        drag(&mut direct, &[(20.0, 20.0), (60.0, 60.0)]);

        assert_eq!(
            stepped.surface().pixels(),
            direct.surface().pixels(),
            "{tool:?} preview left artifacts behind"
        );
    }
}

#[test]
fn square_drag_fills_its_bounding_box() {
    let mut engine = engine(100, 100);
    set_tool(&mut engine, ToolKind::Square);
    engine.tools_mut().unwrap().color = Color32::RED;
    drag(&mut engine, &[(10.0, 10.0), (50.0, 50.0)]);

    let surface = engine.surface();
    // Filled and stroked in red across the drag's bounding box.
    assert_eq!(surface.get(30, 30), Some(Color32::RED));
    assert_eq!(surface.get(12, 12), Some(Color32::RED));
    assert_eq!(surface.get(48, 48), Some(Color32::RED));
    // Far outside the box (plus stroke overhang) stays paper white.
    assert_eq!(surface.get(80, 80), Some(Color32::WHITE));
    assert_eq!(surface.get(2, 60), Some(Color32::WHITE));
}

#[test]
fn background_change_requires_confirmation() {
    let mut engine = engine(60, 60);
    drag(&mut engine, &[(5.0, 5.0), (40.0, 40.0)]);
    let before = engine.surface().pixels().to_vec();

    // Declined: byte-for-byte untouched.
    engine.change_background(Color32::BLUE, false);
    assert_eq!(engine.surface().pixels(), &before[..]);
    assert_eq!(engine.tools().background, Color32::WHITE);

    // Confirmed: every pixel becomes the new paper color.
    engine.change_background(Color32::BLUE, true);
    assert!(engine.surface().pixels().iter().all(|&p| p == Color32::BLUE));
    assert_eq!(engine.tools().background, Color32::BLUE);
}

#[test]
fn eraser_paints_paper_color_at_double_width() {
    let mut engine = engine(100, 100);
    engine.change_background(Color32::from_rgb(0x87, 0xce, 0xeb), true);
    engine.tools_mut().unwrap().color = Color32::BLACK;

    // Paint a thick black band, then erase through the middle of it.
    drag(&mut engine, &[(10.0, 50.0), (90.0, 50.0)]);
    set_tool(&mut engine, ToolKind::Eraser);
    drag(&mut engine, &[(10.0, 50.0), (90.0, 50.0)]);

    // The stroke's center is back to paper color.
    assert_eq!(engine.surface().get(50, 50), Some(Color32::from_rgb(0x87, 0xce, 0xeb)));
    // Double width: 10-wide brush erased with a 20-wide band, so pixels the
    // brush covered at offset 4 are gone too.
    assert_eq!(engine.surface().get(50, 54), Some(Color32::from_rgb(0x87, 0xce, 0xeb)));
}

#[test]
fn resize_keeps_origin_content() {
    let mut engine = engine(80, 80);
    engine.tools_mut().unwrap().color = Color32::RED;
    set_tool(&mut engine, ToolKind::Square);
    drag(&mut engine, &[(10.0, 10.0), (30.0, 30.0)]);

    engine.resize(120, 50);
    assert_eq!(engine.surface().get(20, 20), Some(Color32::RED));
    assert_eq!(engine.surface().width(), 120);
    assert_eq!(engine.surface().height(), 50);
    // Newly exposed area takes the paper color.
    assert_eq!(engine.surface().get(110, 20), Some(Color32::WHITE));
}

#[test]
fn zero_area_surface_makes_everything_a_noop() {
    let mut engine = PaintEngine::new(0, 0);
    let mut rng = StdRng::seed_from_u64(0);
    engine.begin_gesture(Pos2::new(5.0, 5.0));
    assert!(!engine.has_active_gesture());
    engine.continue_gesture(Pos2::new(9.0, 9.0), &mut rng);
    engine.end_gesture();
    engine.clear();
    assert!(engine.export_png().is_err());
}

#[test]
fn sticker_stamps_on_press_without_a_drag_phase() {
    let mut engine = engine(160, 160);
    set_tool(&mut engine, ToolKind::Sticker);
    engine.begin_gesture(Pos2::new(80.0, 80.0));
    // The sticker tool has no drag phase; the gesture is already over.
    assert!(!engine.has_active_gesture());
    let stamped = engine
        .surface()
        .pixels()
        .iter()
        .filter(|&&p| p != Color32::WHITE)
        .count();
    assert!(stamped > 0, "sticker left no mark");
}

#[test]
fn clear_floods_with_paper_color() {
    let mut engine = engine(40, 40);
    drag(&mut engine, &[(5.0, 5.0), (35.0, 35.0)]);
    engine.clear();
    assert!(engine.surface().pixels().iter().all(|&p| p == Color32::WHITE));
}

#[test]
fn export_png_round_trips_through_the_image_crate() {
    let mut engine = engine(32, 24);
    engine.tools_mut().unwrap().color = Color32::RED;
    set_tool(&mut engine, ToolKind::Square);
    drag(&mut engine, &[(4.0, 4.0), (20.0, 16.0)]);

    let bytes = engine.export_png().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 24);
    assert_eq!(decoded.get_pixel(10, 10).0, [255, 0, 0, 255]);
}

#[test]
fn palette_is_locked_while_a_gesture_is_active() {
    let mut engine = engine(60, 60);
    engine.begin_gesture(Pos2::new(10.0, 10.0));
    assert!(engine.has_active_gesture());
    assert!(engine.tools_mut().is_none(), "tool state is read-only mid-gesture");
    engine.end_gesture();
    assert!(engine.tools_mut().is_some());
}
