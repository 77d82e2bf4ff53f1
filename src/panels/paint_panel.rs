use std::path::PathBuf;
use std::time::{Duration, Instant};

use egui::{Color32, Pos2, Rect, RichText, Sense, TextureOptions, Ui, vec2};
use log::{info, warn};

use crate::canvas::{
    BACKGROUNDS, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, PALETTE, PaintEngine, STICKERS, ToolKind,
    ToolState,
};
use crate::input;

/// The painting studio: the drawing engine plus its palette chrome (colors,
/// tools, stickers, paper, width slider, clear/save) and the destructive
/// background-change confirmation modal.
pub struct PaintStudio {
    engine: PaintEngine,
    texture: Option<egui::TextureHandle>,
    /// A background change waiting for the yes/no dialog.
    pending_background: Option<Color32>,
    show_stickers: bool,
    saved_note: Option<(String, Instant)>,
}

impl Default for PaintStudio {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintStudio {
    pub fn new() -> Self {
        Self {
            engine: PaintEngine::default(),
            texture: None,
            pending_background: None,
            show_stickers: false,
            saved_note: None,
        }
    }

    fn apply_tools(&mut self, tools: ToolState) {
        if let Some(current) = self.engine.tools_mut() {
            *current = tools;
        }
    }

    fn save_drawing(&mut self) {
        match self.engine.export_png() {
            Ok(bytes) => {
                let path = save_path();
                match std::fs::write(&path, bytes) {
                    Ok(()) => {
                        info!("drawing saved to {}", path.display());
                        self.saved_note =
                            Some((format!("Saved {}", path.display()), Instant::now()));
                    }
                    Err(err) => warn!("could not save drawing: {err}"),
                }
            }
            Err(err) => warn!("could not export drawing: {err}"),
        }
    }

    /// Returns true on exit. `shared_tools` carries the palette across
    /// sessions; it is synced back every frame.
    pub fn ui(&mut self, ui: &mut Ui, shared_tools: &mut ToolState) -> bool {
        // Adopt the persisted palette on first open.
        if self.texture.is_none() && *self.engine.tools() != *shared_tools {
            self.apply_tools(shared_tools.clone());
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🎨 Painting Studio");
            let mut tools = self.engine.tools().clone();
            let shadow_label = if tools.shadow_enabled { "✨ 3D ON" } else { "3D OFF" };
            if ui.selectable_label(tools.shadow_enabled, shadow_label).clicked() {
                tools.shadow_enabled = !tools.shadow_enabled;
                self.apply_tools(tools);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("❌ Close").clicked() {
                    exit = true;
                }
                if let Some((note, at)) = &self.saved_note {
                    if at.elapsed() < Duration::from_secs(4) {
                        ui.label(RichText::new(note).weak());
                    }
                }
            });
        });
        ui.add_space(4.0);

        ui.horizontal_top(|ui| {
            self.color_strip(ui);
            // Reserve the tool column on the right, canvas takes the rest.
            let canvas_width = (ui.available_width() - 130.0).max(50.0);
            let canvas_height = (ui.available_height() - 48.0).max(50.0);
            self.canvas(ui, vec2(canvas_width, canvas_height));
            self.tool_column(ui);
        });

        self.width_slider(ui);
        self.background_modal(ui);

        // Keep the persisted palette in sync with what the child picked.
        if *shared_tools != *self.engine.tools() {
            *shared_tools = self.engine.tools().clone();
        }
        exit
    }

    fn color_strip(&mut self, ui: &mut Ui) {
        ui.vertical(|ui| {
            let mut tools = self.engine.tools().clone();
            let mut changed = false;
            for color in PALETTE {
                let selected = tools.color == color && tools.tool != ToolKind::Eraser;
                let swatch = egui::Button::new("  ")
                    .fill(color)
                    .min_size(vec2(36.0, 36.0))
                    .stroke(if selected {
                        egui::Stroke::new(3.0, Color32::from_gray(40))
                    } else {
                        egui::Stroke::new(1.0, Color32::from_gray(200))
                    });
                if ui.add(swatch).clicked() {
                    tools.color = color;
                    // Picking a color while erasing flips back to the brush.
                    if tools.tool == ToolKind::Eraser {
                        tools.tool = ToolKind::Brush;
                    }
                    changed = true;
                }
            }
            ui.separator();
            if ui
                .selectable_label(tools.tool == ToolKind::Eraser, "🧽")
                .on_hover_text("Eraser")
                .clicked()
            {
                tools.tool = ToolKind::Eraser;
                changed = true;
            }
            if changed {
                self.apply_tools(tools);
            }
        });
    }

    fn tool_column(&mut self, ui: &mut Ui) {
        ui.vertical(|ui| {
            ui.set_width(120.0);
            let mut tools = self.engine.tools().clone();
            let mut changed = false;
            let mut tool_button = |ui: &mut Ui, kind: ToolKind, label: &str| {
                if ui.selectable_label(tools.tool == kind, label).clicked() {
                    tools.tool = kind;
                    changed = true;
                }
            };
            tool_button(ui, ToolKind::Brush, "🖌 Brush");
            tool_button(ui, ToolKind::Spray, "💨 Spray");
            ui.separator();
            tool_button(ui, ToolKind::Square, "⬛ Square");
            tool_button(ui, ToolKind::Circle, "⚫ Circle");
            tool_button(ui, ToolKind::Triangle, "🔺 Triangle");
            ui.separator();

            ui.label(RichText::new("Paper").small().weak());
            ui.horizontal_wrapped(|ui| {
                for (name, color) in BACKGROUNDS {
                    let swatch = egui::Button::new("  ").fill(color).min_size(vec2(24.0, 24.0));
                    if ui.add(swatch).on_hover_text(name).clicked() {
                        self.pending_background = Some(color);
                    }
                }
            });
            ui.separator();

            let sticker_label = format!("{} Sticker", tools.sticker);
            if ui
                .selectable_label(tools.tool == ToolKind::Sticker, sticker_label)
                .clicked()
            {
                tools.tool = ToolKind::Sticker;
                self.show_stickers = !self.show_stickers;
                changed = true;
            }
            if self.show_stickers {
                ui.horizontal_wrapped(|ui| {
                    for sticker in STICKERS {
                        if ui.button(RichText::new(sticker).size(18.0)).clicked() {
                            tools.sticker = sticker.to_owned();
                            tools.tool = ToolKind::Sticker;
                            self.show_stickers = false;
                            changed = true;
                        }
                    }
                });
            }
            ui.separator();

            if ui.button("🗑 Clear").clicked() {
                self.engine.clear();
            }
            if ui.button("💾 Save").clicked() {
                self.save_drawing();
            }
            if changed {
                self.apply_tools(tools);
            }
        });
    }

    fn canvas(&mut self, ui: &mut Ui, size: egui::Vec2) {
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;
        self.engine
            .resize(rect.width().max(0.0) as usize, rect.height().max(0.0) as usize);

        // Pointer -> gesture. A stationary click is the sticker's no-drag
        // stamp; drags feed the active tool.
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(local) = input::canvas_local(pos, rect) {
                    self.engine.begin_gesture(local);
                }
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = input::canvas_local_clamped(pos, rect);
                self.engine.continue_gesture(local, &mut rand::rng());
            }
        }
        if response.drag_stopped() {
            self.engine.end_gesture();
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(local) = input::canvas_local(pos, rect) {
                    self.engine.begin_gesture(local);
                    self.engine.end_gesture();
                }
            }
        }

        // Upload the surface and draw it. With no texture (headless) the
        // frame is simply skipped.
        let image = self.engine.surface().to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ui.ctx()
                        .load_texture("paint-canvas", image, TextureOptions::NEAREST));
            }
        }
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    fn width_slider(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Brush Size").small().weak());
            let mut tools = self.engine.tools().clone();
            let mut width = tools.stroke_width;
            if ui
                .add(egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH))
                .changed()
            {
                tools.set_stroke_width(width);
                self.apply_tools(tools.clone());
            }
            // Live preview dot.
            let (rect, _) = ui.allocate_exact_size(vec2(44.0, 44.0), Sense::hover());
            ui.painter()
                .circle_filled(rect.center(), tools.stroke_width / 3.0, tools.color);
        });
    }

    fn background_modal(&mut self, ui: &mut Ui) {
        let Some(color) = self.pending_background else {
            return;
        };
        egui::Window::new("Change paper?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, vec2(0.0, 0.0))
            .show(ui.ctx(), |ui| {
                ui.label("Changing background will clear your drawing. OK?");
                ui.horizontal(|ui| {
                    if ui.button("Yes, new paper").clicked() {
                        self.engine.change_background(color, true);
                        self.pending_background = None;
                    }
                    if ui.button("No, keep it").clicked() {
                        self.engine.change_background(color, false);
                        self.pending_background = None;
                    }
                });
            });
    }
}

fn save_path() -> PathBuf {
    let dir = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    for n in 1..1000 {
        let candidate = dir.join(format!("kidspark-art-{n}.png"));
        if !candidate.exists() {
            return candidate;
        }
    }
    dir.join("kidspark-art.png")
}
