mod paint_panel;

pub use paint_panel::PaintStudio;
