mod dashboard;
mod landing;

pub use dashboard::{DashboardAction, DashboardView};
pub use landing::landing_ui;
