use std::io;

use thiserror::Error;

/// Failures while exporting or saving a drawing.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The surface has zero area (headless or mid-teardown); there is
    /// nothing to encode.
    #[error("canvas has no pixels to export")]
    EmptySurface,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("could not write image file: {0}")]
    Io(#[from] io::Error),
}
