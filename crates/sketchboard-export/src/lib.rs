//! Sketchboard Export Library
//!
//! Offline rasterizer for Sketchboard canvases. Renders the committed scene
//! with tiny-skia onto a background, encodes PNG and wraps it in a data URL
//! for download.

mod exporter;
pub mod raster;

pub use exporter::{
    ExportArea, ExportError, ExportOptions, ExportResult, export_data_url, export_pixmap, export_png,
};
pub use tiny_skia::Pixmap;
