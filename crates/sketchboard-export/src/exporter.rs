//! Canvas to PNG export.

use crate::raster::{draw_image_rect, flatten, pixmap_from_rgba, stroke_shape};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, Size, Vec2};
use sketchboard_core::Canvas;
use sketchboard_core::import::{ImportError, parse_data_url};
use sketchboard_core::shapes::{Image, SerializableColor, Shape};
use thiserror::Error;
use tiny_skia::Pixmap;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    EmptyArea,
    #[error("Export size {width}x{height} exceeds the {max} pixel limit")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("Could not allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },
    #[error("PNG encode failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Image item could not be drawn: {0}")]
    Image(#[from] ImportError),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Which part of the canvas to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportArea {
    /// Exactly what the camera shows in the viewport.
    #[default]
    Viewport,
    /// The bounds of all items, padded, at zoom 1.
    Content,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub area: ExportArea,
    /// Output pixels per screen pixel (device pixel ratio).
    pub pixel_ratio: f64,
    pub background: SerializableColor,
    /// Padding around content for [`ExportArea::Content`], in logical units.
    pub padding: f64,
    /// Largest accepted width or height in pixels.
    pub max_dimension: u32,
    /// File name without extension.
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            area: ExportArea::Viewport,
            pixel_ratio: 1.0,
            background: SerializableColor::white(),
            padding: 20.0,
            max_dimension: 16384,
            file_name: "sketchboard".to_string(),
        }
    }
}

impl ExportOptions {
    /// Export the padded content bounds instead of the viewport.
    pub fn content() -> Self {
        Self {
            area: ExportArea::Content,
            ..Self::default()
        }
    }

    /// Set the pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// File name to offer for a download, e.g. `sketchboard.png`.
    pub fn suggested_file_name(&self) -> String {
        let name = self.file_name.trim().trim_end_matches(".png");
        if name.is_empty() {
            "sketchboard.png".to_string()
        } else {
            format!("{name}.png")
        }
    }
}

/// Rasterize the canvas's committed scene.
pub fn export_pixmap(canvas: &Canvas, options: &ExportOptions) -> ExportResult<Pixmap> {
    let ratio = if options.pixel_ratio.is_finite() && options.pixel_ratio > 0.0 {
        options.pixel_ratio
    } else {
        log::warn!("invalid pixel ratio {}, using 1", options.pixel_ratio);
        1.0
    };

    let (size, view) = match options.area {
        ExportArea::Viewport => (
            canvas.viewport_size,
            Affine::scale(ratio) * canvas.camera.transform(),
        ),
        ExportArea::Content => {
            let bounds = canvas
                .scene()
                .bounds()
                .ok_or(ExportError::EmptyArea)?
                .inflate(options.padding, options.padding);
            (
                bounds.size(),
                Affine::scale(ratio) * Affine::translate(Vec2::new(-bounds.x0, -bounds.y0)),
            )
        }
    };
    let (width, height) = pixel_size(size, ratio, options.max_dimension)?;
    log::debug!("exporting {width}x{height} pixels");

    // Erasers cut into this layer only, never into the background
    let mut drawing = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
    for shape in canvas.scene().shapes_ordered() {
        draw_shape(&mut drawing, shape, view)?;
    }
    flatten(&drawing, options.background).ok_or(ExportError::Allocation { width, height })
}

/// Rasterize the canvas and encode it as PNG bytes.
pub fn export_png(canvas: &Canvas, options: &ExportOptions) -> ExportResult<Vec<u8>> {
    let pixmap = export_pixmap(canvas, options)?;
    let png = pixmap.encode_png()?;
    log::info!("PNG export complete: {} bytes", png.len());
    Ok(png)
}

/// Rasterize the canvas and wrap the PNG in a `data:image/png;base64,` URL.
pub fn export_data_url(canvas: &Canvas, options: &ExportOptions) -> ExportResult<String> {
    let png = export_png(canvas, options)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

fn pixel_size(size: Size, ratio: f64, max: u32) -> ExportResult<(u32, u32)> {
    let width = (size.width * ratio).ceil();
    let height = (size.height * ratio).ceil();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(ExportError::EmptyArea);
    }
    if width > max as f64 || height > max as f64 {
        return Err(ExportError::TooLarge {
            width: width.min(u32::MAX as f64) as u32,
            height: height.min(u32::MAX as f64) as u32,
            max,
        });
    }
    Ok((width as u32, height as u32))
}

fn draw_shape(drawing: &mut Pixmap, shape: &Shape, view: Affine) -> ExportResult<()> {
    match shape {
        Shape::Text(_) => {
            log::debug!("skipping text item {} in export", shape.id());
        }
        Shape::Image(image) => draw_image(drawing, image, view * shape.affine())?,
        _ => stroke_shape(drawing, shape, view),
    }
    Ok(())
}

fn draw_image(drawing: &mut Pixmap, image: &Image, to_pixels: Affine) -> ExportResult<()> {
    let (_, bytes) = parse_data_url(&image.src)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(ImportError::from)?
        .to_rgba8();
    let source = pixmap_from_rgba(&decoded).ok_or(ExportError::Allocation {
        width: decoded.width(),
        height: decoded.height(),
    })?;
    draw_image_rect(drawing, &source, image.as_rect(), to_pixels);
    Ok(())
}
