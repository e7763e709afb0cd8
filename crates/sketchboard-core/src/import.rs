//! Image import from data URLs or raw file bytes.

use crate::shapes::{Image, ImageFormat, Shape};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Point;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur while importing an image.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// A probed image ready to be placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedImage {
    pub format: ImageFormat,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Normalized `data:<mime>;base64,<payload>` URL.
    pub data_url: String,
}

impl ImportedImage {
    /// Probe raw file bytes (file picker or drop).
    pub fn from_bytes(bytes: &[u8]) -> ImportResult<Self> {
        let format = ImageFormat::from_magic_bytes(bytes).ok_or(ImportError::UnsupportedFormat)?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::from)?
            .into_dimensions()?;
        log::debug!("probed {:?} image {}x{}", format, width, height);
        Ok(Self {
            format,
            width,
            height,
            data_url: to_data_url(format, bytes),
        })
    }

    /// Probe a `data:<mime>;base64,<payload>` URL.
    ///
    /// The format is taken from the payload's magic bytes; a mismatching
    /// declared mime type is logged and ignored.
    pub fn from_data_url(data_url: &str) -> ImportResult<Self> {
        let (mime, bytes) = parse_data_url(data_url)?;
        let imported = Self::from_bytes(&bytes)?;
        if mime != imported.format.mime_type() {
            log::warn!(
                "data URL declares {mime} but contains {}",
                imported.format.mime_type()
            );
        }
        Ok(imported)
    }

    /// Build an image item with its top-left corner at `position`, scaled
    /// down to fit a `max_size` square.
    pub fn into_shape(self, position: Point, max_size: f64) -> Shape {
        let image = Image::new(position, self.data_url, self.width, self.height, self.format)
            .fit_within(max_size, max_size);
        Shape::Image(image)
    }
}

/// Split a base64 data URL into its mime type and decoded payload.
pub fn parse_data_url(data_url: &str) -> ImportResult<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| ImportError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImportError::InvalidDataUrl("missing payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImportError::InvalidDataUrl("payload is not base64".to_string()))?;
    if mime.is_empty() {
        return Err(ImportError::InvalidDataUrl("missing mime type".to_string()));
    }
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_ascii_lowercase(), bytes))
}

/// Encode bytes as a base64 data URL of the given format.
pub fn to_data_url(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}
