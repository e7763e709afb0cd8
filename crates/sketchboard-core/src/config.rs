//! Engine settings.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};

/// Tunable behaviour of a [`Canvas`](crate::Canvas).
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stroke color applied to new items.
    pub stroke_color: SerializableColor,
    /// Stroke width applied to new items, in logical units.
    pub stroke_width: f64,
    /// Content of a freshly placed text item.
    pub placeholder_text: String,
    /// Font size of a freshly placed text item.
    pub font_size: f64,
    /// Zoom change per `zoom_in` / `zoom_out` step.
    pub zoom_step: f64,
    /// Lowest zoom the camera accepts.
    pub min_zoom: f64,
    /// Highest zoom the camera accepts.
    pub max_zoom: f64,
    /// Smallest width/height a resize may produce, in logical units.
    pub min_transform_size: f64,
    /// Hit-test tolerance in screen pixels.
    pub hit_tolerance: f64,
    /// Marquee drags shorter than this (screen pixels) count as clicks.
    pub click_threshold: f64,
    /// Imported images larger than this (logical units) are scaled down.
    pub max_image_size: f64,
    /// Maximum number of undo steps kept. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 5.0,
            placeholder_text: "Start typing".to_string(),
            font_size: 20.0,
            zoom_step: 0.1,
            min_zoom: 0.1,
            max_zoom: 2.0,
            min_transform_size: 5.0,
            hit_tolerance: 4.0,
            click_threshold: 3.0,
            max_image_size: 800.0,
            history_limit: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields keep their defaults and
    /// out-of-range values are replaced, see [`Settings::validated`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// Replace values the engine cannot work with by their defaults.
    ///
    /// Sizes, zoom limits and the zoom step must be finite and positive;
    /// tolerances may be zero. A `max_zoom` below `min_zoom` is raised to it.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        self.stroke_width = positive_or("stroke_width", self.stroke_width, defaults.stroke_width);
        self.font_size = positive_or("font_size", self.font_size, defaults.font_size);
        self.zoom_step = positive_or("zoom_step", self.zoom_step, defaults.zoom_step);
        self.min_zoom = positive_or("min_zoom", self.min_zoom, defaults.min_zoom);
        self.max_zoom = positive_or("max_zoom", self.max_zoom, defaults.max_zoom);
        if self.max_zoom < self.min_zoom {
            log::warn!("max_zoom {} is below min_zoom {}, raising it", self.max_zoom, self.min_zoom);
            self.max_zoom = self.min_zoom;
        }
        self.min_transform_size =
            positive_or("min_transform_size", self.min_transform_size, defaults.min_transform_size);
        self.max_image_size = positive_or("max_image_size", self.max_image_size, defaults.max_image_size);
        self.hit_tolerance = non_negative_or("hit_tolerance", self.hit_tolerance, defaults.hit_tolerance);
        self.click_threshold = non_negative_or("click_threshold", self.click_threshold, defaults.click_threshold);
        self
    }

    /// Serialize the settings to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn positive_or(name: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("setting {name} = {value} must be positive, using {default}");
        default
    }
}

fn non_negative_or(name: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("setting {name} = {value} must not be negative, using {default}");
        default
    }
}
