// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use geoview_map::MapConfig;
//!
//! let config = MapConfig::from_json_str(r#"{ "width": 1200, "graticule": true }"#).unwrap();
//! assert_eq!(config.width, 1200.0);
//! assert_eq!(config.zoom_extent.max, 9.0);
//! ```

use std::path::Path;

use geoview_view2d::{ClampMode, ZoomExtent};
use kurbo::Vec2;
use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Layout, zoom and styling parameters for a [`crate::MapView`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Viewport width in pixels.
    pub width: f64,
    /// Height as a fraction of width.
    pub aspect: f64,
    /// Permitted zoom scales.
    pub zoom_extent: ZoomExtent,
    /// How pans are bounded against the viewport.
    pub clamp_mode: ClampMode,
    /// Country outline width at scale 1, in pixels.
    pub base_stroke_width: f64,
    /// Trailing delay for resize coalescing.
    pub resize_debounce_ms: u64,
    /// Tooltip position relative to the pointer, `[dx, dy]`.
    pub tooltip_offset: [f64; 2],
    /// Radius of plotted points such as capitals.
    pub point_radius: f64,
    /// Offset of point labels from their point, applied on both axes.
    pub label_offset: f64,
    /// Opacity of strike circles.
    pub strike_opacity: f64,
    /// Fill for countries whose feature carries no colour.
    pub country_fill: String,
    /// Whether to draw 10° graticule lines behind the map.
    pub graticule: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            aspect: 0.5,
            zoom_extent: ZoomExtent::default(),
            clamp_mode: ClampMode::EdgeLocked,
            base_stroke_width: 1.5,
            resize_debounce_ms: 200,
            tooltip_offset: [10.0, -120.0],
            point_radius: 1.5,
            label_offset: 2.0,
            strike_opacity: 0.4,
            country_fill: String::from("rgb(31,119,180)"),
            graticule: false,
        }
    }
}

impl MapConfig {
    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Decode`] for malformed JSON and
    /// [`MapError::Config`] for rejected values.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let config: Self = serde_json::from_str(json).map_err(|e| MapError::decode("config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// As [`MapConfig::from_json_str`], plus [`MapError::Io`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), MapError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(MapError::Config(format!("width must be positive, got {}", self.width)));
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(MapError::Config(format!("aspect must be positive, got {}", self.aspect)));
        }
        let ZoomExtent { min, max } = self.zoom_extent;
        if !(min >= 1.0 && max >= min && max.is_finite()) {
            return Err(MapError::Config(format!(
                "zoom_extent must satisfy 1 <= min <= max, got [{min}, {max}]"
            )));
        }
        if !(self.base_stroke_width.is_finite() && self.base_stroke_width >= 0.0) {
            return Err(MapError::Config(format!(
                "base_stroke_width must be non-negative, got {}",
                self.base_stroke_width
            )));
        }
        if !(self.point_radius.is_finite() && self.point_radius >= 0.0) {
            return Err(MapError::Config(format!(
                "point_radius must be non-negative, got {}",
                self.point_radius
            )));
        }
        if !self.label_offset.is_finite() {
            return Err(MapError::Config(format!(
                "label_offset must be finite, got {}",
                self.label_offset
            )));
        }
        if !self.tooltip_offset.iter().all(|v| v.is_finite()) {
            return Err(MapError::Config(format!(
                "tooltip_offset must be finite, got {:?}",
                self.tooltip_offset
            )));
        }
        if !(0.0..=1.0).contains(&self.strike_opacity) {
            return Err(MapError::Config(format!(
                "strike_opacity must be within [0, 1], got {}",
                self.strike_opacity
            )));
        }
        parse_color(&self.country_fill)?;
        Ok(())
    }

    /// Viewport height implied by `width` and `aspect`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.width * self.aspect
    }

    /// Tooltip offset as a vector.
    #[must_use]
    pub fn tooltip_offset(&self) -> Vec2 {
        Vec2::new(self.tooltip_offset[0], self.tooltip_offset[1])
    }

    /// Parsed default country fill.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Color`] if `country_fill` is not a CSS colour.
    pub fn country_fill(&self) -> Result<Color, MapError> {
        parse_color(&self.country_fill)
    }
}

/// Parses a CSS colour string such as `#1f77b4`, `rgb(31,119,180)` or `white`.
///
/// # Errors
///
/// Returns [`MapError::Color`] when the string is not a recognised colour.
pub fn parse_color(input: &str) -> Result<Color, MapError> {
    peniko::color::parse_color(input)
        .map(|c| c.to_alpha_color())
        .map_err(|_| MapError::Color {
            input: input.to_owned(),
        })
}
