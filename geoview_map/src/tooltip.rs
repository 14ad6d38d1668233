// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltip state and HTML templates.

use kurbo::{Point, Vec2};

use crate::data::{CountryFeature, StrikeRecord};
use crate::scene::escape;

/// A single floating tooltip shared by every hoverable shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    html: String,
    position: Point,
    visible: bool,
}

impl Tooltip {
    /// Shows `html` at `pointer + offset`.
    pub fn show(&mut self, html: String, pointer: Point, offset: Vec2) {
        self.html = html;
        self.position = pointer + offset;
        self.visible = true;
    }

    /// Moves a visible tooltip to follow the pointer.
    pub fn follow(&mut self, pointer: Point, offset: Vec2) {
        if self.visible {
            self.position = pointer + offset;
        }
    }

    /// Hides the tooltip, keeping its last content.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Whether the tooltip is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current HTML content.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Top-left position of the tooltip box.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }
}

/// Tooltip body for a country: its name.
#[must_use]
pub fn country_html(feature: &CountryFeature) -> String {
    escape(&feature.name)
}

/// Tooltip body for a meteorite strike: name and year, mass and class.
#[must_use]
pub fn strike_html(strike: &StrikeRecord) -> String {
    let mass = strike
        .mass
        .map_or_else(|| String::from("unknown"), |m| m.to_string());
    let class = strike.recclass.as_deref().unwrap_or("unknown");
    format!(
        "<h3> {} {}</h3><p>Mass: {} grams</p><p>Class: {}</p>",
        escape(&strike.name),
        escape(strike.year_prefix()),
        mass,
        escape(class),
    )
}
