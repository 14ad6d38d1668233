// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use geoview_view2d::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// Serialized as a `[longitude, latitude]` pair, matching GeoJSON positions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    /// Longitude in degrees, east positive.
    pub lon: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl LonLat {
    /// Creates a position from longitude and latitude.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` if both components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}

/// A map projection supplied by the host.
///
/// The map never implements a projection itself. It calls [`Projection::fit`]
/// whenever the layout changes, then draws everything in the unzoomed pixel
/// space the projection produces.
pub trait Projection {
    /// Projects a geographic position into map pixels.
    ///
    /// Returns `None` for positions the projection cannot represent (for
    /// example the poles under Mercator).
    fn project(&self, at: LonLat) -> Option<Point>;

    /// Maps a map pixel back to a geographic position.
    fn invert(&self, pt: Point) -> Option<LonLat>;

    /// Adapts the projection to a new viewport.
    ///
    /// A world map typically translates to the viewport centre and scales to
    /// `width / 2π`.
    fn fit(&mut self, viewport: Viewport);
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn project(&self, at: LonLat) -> Option<Point> {
        (**self).project(at)
    }

    fn invert(&self, pt: Point) -> Option<LonLat> {
        (**self).invert(pt)
    }

    fn fit(&mut self, viewport: Viewport) {
        (**self).fit(viewport);
    }
}
