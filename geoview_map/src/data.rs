// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map data: decoded country features and point records.
//!
//! Fetching is the host's job. These types deserialize the documents the map
//! consumes: a GeoJSON `FeatureCollection` of country polygons (already
//! decoded from its compact topology form), a GeoJSON collection of meteorite
//! strikes, and capital-city rows as found in the usual CSV export.

use std::fmt;

use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::config::parse_color;
use crate::error::MapError;
use crate::geo::LonLat;

/// The data layers a map loads independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Country polygons.
    Countries,
    /// Meteorite strike points.
    Strikes,
    /// Capital city points.
    Capitals,
}

impl Layer {
    /// All layers, in draw order.
    pub const ALL: [Self; 3] = [Self::Countries, Self::Strikes, Self::Capitals];

    /// Lower-case name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Strikes => "strikes",
            Self::Capitals => "capitals",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable loading state of a [`Layer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has arrived yet.
    #[default]
    Pending,
    /// Data arrived and was drawn.
    Loaded {
        /// Number of items drawn.
        count: usize,
    },
    /// The host reported a fetch or decode failure.
    Failed {
        /// Human readable reason.
        reason: String,
    },
}

/// A country polygon ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryFeature {
    /// Feature identifier, used as the element id.
    pub id: String,
    /// Display name, used for the title and tooltip.
    pub name: String,
    /// Optional fill from the feature properties.
    pub color: Option<Color>,
    /// Polygon rings; each ring is implicitly closed.
    pub rings: Vec<Vec<LonLat>>,
}

impl CountryFeature {
    /// Decodes a GeoJSON `FeatureCollection` of `Polygon`/`MultiPolygon`
    /// features.
    ///
    /// Features with other geometry types contribute no rings. A `color`
    /// property that is not a CSS colour is an error.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Decode`] for malformed JSON and [`MapError::Color`]
    /// for unparseable colours.
    pub fn collection_from_json(json: &str) -> Result<Vec<Self>, MapError> {
        let raw: FeatureCollection<RawCountry> =
            serde_json::from_str(json).map_err(|e| MapError::decode("country features", e))?;
        raw.features.into_iter().map(Self::try_from).collect()
    }
}

impl TryFrom<RawCountry> for CountryFeature {
    type Error = MapError;

    fn try_from(raw: RawCountry) -> Result<Self, Self::Error> {
        let color = raw
            .properties
            .color
            .as_deref()
            .map(parse_color)
            .transpose()?;
        let rings = match raw.geometry {
            Some(Geometry::Polygon { coordinates }) => coordinates,
            Some(Geometry::MultiPolygon { coordinates }) => {
                coordinates.into_iter().flatten().collect()
            }
            Some(Geometry::Other) | None => Vec::new(),
        };
        Ok(Self {
            id: raw.id.map(|id| id.to_string()).unwrap_or_default(),
            name: raw.properties.name.unwrap_or_default(),
            color,
            rings,
        })
    }
}

/// A meteorite strike.
#[derive(Clone, Debug, PartialEq)]
pub struct StrikeRecord {
    /// Meteorite name.
    pub name: String,
    /// Mass in grams, if recorded.
    pub mass: Option<f64>,
    /// Fall or find date as an ISO timestamp, if recorded.
    pub year: Option<String>,
    /// Meteorite classification.
    pub recclass: Option<String>,
    /// Strike location, if recorded.
    pub location: Option<LonLat>,
}

impl StrikeRecord {
    /// Decodes a GeoJSON `FeatureCollection` of strike points.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Decode`] for malformed JSON.
    pub fn collection_from_json(json: &str) -> Result<Vec<Self>, MapError> {
        let raw: FeatureCollection<RawStrike> =
            serde_json::from_str(json).map_err(|e| MapError::decode("strike records", e))?;
        Ok(raw.features.into_iter().map(Self::from).collect())
    }

    /// Four-digit year, taken from the start of the timestamp.
    #[must_use]
    pub fn year_prefix(&self) -> &str {
        let year = self.year.as_deref().unwrap_or("");
        year.get(..4).unwrap_or(year)
    }

    /// Circle radius: the tenth root of the mass, which compresses the
    /// many orders of magnitude meteorite masses span.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        self.mass
            .filter(|m| m.is_finite() && *m >= 0.0)
            .map(|m| m.powf(0.1))
    }
}

impl From<RawStrike> for StrikeRecord {
    fn from(raw: RawStrike) -> Self {
        let p = raw.properties;
        Self {
            name: p.name.unwrap_or_default(),
            mass: p.mass.and_then(Numeric::to_f64),
            year: p.year,
            recclass: p.recclass,
            location: match raw.geometry {
                Some(PointGeometry::Point { coordinates }) => Some(coordinates),
                Some(PointGeometry::Other) | None => None,
            },
        }
    }
}

/// A capital city row.
///
/// Rows are decoded from JSON objects keyed by the `CapitalName`,
/// `CapitalLatitude` and `CapitalLongitude` column names of the usual
/// country-capitals table; other columns are ignored.
///
/// ```
/// use geoview_map::{CapitalRecord, LonLat};
///
/// let rows = CapitalRecord::list_from_json(
///     r#"[{ "CountryName": "Peru", "CapitalName": "Lima",
///           "CapitalLatitude": -12.05, "CapitalLongitude": -77.05 }]"#,
/// )
/// .unwrap();
/// assert_eq!(rows[0].name, "Lima");
/// assert_eq!(rows[0].location(), LonLat::new(-77.05, -12.05));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapitalRecord {
    /// City name.
    #[serde(rename = "CapitalName")]
    pub name: String,
    /// Latitude in degrees.
    #[serde(rename = "CapitalLatitude")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "CapitalLongitude")]
    pub longitude: f64,
}

impl CapitalRecord {
    /// Position of the capital.
    #[must_use]
    pub fn location(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }

    /// Decodes a JSON array of capital rows.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Decode`] for malformed JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, MapError> {
        serde_json::from_str(json).map_err(|e| MapError::decode("capital records", e))
    }
}

#[derive(Deserialize)]
struct FeatureCollection<F> {
    features: Vec<F>,
}

#[derive(Deserialize)]
struct RawCountry {
    #[serde(default)]
    id: Option<Numeric>,
    #[serde(default)]
    properties: CountryProperties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Default, Deserialize)]
struct CountryProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Vec<LonLat>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<LonLat>>>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct RawStrike {
    #[serde(default)]
    properties: StrikeProperties,
    #[serde(default)]
    geometry: Option<PointGeometry>,
}

#[derive(Default, Deserialize)]
struct StrikeProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mass: Option<Numeric>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    recclass: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum PointGeometry {
    Point {
        coordinates: LonLat,
    },
    #[serde(other)]
    Other,
}

/// Source data stores numbers both as JSON numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn to_f64(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CapitalRecord, CountryFeature, Layer, StrikeRecord};
    use crate::{LonLat, MapError};

    const COUNTRIES: &str = r##"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "FRA",
                "properties": { "name": "France", "color": "#ff0000" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 45], [5, 45], [5, 50], [0, 45]]] }
            },
            {
                "type": "Feature",
                "id": 840,
                "properties": { "name": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[1, 1], [2, 1], [2, 2]]], [[[3, 3], [4, 3], [4, 4]]]]
                }
            },
            { "type": "Feature", "properties": {}, "geometry": { "type": "LineString", "coordinates": [] } }
        ]
    }"##;

    #[test]
    fn decodes_country_collection() {
        let features = CountryFeature::collection_from_json(COUNTRIES).unwrap();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].id, "FRA");
        assert_eq!(features[0].name, "France");
        assert_eq!(features[0].rings.len(), 1);
        assert_eq!(features[0].rings[0][1], LonLat::new(5.0, 45.0));
        let red = features[0].color.unwrap().to_rgba8();
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));

        assert_eq!(features[1].id, "840");
        assert!(features[1].color.is_none());
        assert_eq!(features[1].rings.len(), 2);

        assert!(features[2].rings.is_empty());
        assert_eq!(features[2].name, "");
    }

    #[test]
    fn bad_country_colour_is_an_error() {
        let json = r#"{ "features": [ { "properties": { "name": "X", "color": "nope" } } ] }"#;
        assert!(matches!(
            CountryFeature::collection_from_json(json),
            Err(MapError::Color { .. })
        ));
    }

    #[test]
    fn decodes_strikes_with_string_and_missing_fields() {
        let json = r#"{
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [6.08333, 50.775] },
                    "properties": { "mass": "21", "name": "Aachen", "year": "1880-01-01T00:00:00.000", "recclass": "L5" }
                },
                { "type": "Feature", "geometry": null, "properties": { "mass": 1000, "name": "Nowhere" } },
                { "type": "Feature", "properties": { "mass": "n/a", "name": "Blank" } }
            ]
        }"#;
        let strikes = StrikeRecord::collection_from_json(json).unwrap();
        assert_eq!(strikes.len(), 3);

        assert_eq!(strikes[0].mass, Some(21.0));
        assert_eq!(strikes[0].year_prefix(), "1880");
        assert_eq!(strikes[0].location, Some(LonLat::new(6.08333, 50.775)));
        assert_eq!(strikes[0].recclass.as_deref(), Some("L5"));

        assert_eq!(strikes[1].mass, Some(1000.0));
        assert_eq!(strikes[1].location, None);
        assert_eq!(strikes[1].year_prefix(), "");

        assert_eq!(strikes[2].mass, None);
        assert_eq!(strikes[2].radius(), None);
    }

    #[test]
    fn strike_radius_is_tenth_root() {
        let strike = StrikeRecord {
            name: String::new(),
            mass: Some(1024.0),
            year: None,
            recclass: None,
            location: None,
        };
        let r = strike.radius().unwrap();
        assert!((r - 2.0).abs() < 1e-12);
    }

    #[test]
    fn decodes_capitals() {
        let json = r#"[{ "CapitalName": "Paris", "CapitalLatitude": 48.86, "CapitalLongitude": 2.35 }]"#;
        let capitals = CapitalRecord::list_from_json(json).unwrap();
        assert_eq!(capitals[0].location(), LonLat::new(2.35, 48.86));
        assert!(CapitalRecord::list_from_json("{").is_err());
    }

    #[test]
    fn layer_names() {
        let names: Vec<String> = Layer::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["countries", "strikes", "capitals"]);
    }
}
