// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=geoview_map --heading-base-level=0

//! Geoview Map: an interactive world map as an explicit context object.
//!
//! [`MapView`] draws country polygons, meteorite strikes and labelled points
//! through a host-supplied [`Projection`] into a retained [`Scene`], and
//! keeps it interactive: clamped pan/zoom, hover tooltips, click-to-location
//! and debounced re-layout on resize. The scene can be exported as SVG.
//!
//! The host owns I/O and the clock. It fetches data documents, hands decoded
//! records (or raw JSON via [`MapView::load_json`]) to the view, and feeds
//! input as [`MapEvent`]s, optionally through a [`Subscriptions`] registry
//! and [`route`].
//!
//! ## Minimal example
//!
//! ```rust
//! use geoview_map::{GestureState, LonLat, MapConfig, MapView, Projection, Viewport};
//! use kurbo::Point;
//!
//! /// Equirectangular projection filling the viewport.
//! struct PlateCarree { width: f64, height: f64 }
//!
//! impl Projection for PlateCarree {
//!     fn project(&self, at: LonLat) -> Option<Point> {
//!         Some(Point::new(
//!             (at.lon + 180.0) / 360.0 * self.width,
//!             (90.0 - at.lat) / 180.0 * self.height,
//!         ))
//!     }
//!     fn invert(&self, pt: Point) -> Option<LonLat> {
//!         Some(LonLat::new(
//!             pt.x / self.width * 360.0 - 180.0,
//!             90.0 - pt.y / self.height * 180.0,
//!         ))
//!     }
//!     fn fit(&mut self, viewport: Viewport) {
//!         self.width = viewport.width();
//!         self.height = viewport.height();
//!     }
//! }
//!
//! let mut map = MapView::new(MapConfig::default(), PlateCarree { width: 0.0, height: 0.0 }).unwrap();
//! map.add_point(LonLat::new(2.35, 48.86), "Paris");
//!
//! // Dragging the map down at 2x zoom is stopped at the top edge.
//! let t = map.apply_gesture(GestureState::new(2.0, -500.0, 50.0));
//! assert_eq!((t.translate.x, t.translate.y), (-500.0, 0.0));
//! assert!(map.to_svg().contains("transform=\"translate(-500,0) scale(2)\""));
//! ```

mod config;
mod data;
mod error;
mod events;
mod geo;
pub mod graticule;
mod scene;
mod tooltip;
mod view;

pub use config::{MapConfig, parse_color};
pub use data::{CapitalRecord, CountryFeature, Layer, LoadState, StrikeRecord};
pub use error::MapError;
pub use events::{EventKind, MapEvent, Outcome, SubscriptionId, Subscriptions, route};
pub use geo::{LonLat, Projection};
pub use scene::{Node, NodeId, Scene, Shape, path_data};
pub use tooltip::{Tooltip, country_html, strike_html};
pub use view::{MapResponse, MapView};

pub use geoview_view2d::{ClampMode, ClampedTransform, GestureState, Viewport, ZoomExtent};
