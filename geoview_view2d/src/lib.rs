// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=geoview_view2d --heading-base-level=0

//! Geoview View 2D: bounded pan/zoom for projected maps.
//!
//! A projected world map is drawn once at scale `1` into a fixed
//! [`Viewport`]. Zooming and panning then apply a uniform
//! `translate(tx,ty) scale(s)` transform to the whole map group. This crate
//! computes that transform so the map never exposes empty space past its
//! edges, and derives the stroke width that keeps outlines visually constant
//! while zoomed.
//!
//! It focuses on:
//! - [`clamp`] / [`clamp_with`]: pure, per-gesture translation clamping.
//! - [`ClampedTransform`]: the result, convertible to a `kurbo::Affine` or an
//!   SVG `transform` attribute.
//! - [`stroke_scale`]: zoom-invariant stroke widths.
//! - [`ZoomTransform`]: the running zoom state, fed by wheel and drag input.
//!
//! It does **not** project coordinates or own a scene; callers draw the map
//! in unzoomed pixel space and apply the transform to a group node.
//!
//! ## Minimal example
//!
//! ```rust
//! use geoview_view2d::{GestureState, Viewport, clamp, stroke_scale};
//!
//! let viewport = Viewport::new(960.0, 480.0).unwrap();
//!
//! // The gesture proposes panning down past the top edge.
//! let t = clamp(viewport, GestureState::new(2.0, -500.0, 50.0));
//! assert_eq!((t.translate.x, t.translate.y), (-500.0, 0.0));
//!
//! // Country outlines keep a 1.5px look at 2x zoom.
//! assert_eq!(stroke_scale(1.5, t.scale), 0.75);
//! ```
//!
//! ## Zoom state
//!
//! ```rust
//! use kurbo::Point;
//! use geoview_view2d::{Viewport, ZoomTransform};
//!
//! let mut zoom = ZoomTransform::new(Viewport::new(960.0, 480.0).unwrap());
//! let t = zoom.zoom_about(Point::new(480.0, 240.0), 2.0);
//! assert_eq!(t.svg_transform().to_string(), "translate(-480,-240) scale(2)");
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod clamp;
mod modes;
mod viewport;
mod zoom;

pub use clamp::{
    ClampedTransform, GestureState, SvgTransform, clamp, clamp_axis, clamp_with, stroke_scale,
};
pub use modes::ClampMode;
pub use viewport::{Viewport, ViewportError};
pub use zoom::{ZoomExtent, ZoomTransform};
