// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::modes::ClampMode;
use crate::viewport::Viewport;

/// Raw, unclamped transform proposed by a pointer or wheel gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    /// Proposed uniform scale. Expected to lie in the zoom extent.
    pub scale: f64,
    /// Proposed translation in view pixels.
    pub translate: Vec2,
}

impl GestureState {
    /// Creates a gesture proposal from a scale and a translation.
    #[must_use]
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate: Vec2::new(translate_x, translate_y),
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

/// Bounded transform produced by [`clamp`].
///
/// For `scale >= 1` the transformed content rectangle
/// `[tx, tx + scale * width] x [ty, ty + scale * height]` contains the whole
/// viewport under [`ClampMode::EdgeLocked`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampedTransform {
    /// Uniform scale.
    pub scale: f64,
    /// Clamped translation in view pixels.
    pub translate: Vec2,
}

impl ClampedTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// World (unzoomed map pixels) to view transform: scale, then translate.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Maps a view-space point back into unzoomed map space.
    #[must_use]
    pub fn invert_point(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.translate.x) / self.scale,
            (pt.y - self.translate.y) / self.scale,
        )
    }

    /// Rectangle covered by content of the given viewport after transforming.
    #[must_use]
    pub fn content_rect(&self, viewport: Viewport) -> Rect {
        Rect::new(
            self.translate.x,
            self.translate.y,
            self.translate.x + self.scale * viewport.width(),
            self.translate.y + self.scale * viewport.height(),
        )
    }

    /// Stroke width that renders as `base` pixels at this scale.
    #[must_use]
    pub fn stroke_width(&self, base: f64) -> f64 {
        stroke_scale(base, self.scale)
    }

    /// Returns a value rendering as an SVG `transform` attribute,
    /// `translate(tx,ty) scale(s)`.
    #[must_use]
    pub fn svg_transform(&self) -> SvgTransform {
        SvgTransform(*self)
    }
}

impl Default for ClampedTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<ClampedTransform> for GestureState {
    fn from(t: ClampedTransform) -> Self {
        Self {
            scale: t.scale,
            translate: t.translate,
        }
    }
}

/// Display adapter for [`ClampedTransform::svg_transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgTransform(ClampedTransform);

impl fmt::Display for SvgTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        write!(
            f,
            "translate({},{}) scale({})",
            t.translate.x, t.translate.y, t.scale
        )
    }
}

/// Clamps `gesture` with [`ClampMode::EdgeLocked`].
///
/// ```rust
/// use geoview_view2d::{GestureState, Viewport, clamp};
///
/// let viewport = Viewport::new(960.0, 480.0).unwrap();
/// let t = clamp(viewport, GestureState::new(4.0, 200.0, -2000.0));
/// assert_eq!((t.translate.x, t.translate.y), (0.0, -1440.0));
/// assert_eq!(t.svg_transform().to_string(), "translate(0,-1440) scale(4)");
/// ```
#[must_use]
pub fn clamp(viewport: Viewport, gesture: GestureState) -> ClampedTransform {
    clamp_with(ClampMode::EdgeLocked, viewport, gesture)
}

/// Clamps `gesture` so that the scaled content stays within the bounds
/// described by `mode`.
///
/// Scales below `1.0` (or NaN) are treated as `1.0`; the zoom extent already
/// guarantees this for well-behaved gesture sources.
#[must_use]
pub fn clamp_with(mode: ClampMode, viewport: Viewport, gesture: GestureState) -> ClampedTransform {
    let scale = normalize_scale(gesture.scale);
    let (w, h) = (viewport.width(), viewport.height());

    let x = clamp_axis(gesture.translate.x, w, scale);
    let y = match mode {
        ClampMode::EdgeLocked => clamp_axis(gesture.translate.y, h, scale),
        ClampMode::QuarterAnchored => {
            let q = h / 4.0;
            let lo = h * (1.0 - scale) - q * scale;
            let hi = q * (scale - 1.0) + q * scale;
            hi.min(gesture.translate.y.max(lo))
        }
    };

    ClampedTransform {
        scale,
        translate: Vec2::new(x, y),
    }
}

/// Bounds a single translation `t` on an axis of length `extent` at `scale`.
///
/// The result lies in `[extent * (1 - scale), 0]`.
#[must_use]
pub fn clamp_axis(t: f64, extent: f64, scale: f64) -> f64 {
    let lower = extent * (1.0 - scale);
    0.0_f64.min(t.max(lower))
}

/// Stroke width that keeps outlines visually `base` pixels wide at `scale`.
#[must_use]
pub fn stroke_scale(base: f64, scale: f64) -> f64 {
    base / normalize_scale(scale)
}

fn normalize_scale(scale: f64) -> f64 {
    if scale >= 1.0 { scale } else { 1.0 }
}
