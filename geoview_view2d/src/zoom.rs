// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::clamp::{ClampedTransform, GestureState, clamp_with};
use crate::modes::ClampMode;
use crate::viewport::Viewport;

/// Range of permitted zoom scales.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomExtent {
    /// Smallest permitted scale.
    pub min: f64,
    /// Largest permitted scale.
    pub max: f64,
}

impl ZoomExtent {
    /// Creates an extent, normalizing so that `min <= max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamps `scale` into the extent.
    #[must_use]
    pub fn apply(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    /// Returns `true` when `scale` lies within the extent.
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

impl Default for ZoomExtent {
    fn default() -> Self {
        Self { min: 1.0, max: 9.0 }
    }
}

/// Current pan/zoom state of a map.
///
/// `ZoomTransform` plays the role of a zoom behaviour attached to the map
/// surface: wheel and drag input are turned into a [`GestureState`], the
/// scale is bounded by the [`ZoomExtent`], and the translation is clamped
/// against the viewport. The clamped result becomes the starting point for
/// the next gesture, so the state can never wander outside the bounds.
#[derive(Clone, Debug)]
pub struct ZoomTransform {
    viewport: Viewport,
    extent: ZoomExtent,
    mode: ClampMode,
    current: ClampedTransform,
}

impl ZoomTransform {
    /// Creates an identity zoom state over `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            extent: ZoomExtent::default(),
            mode: ClampMode::default(),
            current: ClampedTransform::IDENTITY,
        }
    }

    /// Sets the zoom extent and re-clamps the current state.
    pub fn set_extent(&mut self, extent: ZoomExtent) {
        self.extent = extent;
        self.set_gesture(self.current.into());
    }

    /// Returns the zoom extent.
    #[must_use]
    pub fn extent(&self) -> ZoomExtent {
        self.extent
    }

    /// Sets the clamp mode and re-clamps the current state.
    pub fn set_clamp_mode(&mut self, mode: ClampMode) {
        if self.mode != mode {
            self.mode = mode;
            self.set_gesture(self.current.into());
        }
    }

    /// Returns the clamp mode.
    #[must_use]
    pub fn clamp_mode(&self) -> ClampMode {
        self.mode
    }

    /// Returns the viewport this state is clamped against.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the viewport and resets to identity.
    ///
    /// Translations computed against the old layout are meaningless against
    /// the new one.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reset();
    }

    /// Returns the current clamped transform.
    #[must_use]
    pub fn current(&self) -> ClampedTransform {
        self.current
    }

    /// Returns the current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.current.scale
    }

    /// Resets to the identity transform.
    pub fn reset(&mut self) {
        self.current = ClampedTransform::IDENTITY;
    }

    /// Applies a raw gesture proposal and returns the clamped result.
    pub fn set_gesture(&mut self, gesture: GestureState) -> ClampedTransform {
        let bounded = GestureState {
            scale: self.extent.apply(gesture.scale),
            translate: gesture.translate,
        };
        self.current = clamp_with(self.mode, self.viewport, bounded);
        self.current
    }

    /// Pans by a delta in view pixels.
    pub fn pan_by(&mut self, delta: Vec2) -> ClampedTransform {
        let gesture = GestureState {
            scale: self.current.scale,
            translate: self.current.translate + delta,
        };
        self.set_gesture(gesture)
    }

    /// Zooms by `factor` around `anchor` (in view pixels).
    ///
    /// The map point under the anchor stays under the anchor unless the
    /// clamp has to pull the content back into view. Non-positive factors are
    /// ignored.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> ClampedTransform {
        if factor.is_nan() || factor <= 0.0 {
            return self.current;
        }
        let old = self.current;
        let scale = self.extent.apply(old.scale * factor);
        let map_pt = old.invert_point(anchor);
        let translate = anchor.to_vec2() - map_pt.to_vec2() * scale;
        self.set_gesture(GestureState { scale, translate })
    }
}
