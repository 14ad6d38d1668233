// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How proposed translations are bounded against the viewport.
///
/// This enum is consulted by [`crate::clamp_with`] and by
/// [`crate::ZoomTransform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ClampMode {
    /// Keep the scaled content covering the whole viewport on both axes.
    ///
    /// Each axis of length `d` at scale `s` is bounded to `[d * (1 - s), 0]`,
    /// so no edge of the viewport ever shows past the content.
    #[default]
    EdgeLocked,
    /// Edge-lock the horizontal axis and anchor the vertical axis around a
    /// quarter-height margin.
    ///
    /// With `q = height / 4`, the vertical translation is bounded to
    /// `[height * (1 - s) - q * s, q * (s - 1) + q * s]`. This lets the map
    /// drift vertically by up to `q * s` past either edge.
    ///
    /// The horizontal axis keeps the edge-locked bound `[width * (1 - s), 0]`
    /// exactly; there is no horizontal slack in this mode.
    QuarterAnchored,
}
