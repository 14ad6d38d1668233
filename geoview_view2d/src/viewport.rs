// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

/// Errors raised when constructing a [`Viewport`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// One of the dimensions was zero or negative.
    ///
    /// This usually means the host container has not been laid out yet.
    #[error("viewport dimensions must be positive, got {width}x{height}")]
    NonPositive {
        /// The rejected width.
        width: f64,
        /// The rejected height.
        height: f64,
    },
    /// One of the dimensions was NaN or infinite.
    #[error("viewport dimensions must be finite, got {width}x{height}")]
    NonFinite {
        /// The rejected width.
        width: f64,
        /// The rejected height.
        height: f64,
    },
}

/// Fixed-size visible drawing area, in pixels.
///
/// A `Viewport` is always strictly positive and finite on both axes; the
/// constructors reject anything else so clamping never divides into NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Creates a viewport of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError`] if either dimension is not a positive,
    /// finite number.
    pub fn new(width: f64, height: f64) -> Result<Self, ViewportError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(ViewportError::NonFinite { width, height });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(ViewportError::NonPositive { width, height });
        }
        Ok(Self { width, height })
    }

    /// Creates a viewport whose height is `width * aspect`.
    ///
    /// The world maps this crate targets are laid out with `aspect = 0.5`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError`] if the resulting dimensions are invalid.
    pub fn from_width(width: f64, aspect: f64) -> Result<Self, ViewportError> {
        Self::new(width, width * aspect)
    }

    /// Viewport width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Viewport size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The viewport as a rectangle anchored at the origin.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl TryFrom<Size> for Viewport {
    type Error = ViewportError;

    fn try_from(size: Size) -> Result<Self, Self::Error> {
        Self::new(size.width, size.height)
    }
}
