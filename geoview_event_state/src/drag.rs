// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-pan state: turn pointer moves into pan deltas and tell drags from clicks.
//!
//! ## Usage
//!
//! 1) Call [`DragState::start`] on pointer down with the pointer position.
//! 2) On each pointer move, call [`DragState::update`] and feed the returned
//!    delta to the zoom state as a pan.
//! 3) On pointer up, call [`DragState::end`]; it reports whether the gesture
//!    was a click (the pointer never left the click tolerance) or a pan.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use geoview_event_state::drag::{DragEnd, DragState};
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//!
//! let delta = drag.update(Point::new(15.0, 25.0)).unwrap();
//! assert_eq!((delta.x, delta.y), (5.0, 5.0));
//!
//! assert_eq!(drag.end(), Some(DragEnd::Pan));
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// Distance in pixels a pointer may travel and still count as a click.
pub const DEFAULT_CLICK_TOLERANCE: f64 = 3.0;

/// How a finished drag should be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEnd {
    /// The pointer stayed within the click tolerance for the whole gesture.
    Click,
    /// The pointer travelled far enough to be a pan.
    Pan,
}

/// Tracks one pointer drag over the map surface.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    start_pos: Option<Point>,
    last_pos: Option<Point>,
    click_tolerance: f64,
    moved: bool,
}

impl Default for DragState {
    fn default() -> Self {
        Self::with_click_tolerance(DEFAULT_CLICK_TOLERANCE)
    }
}

impl DragState {
    /// Creates an idle drag state with a custom click tolerance in pixels.
    #[must_use]
    pub fn with_click_tolerance(click_tolerance: f64) -> Self {
        Self {
            start_pos: None,
            last_pos: None,
            click_tolerance: click_tolerance.abs(),
            moved: false,
        }
    }

    /// Starts tracking a drag from `pos`, discarding any drag in progress.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.moved = false;
    }

    /// Records a pointer move and returns the delta since the previous one.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        let last = self.last_pos.replace(pos).unwrap_or(start);
        if (pos - start).hypot2() > self.click_tolerance * self.click_tolerance {
            self.moved = true;
        }
        Some(pos - last)
    }

    /// Offset of `current_pos` from the drag start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Ends the drag, returning how it should be interpreted.
    ///
    /// Returns `None` if no drag was active.
    pub fn end(&mut self) -> Option<DragEnd> {
        self.start_pos.take()?;
        self.last_pos = None;
        let kind = if self.moved {
            DragEnd::Pan
        } else {
            DragEnd::Click
        };
        self.moved = false;
        Some(kind)
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
