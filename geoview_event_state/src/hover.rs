// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: compute enter/leave transitions as the pointer crosses map shapes.
//!
//! Map shapes do not nest, so only a single hovered target is tracked. Feed
//! the hit-test result for each pointer event into [`HoverState::update`];
//! it returns the transitions to apply, leave before enter.
//!
//! ```
//! use geoview_event_state::hover::{HoverEvent, HoverState};
//!
//! let mut hover = HoverState::new();
//! assert_eq!(hover.update(Some(7)), vec![HoverEvent::Enter(7)]);
//! assert!(hover.update(Some(7)).is_empty());
//! assert_eq!(
//!     hover.update(Some(9)),
//!     vec![HoverEvent::Leave(7), HoverEvent::Enter(9)]
//! );
//! assert_eq!(hover.update(None), vec![HoverEvent::Leave(9)]);
//! ```

use alloc::vec::Vec;

/// A hover transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered the target.
    Enter(K),
    /// The pointer left the target.
    Leave(K),
}

impl<K> HoverEvent<K> {
    /// The target this transition refers to.
    pub fn target(&self) -> &K {
        match self {
            Self::Enter(k) | Self::Leave(k) => k,
        }
    }
}

/// Tracks which target, if any, is under the pointer.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    current: Option<K>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Clone + PartialEq> HoverState<K> {
    /// Creates a state with nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered target.
    #[must_use]
    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Updates the hovered target and returns the resulting transitions.
    pub fn update(&mut self, target: Option<K>) -> Vec<HoverEvent<K>> {
        if self.current == target {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if let Some(prev) = self.current.take() {
            out.push(HoverEvent::Leave(prev));
        }
        if let Some(next) = target.clone() {
            out.push(HoverEvent::Enter(next));
        }
        self.current = target;
        out
    }

    /// Leaves `target` if it is the hovered one.
    ///
    /// Pointer-leave notifications can arrive for a shape that was already
    /// replaced by a newer enter; those are ignored.
    pub fn leave(&mut self, target: &K) -> Option<HoverEvent<K>> {
        if self.current.as_ref() == Some(target) {
            self.current.take().map(HoverEvent::Leave)
        } else {
            None
        }
    }

    /// Clears the hovered target, returning its leave transition if any.
    pub fn clear(&mut self) -> Option<HoverEvent<K>> {
        self.current.take().map(HoverEvent::Leave)
    }
}
