// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map events and a small subscription registry.
//!
//! Hosts translate their native input into [`MapEvent`]s. Subscribers run in
//! registration order and may stop an event with [`Outcome::Stop`], which
//! also suppresses the map's built-in handling when the event is delivered
//! through [`route`].
//!
//! ```
//! use geoview_map::{EventKind, MapEvent, Outcome, Subscriptions};
//! use kurbo::Point;
//!
//! let mut clicks = Vec::new();
//! let mut subs: Subscriptions<Vec<Point>> = Subscriptions::new();
//! subs.on(EventKind::Click, |seen, event| {
//!     if let MapEvent::Click { pos } = event {
//!         seen.push(*pos);
//!     }
//!     Outcome::Continue
//! });
//!
//! let stopped = subs.dispatch(&mut clicks, &MapEvent::Click { pos: Point::new(4.0, 2.0) });
//! assert!(!stopped);
//! assert_eq!(clicks, [Point::new(4.0, 2.0)]);
//! ```

use std::fmt;

use geoview_view2d::GestureState;
use kurbo::Point;
use tracing::debug;

use crate::error::MapError;
use crate::geo::Projection;
use crate::scene::NodeId;
use crate::view::{MapResponse, MapView};

/// Discriminant of a [`MapEvent`], used to register subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A zoom or pan gesture proposed a new transform.
    Zoom,
    /// The container width changed.
    Resize,
    /// The host clock advanced.
    Tick,
    /// A pointer button went down over the map.
    PointerDown,
    /// A pointer button was released.
    PointerUp,
    /// The pointer entered a shape.
    PointerOver,
    /// The pointer moved.
    PointerMove,
    /// The pointer left a shape.
    PointerLeave,
    /// A click on the map surface.
    Click,
}

/// Input delivered to a map.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    /// A gesture proposal, in view pixels.
    Zoom(GestureState),
    /// Wheel or pinch zoom by `factor` around `anchor`.
    Wheel {
        /// Fixed point of the zoom, in view pixels.
        anchor: Point,
        /// Multiplicative scale change.
        factor: f64,
    },
    /// New container width, with the host timestamp.
    Resize {
        /// Width in pixels.
        width: f64,
        /// Host time in milliseconds.
        now_ms: u64,
    },
    /// Host clock tick.
    Tick {
        /// Host time in milliseconds.
        now_ms: u64,
    },
    /// Pointer pressed.
    PointerDown {
        /// Pointer position in view pixels.
        pos: Point,
    },
    /// Pointer released.
    PointerUp {
        /// Pointer position in view pixels.
        pos: Point,
    },
    /// Pointer entered `target`.
    PointerOver {
        /// Shape under the pointer.
        target: NodeId,
        /// Pointer position in view pixels.
        pos: Point,
    },
    /// Pointer moved.
    PointerMove {
        /// Pointer position in view pixels.
        pos: Point,
    },
    /// Pointer left `target`.
    PointerLeave {
        /// Shape the pointer left.
        target: NodeId,
    },
    /// Click at a view position.
    Click {
        /// Pointer position in view pixels.
        pos: Point,
    },
}

impl MapEvent {
    /// The kind subscribers register for.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Zoom(_) | Self::Wheel { .. } => EventKind::Zoom,
            Self::Resize { .. } => EventKind::Resize,
            Self::Tick { .. } => EventKind::Tick,
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::PointerOver { .. } => EventKind::PointerOver,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerLeave { .. } => EventKind::PointerLeave,
            Self::Click { .. } => EventKind::Click,
        }
    }
}

/// Subscriber verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Let later subscribers and the default handling run.
    #[default]
    Continue,
    /// End dispatch for this event.
    Stop,
}

/// Handle returned by [`Subscriptions::on`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<C> = Box<dyn FnMut(&mut C, &MapEvent) -> Outcome>;

struct Entry<C> {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler<C>,
}

/// Per-kind subscriber lists over a context `C`.
pub struct Subscriptions<C> {
    next: u64,
    entries: Vec<Entry<C>>,
}

impl<C> Default for Subscriptions<C> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for Subscriptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field(
                "entries",
                &self
                    .entries
                    .iter()
                    .map(|e| (e.id, e.kind))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<C> Subscriptions<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut C, &MapEvent) -> Outcome + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.entries.push(Entry {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the subscribers for `event` in registration order.
    ///
    /// Returns `true` if one of them stopped the event.
    pub fn dispatch(&mut self, ctx: &mut C, event: &MapEvent) -> bool {
        let kind = event.kind();
        for entry in self.entries.iter_mut().filter(|e| e.kind == kind) {
            match (entry.handler)(ctx, event) {
                Outcome::Continue => {}
                Outcome::Stop => return true,
            }
        }
        false
    }
}

/// Delivers `event` to the subscribers, then to the map's built-in handling
/// unless a subscriber stopped it.
///
/// Returns `Ok(None)` when the event was stopped.
///
/// # Errors
///
/// Propagates errors from [`MapView::handle`].
pub fn route<P: Projection>(
    view: &mut MapView<P>,
    subs: &mut Subscriptions<MapView<P>>,
    event: &MapEvent,
) -> Result<Option<MapResponse>, MapError> {
    if subs.dispatch(view, event) {
        debug!(kind = ?event.kind(), "event stopped by subscriber");
        return Ok(None);
    }
    view.handle(event).map(Some)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use geoview_view2d::GestureState;
    use kurbo::Point;

    use super::{EventKind, MapEvent, Outcome, Subscriptions};

    #[test]
    fn dispatch_runs_matching_kind_in_order() {
        let mut subs: Subscriptions<Vec<&'static str>> = Subscriptions::new();
        subs.on(EventKind::Click, |log, _| {
            log.push("first");
            Outcome::Continue
        });
        subs.on(EventKind::Zoom, |log, _| {
            log.push("zoom");
            Outcome::Continue
        });
        subs.on(EventKind::Click, |log, _| {
            log.push("second");
            Outcome::Continue
        });

        let mut log = Vec::new();
        assert!(!subs.dispatch(&mut log, &MapEvent::Click { pos: Point::ZERO }));
        assert_eq!(log, ["first", "second"]);
    }

    #[test]
    fn stop_ends_dispatch() {
        let mut subs: Subscriptions<u32> = Subscriptions::new();
        subs.on(EventKind::Zoom, |n, _| {
            *n += 1;
            Outcome::Stop
        });
        subs.on(EventKind::Zoom, |n, _| {
            *n += 10;
            Outcome::Continue
        });

        let mut n = 0;
        let event = MapEvent::Zoom(GestureState::new(2.0, 0.0, 0.0));
        assert!(subs.dispatch(&mut n, &event));
        assert_eq!(n, 1);
    }

    #[test]
    fn wheel_counts_as_zoom() {
        let event = MapEvent::Wheel {
            anchor: Point::ZERO,
            factor: 2.0,
        };
        assert_eq!(event.kind(), EventKind::Zoom);
    }

    #[test]
    fn off_removes_subscriber() {
        let calls = Rc::new(RefCell::new(0));
        let mut subs: Subscriptions<()> = Subscriptions::new();
        let counter = Rc::clone(&calls);
        let id = subs.on(EventKind::Tick, move |_, _| {
            *counter.borrow_mut() += 1;
            Outcome::Continue
        });
        subs.dispatch(&mut (), &MapEvent::Tick { now_ms: 0 });
        assert!(subs.off(id));
        assert!(!subs.off(id));
        assert!(subs.is_empty());
        subs.dispatch(&mut (), &MapEvent::Tick { now_ms: 1 });
        assert_eq!(*calls.borrow(), 1);
    }
}
