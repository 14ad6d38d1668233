// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=geoview_event_state --heading-base-level=0

//! Geoview Event State: small state machines for map interaction.
//!
//! Each module handles one interaction pattern that needs state across
//! several host events:
//!
//! - [`drag`]: turn pointer moves into pan deltas and tell drags from clicks
//! - [`hover`]: enter/leave transitions as the pointer crosses map shapes
//! - [`debounce`]: coalesce bursts of resize notifications into one re-layout
//!
//! None of them touch a scene or a clock. Callers pass in pointer positions,
//! hit-test results and millisecond timestamps, and interpret the returned
//! transitions however their rendering layer needs.
//!
//! ## Resize coalescing
//!
//! ```rust
//! use geoview_event_state::debounce::Debounce;
//!
//! let mut resize = Debounce::default(); // 200 ms
//! resize.schedule(1_000);
//! resize.schedule(1_100); // replaces the pending call
//! assert!(!resize.poll(1_250));
//! assert!(resize.poll(1_300));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod debounce;
pub mod drag;
pub mod hover;
