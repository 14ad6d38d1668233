// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for map construction, data decoding and scene access.

use geoview_view2d::ViewportError;
use thiserror::Error;

use crate::scene::NodeId;

/// Errors raised by [`crate::MapView`] and its data helpers.
#[derive(Debug, Error)]
pub enum MapError {
    /// The requested layout produced an unusable viewport.
    #[error("invalid viewport: {0}")]
    Viewport(#[from] ViewportError),

    /// A data document could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded, for example "strike records".
        what: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Reading a data or config file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value was rejected.
    #[error("invalid config: {0}")]
    Config(String),

    /// A colour string could not be parsed.
    #[error("invalid colour {input:?}")]
    Color {
        /// The rejected input.
        input: String,
    },

    /// A scene node id did not refer to a live node.
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),
}

impl MapError {
    pub(crate) fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { what, source }
    }
}
