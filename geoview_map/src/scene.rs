// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small retained SVG-like scene.
//!
//! The scene stands in for the document the map draws into: groups, paths,
//! circles and text, each with a class, optional element id and title, and
//! a handful of presentation attributes. It can be exported as a standalone
//! SVG document for inspection or static output. It is not a general DOM.

use std::fmt::Write as _;

use kurbo::{BezPath, PathEl, Point};
use peniko::Color;

/// Handle to a node in a [`Scene`].
///
/// A slot index plus a generation. Removing a node frees its slot; when the
/// slot is reused its generation is bumped, so handles to removed nodes stay
/// stale and never alias the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    /// Slot index of the node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot when this handle was issued.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.1
    }
}

/// What a node draws.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A container for other nodes.
    Group,
    /// A path in map pixels.
    Path(BezPath),
    /// A circle.
    Circle {
        /// Centre in map pixels.
        center: Point,
        /// Radius in map pixels.
        radius: f64,
    },
    /// A text label anchored at its baseline start.
    Text {
        /// Anchor in map pixels.
        origin: Point,
        /// Label text.
        text: String,
    },
}

impl Shape {
    fn tag(&self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Path(_) => "path",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }
}

/// A scene node and its presentation attributes.
#[derive(Clone, Debug)]
pub struct Node {
    /// Geometry.
    pub shape: Shape,
    /// CSS class.
    pub class: Option<&'static str>,
    /// Element id.
    pub element_id: Option<String>,
    /// Element title.
    pub title: Option<String>,
    /// Fill colour.
    pub fill: Option<Color>,
    /// Element opacity.
    pub opacity: Option<f64>,
    /// Stroke width style.
    pub stroke_width: Option<f64>,
    /// `transform` attribute, for groups.
    pub transform: Option<String>,
    /// Hidden nodes are skipped on export.
    pub hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(shape: Shape, parent: Option<NodeId>) -> Self {
        Self {
            shape,
            class: None,
            element_id: None,
            title: None,
            fill: None,
            opacity: None,
            stroke_width: None,
            transform: None,
            hidden: false,
            parent,
            children: Vec::new(),
        }
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in draw order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Retained scene rooted at a single group.
///
/// Removed nodes release their slots to a free list that later appends
/// reuse, so the arena stays as large as the peak live scene.
#[derive(Clone, Debug)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene holding only the root group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 1,
                node: Some(Node::new(Shape::Group, None)),
            }],
            free: Vec::new(),
            live: 1,
        }
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0, 1)
    }

    /// Appends a node under `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live node of this scene, or if the scene
    /// exceeds `u32::MAX` slots.
    pub fn append(&mut self, parent: NodeId, shape: Shape) -> NodeId {
        assert!(
            self.node(parent).is_some(),
            "Scene: append under unknown parent {parent:?}"
        );
        let node = Node::new(shape, Some(parent));
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("Scene: too many nodes for u32 NodeId");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId(idx, 1)
        };
        self.live += 1;
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns the node for `id`, if live.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Returns the node for `id` mutably, if live.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Removes every descendant of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let mut stack = std::mem::take(&mut node.children);
        while let Some(child) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(child.index())
                && slot.generation == child.1
                && let Some(removed) = slot.node.take()
            {
                self.free.push(child.0);
                self.live -= 1;
                stack.extend(removed.children);
            }
        }
    }

    /// Ids of live nodes carrying `class`, in slot order.
    pub fn with_class(&self, class: &str) -> impl Iterator<Item = NodeId> {
        self.iter()
            .filter(move |(_, n)| n.class == Some(class))
            .map(|(id, _)| id)
    }

    /// Live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let id = NodeId(u32::try_from(i).ok()?, slot.generation);
            slot.node.as_ref().map(|n| (id, n))
        })
    }

    /// Number of live nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if only the root is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    /// Number of slots allocated, live or free.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Exports the scene as an SVG document of the given size.
    #[must_use]
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut svg = String::new();
        let w = fmt_num(width);
        let h = fmt_num(height);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        for &child in self.node(self.root()).map(Node::children).unwrap_or_default() {
            self.write_node(&mut svg, child);
        }
        svg.push_str("</svg>");
        svg
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.hidden {
            return;
        }
        let tag = node.shape.tag();
        let _ = write!(out, "<{tag}");
        match &node.shape {
            Shape::Group => {}
            Shape::Path(path) => {
                let _ = write!(out, " d=\"{}\"", path_data(path));
            }
            Shape::Circle { center, radius } => {
                let _ = write!(
                    out,
                    " cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius)
                );
            }
            Shape::Text { origin, .. } => {
                let _ = write!(out, " x=\"{}\" y=\"{}\"", fmt_num(origin.x), fmt_num(origin.y));
            }
        }
        if let Some(class) = node.class {
            let _ = write!(out, " class=\"{class}\"");
        }
        if let Some(element_id) = &node.element_id {
            let _ = write!(out, " id=\"{}\"", escape(element_id));
        }
        if let Some(transform) = &node.transform {
            let _ = write!(out, " transform=\"{transform}\"");
        }
        if let Some(fill) = node.fill {
            let (rgb, alpha) = color_to_svg(fill);
            let _ = write!(out, " fill=\"{rgb}\"");
            if alpha < 1.0 {
                let _ = write!(out, " fill-opacity=\"{}\"", fmt_num(alpha));
            }
        }
        if let Some(opacity) = node.opacity {
            let _ = write!(out, " opacity=\"{}\"", fmt_num(opacity));
        }
        if let Some(width) = node.stroke_width {
            let _ = write!(out, " style=\"stroke-width:{}\"", fmt_num(width));
        }
        out.push('>');
        if let Some(title) = &node.title {
            let _ = write!(out, "<title>{}</title>", escape(title));
        }
        if let Shape::Text { text, .. } = &node.shape {
            out.push_str(&escape(text));
        }
        for &child in &node.children {
            self.write_node(out, child);
        }
        let _ = write!(out, "</{tag}>");
    }
}

/// SVG path data for `path`, with numbers trimmed to three decimals.
#[must_use]
pub fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                let _ = write!(d, "M{},{}", fmt_num(p.x), fmt_num(p.y));
            }
            PathEl::LineTo(p) => {
                let _ = write!(d, "L{},{}", fmt_num(p.x), fmt_num(p.y));
            }
            PathEl::QuadTo(p1, p) => {
                let _ = write!(
                    d,
                    "Q{},{},{},{}",
                    fmt_num(p1.x),
                    fmt_num(p1.y),
                    fmt_num(p.x),
                    fmt_num(p.y)
                );
            }
            PathEl::CurveTo(p1, p2, p) => {
                let _ = write!(
                    d,
                    "C{},{},{},{},{},{}",
                    fmt_num(p1.x),
                    fmt_num(p1.y),
                    fmt_num(p2.x),
                    fmt_num(p2.y),
                    fmt_num(p.x),
                    fmt_num(p.y)
                );
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn color_to_svg(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    let a = f64::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

/// Formats a number for attribute output: integers without a fraction,
/// everything else rounded to three decimals with trailing zeros removed.
pub(crate) fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return String::from("0");
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{v}");
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
