// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The map context.
//!
//! [`MapView`] owns everything an interactive map needs between host
//! callbacks: layout, projection, zoom state, the retained scene, hover and
//! drag tracking, the resize debounce and per-layer load state. Every layer
//! keeps its source data so a re-layout can redraw it without refetching.
//!
//! Scene layout:
//!
//! ```text
//! root
//! └─ g.map
//!    ├─ g.graticule          unzoomed reference lines
//!    └─ g.zoom               carries the clamped transform
//!       ├─ g.reference       equator
//!       ├─ g.countries       path.country per feature
//!       ├─ g.strikes         circle.strike per record
//!       └─ g.points          g.gpoint > circle.point (+ text.label)
//! ```

use geoview_event_state::debounce::Debounce;
use geoview_event_state::drag::{DragEnd, DragState};
use geoview_event_state::hover::{HoverEvent, HoverState};
use geoview_view2d::{ClampedTransform, GestureState, Viewport, ZoomTransform};
use hashbrown::HashMap;
use kurbo::{Point, Vec2};
use peniko::Color;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::data::{CapitalRecord, CountryFeature, Layer, LoadState, StrikeRecord};
use crate::error::MapError;
use crate::events::MapEvent;
use crate::geo::{LonLat, Projection};
use crate::graticule::{equator, graticule_lines, project_lines};
use crate::scene::{NodeId, Scene, Shape};
use crate::tooltip::{Tooltip, country_html, strike_html};

/// What a handled event changed.
#[derive(Clone, Debug, PartialEq)]
pub enum MapResponse {
    /// Nothing observable changed.
    Idle,
    /// The zoom transform was updated.
    Transform(ClampedTransform),
    /// A click resolved to a geographic position, if the projection could
    /// invert it.
    Location(Option<LonLat>),
    /// A debounced resize re-laid the map out.
    Relayout(Viewport),
    /// The hovered shape changed.
    Hover(Option<NodeId>),
}

#[derive(Clone, Copy, Debug)]
struct Groups {
    graticule: NodeId,
    zoom: NodeId,
    reference: NodeId,
    countries: NodeId,
    strikes: NodeId,
    points: NodeId,
}

impl Groups {
    fn build(scene: &mut Scene) -> Self {
        let outer = group(scene, scene.root(), "map");
        let graticule = group(scene, outer, "graticule");
        let zoom = group(scene, outer, "zoom");
        Self {
            graticule,
            zoom,
            reference: group(scene, zoom, "reference"),
            countries: group(scene, zoom, "countries"),
            strikes: group(scene, zoom, "strikes"),
            points: group(scene, zoom, "points"),
        }
    }
}

fn group(scene: &mut Scene, parent: NodeId, class: &'static str) -> NodeId {
    let id = scene.append(parent, Shape::Group);
    if let Some(node) = scene.node_mut(id) {
        node.class = Some(class);
    }
    id
}

#[derive(Clone, Debug)]
struct Hoverable {
    html: String,
    strike: bool,
}

#[derive(Clone, Debug)]
struct PlacedPoint {
    at: LonLat,
    text: String,
}

/// An interactive world map.
#[derive(Debug)]
pub struct MapView<P> {
    config: MapConfig,
    projection: P,
    zoom: ZoomTransform,
    scene: Scene,
    groups: Groups,
    country_fill: Color,
    countries: Vec<CountryFeature>,
    strikes: Vec<StrikeRecord>,
    points: Vec<PlacedPoint>,
    hoverables: HashMap<NodeId, Hoverable>,
    tooltip: Tooltip,
    hover: HoverState<NodeId>,
    drag: DragState,
    resize: Debounce,
    pending_width: Option<f64>,
    load: HashMap<Layer, LoadState>,
}

impl<P: Projection> MapView<P> {
    /// Lays out a map for `config` and fits `projection` to it.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Config`] or [`MapError::Color`] for a rejected
    /// config and [`MapError::Viewport`] if the layout is degenerate.
    pub fn new(config: MapConfig, mut projection: P) -> Result<Self, MapError> {
        config.validate()?;
        let viewport = Viewport::from_width(config.width, config.aspect)?;
        projection.fit(viewport);

        let mut zoom = ZoomTransform::new(viewport);
        zoom.set_extent(config.zoom_extent);
        zoom.set_clamp_mode(config.clamp_mode);

        let mut scene = Scene::new();
        let groups = Groups::build(&mut scene);
        let load = Layer::ALL
            .into_iter()
            .map(|layer| (layer, LoadState::Pending))
            .collect();

        info!(
            width = viewport.width(),
            height = viewport.height(),
            "map laid out"
        );
        let mut view = Self {
            country_fill: config.country_fill()?,
            resize: Debounce::new(config.resize_debounce_ms),
            config,
            projection,
            zoom,
            scene,
            groups,
            countries: Vec::new(),
            strikes: Vec::new(),
            points: Vec::new(),
            hoverables: HashMap::new(),
            tooltip: Tooltip::default(),
            hover: HoverState::new(),
            drag: DragState::default(),
            pending_width: None,
            load,
        };
        view.sync_transform();
        Ok(view)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.zoom.viewport()
    }

    /// The current clamped zoom transform.
    #[must_use]
    pub fn transform(&self) -> ClampedTransform {
        self.zoom.current()
    }

    /// The projection in use.
    #[must_use]
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// The retained scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The tooltip state.
    #[must_use]
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// The hovered shape, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.current().copied()
    }

    /// The group that holds a data layer's shapes.
    #[must_use]
    pub fn layer_group(&self, layer: Layer) -> NodeId {
        match layer {
            Layer::Countries => self.groups.countries,
            Layer::Strikes => self.groups.strikes,
            Layer::Capitals => self.groups.points,
        }
    }

    /// The group carrying the zoom transform.
    #[must_use]
    pub fn zoom_group(&self) -> NodeId {
        self.groups.zoom
    }

    /// The path drawn for the country with element id `id`.
    #[must_use]
    pub fn country_node(&self, id: &str) -> Option<NodeId> {
        let countries = self.scene.node(self.groups.countries)?;
        countries
            .children()
            .iter()
            .copied()
            .find(|&n| self.scene.node(n).and_then(|n| n.element_id.as_deref()) == Some(id))
    }

    /// Replaces the country layer and draws the reference lines.
    ///
    /// Returns the number of country paths drawn.
    pub fn draw_countries(&mut self, features: Vec<CountryFeature>) -> usize {
        self.countries = features;
        self.redraw_reference();
        let count = self.redraw_countries();
        self.set_loaded(Layer::Countries, count);
        count
    }

    /// Plots a point with an optional label.
    ///
    /// Returns the point's group, or `None` if the projection rejects the
    /// position.
    pub fn add_point(&mut self, at: LonLat, text: &str) -> Option<NodeId> {
        self.points.push(PlacedPoint {
            at,
            text: text.to_owned(),
        });
        let placed = self.draw_point(self.points.len() - 1);
        self.set_loaded(Layer::Capitals, self.scene_children(self.groups.points));
        placed
    }

    /// Plots every capital as a labelled point. Returns how many were drawn.
    pub fn add_capitals(&mut self, records: &[CapitalRecord]) -> usize {
        records
            .iter()
            .filter(|c| self.add_point(c.location(), &c.name).is_some())
            .count()
    }

    /// Adds strike circles. Returns how many of `records` were drawn.
    ///
    /// Records with no location or no usable mass are kept but not drawn.
    pub fn add_strikes(&mut self, records: impl IntoIterator<Item = StrikeRecord>) -> usize {
        let start = self.strikes.len();
        self.strikes.extend(records);
        let drawn = (start..self.strikes.len())
            .filter(|&i| self.draw_strike(i).is_some())
            .count();
        self.set_loaded(Layer::Strikes, self.scene_children(self.groups.strikes));
        drawn
    }

    /// Decodes a layer's JSON document and draws it.
    ///
    /// A decode failure is recorded as the layer's load state before it is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the decode error from the layer's data type.
    pub fn load_json(&mut self, layer: Layer, json: &str) -> Result<usize, MapError> {
        let drawn = match layer {
            Layer::Countries => {
                CountryFeature::collection_from_json(json).map(|f| self.draw_countries(f))
            }
            Layer::Strikes => {
                StrikeRecord::collection_from_json(json).map(|s| self.add_strikes(s))
            }
            Layer::Capitals => {
                CapitalRecord::list_from_json(json).map(|c| self.add_capitals(&c))
            }
        };
        drawn.inspect_err(|err| self.record_load_failure(layer, err))
    }

    /// Marks a layer's data as failed to load.
    pub fn record_load_failure(&mut self, layer: Layer, reason: impl ToString) {
        let reason = reason.to_string();
        warn!(%layer, %reason, "data load failed");
        self.load.insert(layer, LoadState::Failed { reason });
    }

    /// The loading state of `layer`.
    #[must_use]
    pub fn load_state(&self, layer: Layer) -> LoadState {
        self.load.get(&layer).cloned().unwrap_or_default()
    }

    /// Applies a gesture proposal: clamps it, updates the zoom group's
    /// transform and rescales country outlines.
    pub fn apply_gesture(&mut self, gesture: GestureState) -> ClampedTransform {
        self.zoom.set_gesture(gesture);
        self.sync_transform()
    }

    /// Zooms by `factor` around a view position.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> ClampedTransform {
        self.zoom.zoom_about(anchor, factor);
        self.sync_transform()
    }

    /// Pans by a view-space delta.
    pub fn pan_by(&mut self, delta: Vec2) -> ClampedTransform {
        self.zoom.pan_by(delta);
        self.sync_transform()
    }

    /// Starts a potential drag.
    pub fn pointer_down(&mut self, pos: Point) {
        self.drag.start(pos);
    }

    /// Ends a drag. A drag that stayed within the click tolerance is a click.
    pub fn pointer_up(&mut self, pos: Point) -> MapResponse {
        if let Some(delta) = self.drag.update(pos)
            && delta != Vec2::ZERO
        {
            self.pan_by(delta);
        }
        match self.drag.end() {
            Some(DragEnd::Click) => MapResponse::Location(self.click(pos)),
            Some(DragEnd::Pan) => MapResponse::Transform(self.transform()),
            None => MapResponse::Idle,
        }
    }

    /// Handles the pointer entering a shape.
    ///
    /// Shapes without a tooltip are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownNode`] if `target` is not in the scene.
    pub fn pointer_over(&mut self, target: NodeId, pos: Point) -> Result<MapResponse, MapError> {
        if self.scene.node(target).is_none() {
            return Err(MapError::UnknownNode(target));
        }
        if !self.hoverables.contains_key(&target) {
            return Ok(MapResponse::Idle);
        }
        for transition in self.hover.update(Some(target)) {
            match transition {
                HoverEvent::Leave(prev) => self.end_hover(prev),
                HoverEvent::Enter(next) => self.begin_hover(next, pos),
            }
        }
        Ok(MapResponse::Hover(self.hovered()))
    }

    /// Moves the tooltip with the pointer and pans an active drag.
    pub fn pointer_move(&mut self, pos: Point) -> MapResponse {
        self.tooltip.follow(pos, self.config.tooltip_offset());
        match self.drag.update(pos) {
            Some(delta) if delta != Vec2::ZERO => MapResponse::Transform(self.pan_by(delta)),
            _ => MapResponse::Idle,
        }
    }

    /// Handles the pointer leaving a shape.
    pub fn pointer_leave(&mut self, target: NodeId) -> MapResponse {
        match self.hover.leave(&target) {
            Some(HoverEvent::Leave(prev) | HoverEvent::Enter(prev)) => {
                self.end_hover(prev);
                MapResponse::Hover(None)
            }
            None => MapResponse::Idle,
        }
    }

    /// Resolves a view position to a geographic position through the zoom
    /// transform and the projection.
    pub fn click(&mut self, pos: Point) -> Option<LonLat> {
        let map_pt = self.zoom.current().invert_point(pos);
        let at = self.projection.invert(map_pt);
        match at {
            Some(at) => info!(x = pos.x, y = pos.y, lon = at.lon, lat = at.lat, "map clicked"),
            None => info!(x = pos.x, y = pos.y, "map clicked outside the projection"),
        }
        at
    }

    /// Requests a re-layout at `width`. Only the last request inside the
    /// debounce window takes effect, on a later [`MapView::tick`].
    pub fn request_resize(&mut self, width: f64, now_ms: u64) {
        self.pending_width = Some(width);
        self.resize.schedule(now_ms);
    }

    /// Advances the host clock, running a due re-layout.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Viewport`] if the requested width gives a
    /// degenerate layout; the previous layout stays in place.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<Viewport>, MapError> {
        if !self.resize.poll(now_ms) {
            return Ok(None);
        }
        let Some(width) = self.pending_width.take() else {
            return Ok(None);
        };
        self.relayout(width).map(Some)
    }

    /// Built-in handling for a [`MapEvent`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`MapView::pointer_over`] and
    /// [`MapView::tick`].
    pub fn handle(&mut self, event: &MapEvent) -> Result<MapResponse, MapError> {
        Ok(match *event {
            MapEvent::Zoom(gesture) => MapResponse::Transform(self.apply_gesture(gesture)),
            MapEvent::Wheel { anchor, factor } => {
                MapResponse::Transform(self.zoom_about(anchor, factor))
            }
            MapEvent::Resize { width, now_ms } => {
                self.request_resize(width, now_ms);
                MapResponse::Idle
            }
            MapEvent::Tick { now_ms } => self
                .tick(now_ms)?
                .map_or(MapResponse::Idle, MapResponse::Relayout),
            MapEvent::PointerDown { pos } => {
                self.pointer_down(pos);
                MapResponse::Idle
            }
            MapEvent::PointerUp { pos } => self.pointer_up(pos),
            MapEvent::PointerOver { target, pos } => self.pointer_over(target, pos)?,
            MapEvent::PointerMove { pos } => self.pointer_move(pos),
            MapEvent::PointerLeave { target } => self.pointer_leave(target),
            MapEvent::Click { pos } => MapResponse::Location(self.click(pos)),
        })
    }

    /// Exports the scene as an SVG document sized to the viewport.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let vp = self.viewport();
        self.scene.to_svg(vp.width(), vp.height())
    }

    fn relayout(&mut self, width: f64) -> Result<Viewport, MapError> {
        let viewport = Viewport::from_width(width, self.config.aspect)?;
        self.config.width = width;
        self.projection.fit(viewport);
        self.zoom.set_viewport(viewport);
        self.drag.end();

        self.redraw_reference();
        self.redraw_countries();
        self.scene.clear_children(self.groups.strikes);
        for i in 0..self.strikes.len() {
            self.draw_strike(i);
        }
        self.scene.clear_children(self.groups.points);
        for i in 0..self.points.len() {
            self.draw_point(i);
        }
        self.prune_hover();
        self.sync_transform();
        info!(
            width = viewport.width(),
            height = viewport.height(),
            "map re-laid out"
        );
        Ok(viewport)
    }

    fn sync_transform(&mut self) -> ClampedTransform {
        let current = self.zoom.current();
        if let Some(node) = self.scene.node_mut(self.groups.zoom) {
            node.transform = Some(current.svg_transform().to_string());
        }
        let stroke = current.stroke_width(self.config.base_stroke_width);
        let countries = self
            .scene
            .node(self.groups.countries)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        for id in countries {
            if let Some(node) = self.scene.node_mut(id) {
                node.stroke_width = Some(stroke);
            }
        }
        debug!(
            scale = current.scale,
            x = current.translate.x,
            y = current.translate.y,
            stroke,
            "zoom transform applied"
        );
        current
    }

    fn redraw_reference(&mut self) {
        self.scene.clear_children(self.groups.reference);
        let path = project_lines(&self.projection, &[equator()], false);
        let id = self.scene.append(self.groups.reference, Shape::Path(path));
        if let Some(node) = self.scene.node_mut(id) {
            node.class = Some("equator");
        }

        self.scene.clear_children(self.groups.graticule);
        if self.config.graticule {
            let path = project_lines(&self.projection, &graticule_lines(), false);
            let id = self.scene.append(self.groups.graticule, Shape::Path(path));
            if let Some(node) = self.scene.node_mut(id) {
                node.class = Some("graticule");
            }
        }
    }

    fn redraw_countries(&mut self) -> usize {
        self.scene.clear_children(self.groups.countries);
        self.prune_hover();
        let stroke = self
            .zoom
            .current()
            .stroke_width(self.config.base_stroke_width);
        for feature in &self.countries {
            let path = project_lines(&self.projection, &feature.rings, true);
            let id = self.scene.append(self.groups.countries, Shape::Path(path));
            if let Some(node) = self.scene.node_mut(id) {
                node.class = Some("country");
                node.element_id = Some(feature.id.clone());
                node.title = Some(feature.name.clone());
                node.fill = Some(feature.color.unwrap_or(self.country_fill));
                node.stroke_width = Some(stroke);
            }
            self.hoverables.insert(
                id,
                Hoverable {
                    html: country_html(feature),
                    strike: false,
                },
            );
        }
        self.countries.len()
    }

    fn draw_strike(&mut self, index: usize) -> Option<NodeId> {
        let strike = self.strikes.get(index)?;
        let Some(at) = strike.location else {
            warn!(name = %strike.name, "strike has no location; skipped");
            return None;
        };
        let Some(radius) = strike.radius() else {
            warn!(name = %strike.name, "strike has no usable mass; skipped");
            return None;
        };
        let Some(center) = self.projection.project(at) else {
            warn!(name = %strike.name, lon = at.lon, lat = at.lat, "strike outside the projection; skipped");
            return None;
        };
        let id = self
            .scene
            .append(self.groups.strikes, Shape::Circle { center, radius });
        if let Some(node) = self.scene.node_mut(id) {
            node.class = Some("strike");
            node.opacity = Some(self.config.strike_opacity);
        }
        self.hoverables.insert(
            id,
            Hoverable {
                html: strike_html(strike),
                strike: true,
            },
        );
        Some(id)
    }

    fn draw_point(&mut self, index: usize) -> Option<NodeId> {
        let point = self.points.get(index)?;
        let Some(center) = self.projection.project(point.at) else {
            warn!(label = %point.text, "point outside the projection; skipped");
            return None;
        };
        let g = group(&mut self.scene, self.groups.points, "gpoint");
        let circle = self.scene.append(
            g,
            Shape::Circle {
                center,
                radius: self.config.point_radius,
            },
        );
        if let Some(node) = self.scene.node_mut(circle) {
            node.class = Some("point");
        }
        if !point.text.is_empty() {
            let offset = Vec2::new(self.config.label_offset, self.config.label_offset);
            let label = self.scene.append(
                g,
                Shape::Text {
                    origin: center + offset,
                    text: point.text.clone(),
                },
            );
            if let Some(node) = self.scene.node_mut(label) {
                node.class = Some("label");
            }
        }
        Some(g)
    }

    fn begin_hover(&mut self, target: NodeId, pos: Point) {
        let Some(info) = self.hoverables.get(&target) else {
            return;
        };
        self.tooltip
            .show(info.html.clone(), pos, self.config.tooltip_offset());
        if info.strike
            && let Some(node) = self.scene.node_mut(target)
        {
            node.fill = Some(Color::WHITE);
        }
    }

    fn end_hover(&mut self, target: NodeId) {
        self.tooltip.hide();
        if self.hoverables.get(&target).is_some_and(|h| h.strike)
            && let Some(node) = self.scene.node_mut(target)
        {
            node.fill = Some(Color::BLACK);
        }
    }

    /// Forgets hover data for shapes that no longer exist.
    fn prune_hover(&mut self) {
        self.hoverables.retain(|id, _| self.scene.node(*id).is_some());
        if let Some(&current) = self.hover.current()
            && self.scene.node(current).is_none()
        {
            self.hover.clear();
            self.tooltip.hide();
        }
    }

    fn set_loaded(&mut self, layer: Layer, count: usize) {
        info!(%layer, count, "layer drawn");
        self.load.insert(layer, LoadState::Loaded { count });
    }

    fn scene_children(&self, id: NodeId) -> usize {
        self.scene.node(id).map_or(0, |n| n.children().len())
    }
}
