// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of `MapView` with an equirectangular test projection.

use geoview_map::{
    EventKind, GestureState, Layer, LoadState, LonLat, MapConfig, MapError, MapEvent,
    MapResponse, MapView, NodeId, Outcome, Projection, Shape, StrikeRecord, Subscriptions,
    Viewport, path_data, route,
};
use kurbo::Point;
use peniko::Color;
use pretty_assertions::assert_eq;

/// Equirectangular projection filling the viewport.
#[derive(Debug, Default)]
struct PlateCarree {
    width: f64,
    height: f64,
}

impl Projection for PlateCarree {
    fn project(&self, at: LonLat) -> Option<Point> {
        Some(Point::new(
            (at.lon + 180.0) / 360.0 * self.width,
            (90.0 - at.lat) / 180.0 * self.height,
        ))
    }

    fn invert(&self, pt: Point) -> Option<LonLat> {
        Some(LonLat::new(
            pt.x / self.width * 360.0 - 180.0,
            90.0 - pt.y / self.height * 180.0,
        ))
    }

    fn fit(&mut self, viewport: Viewport) {
        self.width = viewport.width();
        self.height = viewport.height();
    }
}

const COUNTRIES: &str = r##"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "id": "SQ",
            "properties": { "name": "Square" },
            "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [90, 0], [90, 45], [0, 45], [0, 0]]] }
        },
        {
            "type": "Feature",
            "id": "RD",
            "properties": { "name": "Red", "color": "#ff0000" },
            "geometry": { "type": "Polygon", "coordinates": [[[-90, 0], [-45, 0], [-45, 45]]] }
        }
    ]
}"##;

fn map() -> MapView<PlateCarree> {
    MapView::new(MapConfig::default(), PlateCarree::default()).unwrap()
}

fn strike(name: &str, mass: Option<f64>, location: Option<LonLat>) -> StrikeRecord {
    StrikeRecord {
        name: name.into(),
        mass,
        year: Some("1880-01-01T00:00:00.000".into()),
        recclass: Some("L5".into()),
        location,
    }
}

fn only_strike(map: &MapView<PlateCarree>) -> NodeId {
    let strikes: Vec<NodeId> = map.scene().with_class("strike").collect();
    assert_eq!(strikes.len(), 1);
    strikes[0]
}

#[test]
fn countries_are_drawn_with_ids_titles_and_fills() {
    let mut map = map();
    assert_eq!(map.load_state(Layer::Countries), LoadState::Pending);
    assert_eq!(map.load_json(Layer::Countries, COUNTRIES).unwrap(), 2);
    assert_eq!(map.load_state(Layer::Countries), LoadState::Loaded { count: 2 });

    let square = map.scene().node(map.country_node("SQ").unwrap()).unwrap();
    assert_eq!(square.title.as_deref(), Some("Square"));
    assert_eq!(square.stroke_width, Some(1.5));
    let Shape::Path(path) = &square.shape else {
        panic!("country should be a path");
    };
    assert_eq!(path_data(path), "M480,240L720,240L720,120L480,120L480,240Z");
    let fill = square.fill.unwrap().to_rgba8();
    assert_eq!((fill.r, fill.g, fill.b), (31, 119, 180));

    let red = map.scene().node(map.country_node("RD").unwrap()).unwrap();
    let fill = red.fill.unwrap().to_rgba8();
    assert_eq!((fill.r, fill.g, fill.b), (255, 0, 0));

    let equator: Vec<NodeId> = map.scene().with_class("equator").collect();
    assert_eq!(equator.len(), 1);
    let Shape::Path(line) = &map.scene().node(equator[0]).unwrap().shape else {
        panic!("equator should be a path");
    };
    assert_eq!(path_data(line), "M0,240L240,240L480,240L720,240L960,240");
    assert_eq!(map.scene().with_class("graticule").count(), 0);
}

#[test]
fn graticule_is_opt_in() {
    let config = MapConfig {
        graticule: true,
        ..MapConfig::default()
    };
    let mut map = MapView::new(config, PlateCarree::default()).unwrap();
    map.draw_countries(Vec::new());
    assert_eq!(map.scene().with_class("graticule").count(), 1);
}

#[test]
fn gesture_sets_transform_and_stroke() {
    let mut map = map();
    map.load_json(Layer::Countries, COUNTRIES).unwrap();

    let t = map.apply_gesture(GestureState::new(2.0, -500.0, 50.0));
    assert_eq!((t.scale, t.translate.x, t.translate.y), (2.0, -500.0, 0.0));

    let zoom = map.scene().node(map.zoom_group()).unwrap();
    assert_eq!(zoom.transform.as_deref(), Some("translate(-500,0) scale(2)"));
    for id in map.scene().with_class("country") {
        assert_eq!(map.scene().node(id).unwrap().stroke_width, Some(0.75));
    }

    let t = map.apply_gesture(GestureState::new(4.0, 200.0, -2000.0));
    assert_eq!((t.translate.x, t.translate.y), (0.0, -1440.0));
}

#[test]
fn strikes_skip_incomplete_records() {
    let mut map = map();
    let drawn = map.add_strikes([
        strike("Aachen", Some(1024.0), Some(LonLat::new(0.0, 45.0))),
        strike("Nowhere", Some(10.0), None),
        strike("Weightless", None, Some(LonLat::new(10.0, 10.0))),
    ]);
    assert_eq!(drawn, 1);
    assert_eq!(map.load_state(Layer::Strikes), LoadState::Loaded { count: 1 });

    let node = map.scene().node(only_strike(&map)).unwrap();
    let Shape::Circle { center, radius } = node.shape else {
        panic!("strike should be a circle");
    };
    assert_eq!(center, Point::new(480.0, 120.0));
    assert!((radius - 2.0).abs() < 1e-12);
    assert_eq!(node.opacity, Some(0.4));
    assert_eq!(node.fill, None);
}

#[test]
fn hovering_a_strike_toggles_tooltip_and_fill() {
    let mut map = map();
    map.add_strikes([strike("Aachen", Some(21.0), Some(LonLat::new(0.0, 45.0)))]);
    let id = only_strike(&map);

    let response = map.pointer_over(id, Point::new(100.0, 200.0)).unwrap();
    assert_eq!(response, MapResponse::Hover(Some(id)));
    assert!(map.tooltip().is_visible());
    assert_eq!(map.tooltip().position(), Point::new(110.0, 80.0));
    assert_eq!(
        map.tooltip().html(),
        "<h3> Aachen 1880</h3><p>Mass: 21 grams</p><p>Class: L5</p>"
    );
    assert_eq!(map.scene().node(id).unwrap().fill, Some(Color::WHITE));

    map.pointer_move(Point::new(120.0, 220.0));
    assert_eq!(map.tooltip().position(), Point::new(130.0, 100.0));

    assert_eq!(map.pointer_leave(id), MapResponse::Hover(None));
    assert!(!map.tooltip().is_visible());
    assert_eq!(map.scene().node(id).unwrap().fill, Some(Color::BLACK));

    // A stale leave is ignored.
    assert_eq!(map.pointer_leave(id), MapResponse::Idle);
}

#[test]
fn hovering_a_country_shows_its_name() {
    let mut map = map();
    map.load_json(Layer::Countries, COUNTRIES).unwrap();
    let square = map.country_node("SQ").unwrap();
    let red = map.country_node("RD").unwrap();

    map.pointer_over(square, Point::new(10.0, 10.0)).unwrap();
    assert_eq!(map.tooltip().html(), "Square");
    map.pointer_over(red, Point::new(20.0, 20.0)).unwrap();
    assert_eq!(map.tooltip().html(), "Red");
    assert!(map.tooltip().is_visible());
    assert_eq!(map.hovered(), Some(red));
}

#[test]
fn hovering_unknown_nodes() {
    let mut map = map();
    let group = map.zoom_group();
    assert_eq!(map.pointer_over(group, Point::ZERO).unwrap(), MapResponse::Idle);

    map.load_json(Layer::Countries, COUNTRIES).unwrap();
    let gone = map.country_node("SQ").unwrap();
    map.draw_countries(Vec::new());
    assert!(matches!(
        map.pointer_over(gone, Point::ZERO),
        Err(MapError::UnknownNode(id)) if id == gone
    ));
}

#[test]
fn points_and_labels() {
    let mut map = map();
    let paris = map.add_point(LonLat::new(0.0, 0.0), "Null Island").unwrap();
    let bare = map.add_point(LonLat::new(90.0, 0.0), "").unwrap();

    let children = map.scene().node(paris).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);
    let label = map.scene().node(children[1]).unwrap();
    assert_eq!(
        label.shape,
        Shape::Text {
            origin: Point::new(482.0, 242.0),
            text: "Null Island".into()
        }
    );
    assert_eq!(map.scene().node(bare).unwrap().children().len(), 1);
    assert_eq!(map.scene().with_class("point").count(), 2);
    assert_eq!(map.load_state(Layer::Capitals), LoadState::Loaded { count: 2 });
}

#[test]
fn capitals_load_from_json() {
    let mut map = map();
    let json = r#"[
        { "CapitalName": "Paris", "CapitalLatitude": 48.86, "CapitalLongitude": 2.35 },
        { "CapitalName": "Quito", "CapitalLatitude": -0.22, "CapitalLongitude": -78.5 }
    ]"#;
    assert_eq!(map.load_json(Layer::Capitals, json).unwrap(), 2);
    assert_eq!(map.scene().with_class("label").count(), 2);
}

#[test]
fn click_inverts_zoom_and_projection() {
    let mut map = map();
    let at = map.click(Point::new(480.0, 240.0)).unwrap();
    assert_eq!(at, LonLat::new(0.0, 0.0));

    map.apply_gesture(GestureState::new(2.0, -480.0, -240.0));
    let at = map.click(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(at, LonLat::new(-90.0, 45.0));
}

#[test]
fn drag_pans_and_short_press_clicks() {
    let mut map = map();
    map.apply_gesture(GestureState::new(2.0, -480.0, -240.0));

    map.handle(&MapEvent::PointerDown { pos: Point::new(100.0, 100.0) }).unwrap();
    let response = map.handle(&MapEvent::PointerMove { pos: Point::new(150.0, 100.0) }).unwrap();
    let MapResponse::Transform(t) = response else {
        panic!("drag should pan, got {response:?}");
    };
    assert_eq!((t.translate.x, t.translate.y), (-430.0, -240.0));
    let up = map.handle(&MapEvent::PointerUp { pos: Point::new(150.0, 100.0) }).unwrap();
    assert_eq!(up, MapResponse::Transform(t));

    map.handle(&MapEvent::PointerDown { pos: Point::new(430.0, 240.0) }).unwrap();
    let up = map.handle(&MapEvent::PointerUp { pos: Point::new(431.0, 240.0) }).unwrap();
    let MapResponse::Location(Some(at)) = up else {
        panic!("short press should click, got {up:?}");
    };
    // Map x = (431 - -429) / 2 = 430, which is 430/960 of the way around.
    assert!((at.lon - (430.0 / 960.0 * 360.0 - 180.0)).abs() < 1e-9);
    assert!(at.lat.abs() < 1e-9);
}

#[test]
fn resize_is_debounced_and_redraws() {
    let mut map = map();
    map.load_json(Layer::Countries, COUNTRIES).unwrap();
    map.add_strikes([strike("Aachen", Some(21.0), Some(LonLat::new(0.0, 45.0)))]);
    map.apply_gesture(GestureState::new(3.0, -100.0, -100.0));

    map.request_resize(800.0, 0);
    map.request_resize(1200.0, 100);
    assert_eq!(map.tick(250).unwrap(), None);
    let vp = map.tick(300).unwrap().unwrap();
    assert_eq!((vp.width(), vp.height()), (1200.0, 600.0));
    assert_eq!(map.tick(1000).unwrap(), None);

    assert_eq!(map.viewport(), vp);
    assert_eq!(map.transform().scale, 1.0);
    assert_eq!(
        map.scene().node(map.zoom_group()).unwrap().transform.as_deref(),
        Some("translate(0,0) scale(1)")
    );

    let node = map.scene().node(only_strike(&map)).unwrap();
    assert!(matches!(node.shape, Shape::Circle { center, .. } if center == Point::new(600.0, 150.0)));
    assert_eq!(map.scene().with_class("country").count(), 2);
    assert!(map.to_svg().starts_with(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\" height=\"600\""
    ));
}

#[test]
fn repeated_relayouts_keep_the_scene_bounded() {
    let mut map = map();
    map.load_json(Layer::Countries, COUNTRIES).unwrap();
    for i in 0..200 {
        let lon = f64::from(i) * 1.5 - 150.0;
        map.add_point(LonLat::new(lon, 10.0), "Capital").unwrap();
    }
    let live = map.scene().len();
    let slots = map.scene().slot_count();
    let first_point = map.scene().with_class("point").next().unwrap();

    for step in 0..100_u64 {
        let width = if step % 2 == 0 { 1200.0 } else { 960.0 };
        map.request_resize(width, step * 1000);
        assert!(map.tick(step * 1000 + 200).unwrap().is_some());
    }

    assert_eq!(map.scene().len(), live);
    assert_eq!(map.scene().slot_count(), slots);
    assert!(!map.scene().is_alive(first_point));
    assert_eq!(map.scene().with_class("point").count(), 200);
    assert_eq!(map.scene().with_class("country").count(), 2);

    map.apply_gesture(GestureState::new(2.0, 0.0, 0.0));
    let square = map.scene().node(map.country_node("SQ").unwrap()).unwrap();
    assert_eq!(square.stroke_width, Some(0.75));
}

#[test]
fn degenerate_resize_keeps_previous_layout() {
    let mut map = map();
    map.handle(&MapEvent::Resize { width: 0.0, now_ms: 0 }).unwrap();
    assert!(matches!(
        map.handle(&MapEvent::Tick { now_ms: 200 }),
        Err(MapError::Viewport(_))
    ));
    assert_eq!(map.viewport().width(), 960.0);
}

#[test]
fn load_failures_are_observable() {
    let mut map = map();
    assert!(map.load_json(Layer::Strikes, "{").is_err());
    assert!(matches!(map.load_state(Layer::Strikes), LoadState::Failed { .. }));

    map.record_load_failure(Layer::Countries, "HTTP 404");
    assert_eq!(
        map.load_state(Layer::Countries),
        LoadState::Failed {
            reason: "HTTP 404".into()
        }
    );
}

#[test]
fn subscribers_can_stop_default_handling() {
    let mut map = map();
    let mut subs: Subscriptions<MapView<PlateCarree>> = Subscriptions::new();
    subs.on(EventKind::Zoom, |view, event| {
        if let MapEvent::Zoom(g) = event
            && g.scale > 4.0
        {
            // Pin deep zooms to 4x instead.
            view.apply_gesture(GestureState::new(4.0, g.translate.x, g.translate.y));
            return Outcome::Stop;
        }
        Outcome::Continue
    });

    let shallow = route(&mut map, &mut subs, &MapEvent::Zoom(GestureState::new(2.0, 0.0, 0.0)));
    assert!(matches!(shallow, Ok(Some(MapResponse::Transform(_)))));
    assert_eq!(map.transform().scale, 2.0);

    let deep = route(&mut map, &mut subs, &MapEvent::Zoom(GestureState::new(8.0, 0.0, 0.0)));
    assert!(matches!(deep, Ok(None)));
    assert_eq!(map.transform().scale, 4.0);
}

#[test]
fn wheel_zooms_about_anchor() {
    let mut map = map();
    let response = map
        .handle(&MapEvent::Wheel {
            anchor: Point::new(480.0, 240.0),
            factor: 2.0,
        })
        .unwrap();
    let MapResponse::Transform(t) = response else {
        panic!("wheel should zoom");
    };
    assert_eq!(t.svg_transform().to_string(), "translate(-480,-240) scale(2)");
}
