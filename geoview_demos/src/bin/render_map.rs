// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a world map to SVG.
//!
//! Loads country, strike and capital documents from disk, replays a
//! scripted sequence of gestures and clicks, then writes the scene:
//!
//! ```text
//! RUST_LOG=debug cargo run -p geoview_demos --bin render_map -- \
//!     --countries geoview_demos/data/countries.json \
//!     --strikes geoview_demos/data/strikes.json \
//!     --zoom 2,-500,50 --click 480,240 --out map.svg
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use geoview_map::{GestureState, Layer, LonLat, MapConfig, MapView, Projection, Viewport};
use kurbo::Point;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Render a world map to SVG.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON map config; defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Draw 10° graticule lines.
    #[arg(long)]
    graticule: bool,

    /// GeoJSON country features.
    #[arg(long)]
    countries: Option<PathBuf>,

    /// GeoJSON meteorite strikes.
    #[arg(long)]
    strikes: Option<PathBuf>,

    /// JSON array of capital rows.
    #[arg(long)]
    capitals: Option<PathBuf>,

    /// Gesture `scale,tx,ty` to apply; may repeat, last one wins.
    #[arg(long = "zoom", value_parser = parse_gesture)]
    gestures: Vec<GestureState>,

    /// View position `x,y` to resolve to a location; may repeat.
    #[arg(long = "click", value_parser = parse_point)]
    clicks: Vec<Point>,

    /// Output SVG path.
    #[arg(long, default_value = "map.svg")]
    out: PathBuf,
}

/// Web Mercator fitted the way classic world maps are: centred in the
/// viewport with the full longitude range spanning its width.
#[derive(Debug, Default)]
struct Mercator {
    center: Point,
    scale: f64,
}

/// Latitude beyond which Mercator is cut off.
const MAX_LAT: f64 = 85.051_128_78;

impl Projection for Mercator {
    fn project(&self, at: LonLat) -> Option<Point> {
        if !at.is_finite() || at.lat.abs() > MAX_LAT {
            return None;
        }
        let lambda = at.lon.to_radians();
        let phi = at.lat.to_radians();
        let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
        Some(Point::new(
            self.center.x + self.scale * lambda,
            self.center.y - self.scale * y,
        ))
    }

    fn invert(&self, pt: Point) -> Option<LonLat> {
        if self.scale <= 0.0 {
            return None;
        }
        let lambda = (pt.x - self.center.x) / self.scale;
        let phi = 2.0 * ((self.center.y - pt.y) / self.scale).exp().atan() - FRAC_PI_2;
        let at = LonLat::new(lambda.to_degrees(), phi.to_degrees());
        at.is_finite().then_some(at)
    }

    fn fit(&mut self, viewport: Viewport) {
        self.center = Point::new(viewport.width() / 2.0, viewport.height() / 2.0);
        self.scale = viewport.width() / 2.0 / PI;
    }
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let values: Vec<f64> = parts
        .iter()
        .map(|p| p.parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected {N} comma-separated numbers, got {}", v.len()))
}

fn parse_gesture(s: &str) -> Result<GestureState, String> {
    let [scale, tx, ty] = parse_numbers(s)?;
    Ok(GestureState::new(scale, tx, ty))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let [x, y] = parse_numbers(s)?;
    Ok(Point::new(x, y))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_layer(map: &mut MapView<Mercator>, layer: Layer, path: Option<&PathBuf>) {
    let Some(path) = path else {
        return;
    };
    match std::fs::read_to_string(path) {
        // Decode failures are recorded on the layer by `load_json`.
        Ok(json) => {
            if let Ok(count) = map.load_json(layer, &json) {
                info!(%layer, count, path = %path.display(), "loaded");
            }
        }
        Err(err) => map.record_load_failure(layer, format!("{}: {err}", path.display())),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MapConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => MapConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    config.graticule |= args.graticule;

    let mut map = MapView::new(config, Mercator::default()).context("laying out map")?;
    load_layer(&mut map, Layer::Countries, args.countries.as_ref());
    load_layer(&mut map, Layer::Strikes, args.strikes.as_ref());
    load_layer(&mut map, Layer::Capitals, args.capitals.as_ref());

    for layer in Layer::ALL {
        info!(%layer, state = ?map.load_state(layer), "layer state");
    }

    for gesture in args.gestures {
        let t = map.apply_gesture(gesture);
        info!(transform = %t.svg_transform(), "gesture applied");
    }
    for pos in args.clicks {
        if map.click(pos).is_none() {
            warn!(x = pos.x, y = pos.y, "click did not resolve to a location");
        }
    }

    std::fs::write(&args.out, map.to_svg())
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!(path = %args.out.display(), "map written");
    Ok(())
}
