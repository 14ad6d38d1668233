// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference lines in geographic space: the graticule and the equator.
//!
//! Lines are produced as densely sampled polylines so that any projection
//! bends them correctly, then projected and stroked like any other path.

use kurbo::BezPath;

use crate::geo::{LonLat, Projection};

/// Spacing between graticule lines, in degrees.
pub const STEP_DEG: f64 = 10.0;
/// Latitude limit of meridians and parallels.
pub const MAX_LAT: f64 = 80.0;
/// Sampling interval along each line, in degrees.
pub const PRECISION_DEG: f64 = 2.5;

/// Meridians every [`STEP_DEG`] between ±[`MAX_LAT`], and parallels every
/// [`STEP_DEG`] strictly inside ±[`MAX_LAT`].
#[must_use]
pub fn graticule_lines() -> Vec<Vec<LonLat>> {
    let mut lines = Vec::new();
    for lon in steps(-180.0, 180.0, STEP_DEG) {
        lines.push(
            steps(-MAX_LAT, MAX_LAT, PRECISION_DEG)
                .map(|lat| LonLat::new(lon, lat))
                .collect(),
        );
    }
    for lat in steps(-MAX_LAT, MAX_LAT, STEP_DEG) {
        lines.push(
            steps(-180.0, 180.0, PRECISION_DEG)
                .map(|lon| LonLat::new(lon, lat))
                .collect(),
        );
    }
    lines
}

/// The equator, sampled every 90°.
#[must_use]
pub fn equator() -> Vec<LonLat> {
    [-180.0, -90.0, 0.0, 90.0, 180.0]
        .into_iter()
        .map(|lon| LonLat::new(lon, 0.0))
        .collect()
}

/// Projects polylines (or rings, when `close` is set) into a single path.
///
/// Positions the projection rejects split the line rather than joining
/// across the gap.
pub fn project_lines<P: Projection + ?Sized>(
    projection: &P,
    lines: &[Vec<LonLat>],
    close: bool,
) -> BezPath {
    let mut path = BezPath::new();
    for line in lines {
        let mut open = false;
        let mut drawn = 0_usize;
        for &at in line {
            match projection.project(at) {
                Some(pt) if open => {
                    path.line_to(pt);
                    drawn += 1;
                }
                Some(pt) => {
                    path.move_to(pt);
                    open = true;
                    drawn += 1;
                }
                None => open = false,
            }
        }
        if close && open && drawn > 2 {
            path.close_path();
        }
    }
    path
}

/// Inclusive range from `start` to `end` in `step` increments.
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((end - start) / step).round();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "graticule step counts are small positive integers"
    )]
    let count = count as usize;
    (0..=count).map(move |i| {
        #[allow(
            clippy::cast_precision_loss,
            reason = "graticule step indices are small"
        )]
        let i = i as f64;
        start + i * step
    })
}

#[cfg(test)]
mod tests {
    use geoview_view2d::Viewport;
    use kurbo::{PathEl, Point};

    use super::{equator, graticule_lines, project_lines};
    use crate::geo::{LonLat, Projection};

    /// Plate carrée over a 360x180 canvas that refuses the southern hemisphere.
    struct NorthOnly;

    impl Projection for NorthOnly {
        fn project(&self, at: LonLat) -> Option<Point> {
            (at.lat >= 0.0).then(|| Point::new(at.lon + 180.0, 90.0 - at.lat))
        }

        fn invert(&self, pt: Point) -> Option<LonLat> {
            Some(LonLat::new(pt.x - 180.0, 90.0 - pt.y))
        }

        fn fit(&mut self, _viewport: Viewport) {}
    }

    #[test]
    fn graticule_shape() {
        let lines = graticule_lines();
        // 37 meridians (-180..=180) and 17 parallels (-80..=80).
        assert_eq!(lines.len(), 37 + 17);
        assert_eq!(lines[0].first(), Some(&LonLat::new(-180.0, -80.0)));
        assert_eq!(lines[0].last(), Some(&LonLat::new(-180.0, 80.0)));
        assert_eq!(lines[0].len(), 65);
        let last = lines.last().unwrap();
        assert_eq!(last.len(), 145);
        assert_eq!(last[0], LonLat::new(-180.0, 80.0));
    }

    #[test]
    fn equator_points() {
        let eq = equator();
        assert_eq!(eq.len(), 5);
        assert!(eq.iter().all(|p| p.lat == 0.0));
    }

    #[test]
    fn rejected_positions_split_lines() {
        let line = vec![
            LonLat::new(0.0, 10.0),
            LonLat::new(10.0, 10.0),
            LonLat::new(20.0, -10.0),
            LonLat::new(30.0, 10.0),
            LonLat::new(40.0, 10.0),
        ];
        let path = project_lines(&NorthOnly, &[line], false);
        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
        assert_eq!(path.elements().len(), 4);
    }

    #[test]
    fn rings_are_closed() {
        let ring = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(10.0, 0.0),
            LonLat::new(10.0, 10.0),
        ];
        let path = project_lines(&NorthOnly, &[ring], true);
        assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
    }
}
