//! Snapping continuous positions onto the checkerboard node lattice.

use crate::planet::Coordinate;

/// Nearest lattice coordinate to (x, y) with the requested parity.
///
/// Candidates are the floor/ceil combinations of x and y. With `parity`
/// set only candidates whose `x + y` parity matches are kept; `None`
/// accepts either parity. Any parity value is taken modulo 2. When (x, y)
/// sits exactly on a point of the wrong parity its four neighbours are used
/// instead. Equal distances resolve to the smaller coordinate.
pub fn snap_to_lattice(x: f64, y: f64, parity: Option<i32>) -> Coordinate {
    let parity = parity.map(|p| p.rem_euclid(2));
    let (x_lo, x_hi) = (x.floor() as i32, x.ceil() as i32);
    let (y_lo, y_hi) = (y.floor() as i32, y.ceil() as i32);

    let matches = |c: &Coordinate| parity.map_or(true, |p| c.parity() == p);

    let mut candidates: Vec<Coordinate> = [
        Coordinate::new(x_lo, y_lo),
        Coordinate::new(x_lo, y_hi),
        Coordinate::new(x_hi, y_lo),
        Coordinate::new(x_hi, y_hi),
    ]
    .into_iter()
    .filter(matches)
    .collect();

    if candidates.is_empty() {
        let on_point = Coordinate::new(x.round() as i32, y.round() as i32);
        candidates = on_point.neighbors_4().into_iter().filter(matches).collect();
        tracing::debug!(
            "({:.3}, {:.3}) lies on wrong-parity node {}, snapping to a neighbour",
            x,
            y,
            on_point
        );
    }

    candidates.sort();
    candidates.dedup();

    let mut best: Option<(Coordinate, f64)> = None;
    for candidate in candidates {
        let distance = candidate.distance_to(x, y);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map_or_else(
        || Coordinate::new(x.round() as i32, y.round() as i32),
        |(coordinate, _)| coordinate,
    )
}
