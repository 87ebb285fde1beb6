//! Shared geographic math: bearings, distances, coordinate rounding.

use geo::{Distance, Haversine};
use geo_types::{Point, Rect};

/// Initial great-circle bearing from `a` to `b`, in degrees within `[0, 360)`.
/// 0 is north, 90 east. A point bears 0 toward itself.
pub fn initial_bearing(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlon = (b.x() - a.x()).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Great-circle distance in meters.
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Planar distance in coordinate units. Only meaningful for ratios at city
/// extents, where the lon/lat distortion cancels out.
pub fn planar_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x() - b.x()).hypot(a.y() - b.y())
}

/// Rounds both coordinates to `decimals` places.
pub fn round_point(p: Point<f64>, decimals: u32) -> Point<f64> {
    let scale = 10f64.powi(decimals as i32);
    Point::new(
        (p.x() * scale).round() / scale,
        (p.y() * scale).round() / scale,
    )
}

/// Where `p` sits along the SW-to-NE diagonal of `bounds`, as the fraction
/// `d(p, sw) / (d(p, sw) + d(p, ne))`. A degenerate (point) box yields 0.
pub fn diagonal_ratio(p: Point<f64>, bounds: &Rect<f64>) -> f64 {
    let sw = Point::new(bounds.min().x, bounds.min().y);
    let ne = Point::new(bounds.max().x, bounds.max().y);
    let d_near = planar_distance(p, sw);
    let d_far = planar_distance(p, ne);
    let total = d_near + d_far;
    if total == 0.0 {
        0.0
    } else {
        d_near / total
    }
}
