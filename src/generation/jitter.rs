//! Jittered square lattice and boundary ring
//!
//! Grid points are laid out on a square lattice with `spacing` between rows and
//! columns, each displaced by a random offset. A sparser ring of boundary points is
//! placed one spacing outside the map so that every grid cell gets a closed polygon.

use rand::Rng;

use crate::cell::Point;

/// Round to a fixed number of decimals
#[inline]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    (value * m).round() / m
}

/// Generate the boundary ring padding the map
///
/// Points sit on the four sides of a rectangle offset by `-spacing` from the map,
/// with roughly twice the grid spacing between them. They take part in the
/// triangulation but never become cells.
pub fn boundary_points(width: f64, height: f64, spacing: f64) -> Vec<Point> {
    let offset = (-spacing).round();
    let b_spacing = spacing * 2.0;
    let w = width - offset * 2.0;
    let h = height - offset * 2.0;
    let number_x = (w / b_spacing).ceil() - 1.0;
    let number_y = (h / b_spacing).ceil() - 1.0;

    let mut points = Vec::new();

    let mut i = 0.5;
    while i < number_x {
        let x = ((w * i) / number_x + offset).ceil();
        points.push(Point::new(x, offset));
        points.push(Point::new(x, h + offset));
        i += 1.0;
    }

    let mut i = 0.5;
    while i < number_y {
        let y = ((h * i) / number_y + offset).ceil();
        points.push(Point::new(offset, y));
        points.push(Point::new(w + offset, y));
        i += 1.0;
    }

    points
}

/// Generate a jittered square lattice covering the map
///
/// Rows and columns start half a spacing in from the origin. Each point is moved
/// by up to `jitter * spacing / 2` along both axes, rounded to two decimals and
/// clamped to the map.
pub fn jittered_grid<R: Rng>(
    width: f64,
    height: f64,
    spacing: f64,
    jitter: f64,
    rng: &mut R,
) -> Vec<Point> {
    let radius = spacing / 2.0;
    let jittering = radius * jitter;

    let mut points = Vec::new();
    let mut y = radius;
    while y < height {
        let mut x = radius;
        while x < width {
            let jx = rng.gen::<f64>() * jittering * 2.0 - jittering;
            let jy = rng.gen::<f64>() * jittering * 2.0 - jittering;
            let xj = round_to(x + jx, 2).min(width);
            let yj = round_to(y + jy, 2).min(height);
            points.push(Point::new(xj, yj));
            x += spacing;
        }
        y += spacing;
    }

    points
}
