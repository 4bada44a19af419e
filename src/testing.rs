//! Shared fixtures for unit tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cell::Point;
use crate::generation::{boundary_points, jittered_grid};

/// Nearly regular lattice of `cols` x `rows` cells plus its boundary ring
///
/// Points are perturbed by at most 5% of the spacing, which keeps every axis
/// neighbour adjacent while avoiding co-circular quadruples. Cell id is
/// `row * cols + col`.
pub(crate) fn lattice(cols: usize, rows: usize, spacing: f64) -> (Vec<Point>, Vec<Point>) {
    let width = cols as f64 * spacing;
    let height = rows as f64 * spacing;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let points = jittered_grid(width, height, spacing, 0.1, &mut rng);
    let boundary = boundary_points(width, height, spacing);
    (points, boundary)
}

/// Heights for a lattice, land wherever `is_land(col, row)` holds
pub(crate) fn lattice_heights<F>(cols: usize, rows: usize, is_land: F) -> Vec<u8>
where
    F: Fn(usize, usize) -> bool,
{
    (0..rows * cols)
        .map(|id| if is_land(id % cols, id / cols) { 50 } else { 5 })
        .collect()
}
