//! Core Voronoi generation algorithm
//!
//! Generates planar Voronoi cell graphs from jittered point lattices using
//! Delaunay triangulation.

mod delaunay;
mod jitter;
mod voronoi;

pub use delaunay::{compute_delaunay, DelaunayResult, EMPTY};
pub use jitter::{boundary_points, jittered_grid};
pub use voronoi::{build_cell_graph, CellGraph};

pub(crate) use jitter::round_to;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cell::Point;
use crate::config::GridConfig;

/// Generate grid points and the boundary ring from configuration
///
/// Returns `(points, boundary)`. The same configuration always yields the same points.
pub fn generate_grid_points(config: &GridConfig) -> (Vec<Point>, Vec<Point>) {
    let spacing = config.spacing();

    // Step 1: Boundary ring outside the map
    let boundary = boundary_points(config.width, config.height, spacing);

    // Step 2: Jittered lattice inside the map
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(config.seed));
    let points = jittered_grid(config.width, config.height, spacing, config.jitter, &mut rng);

    (points, boundary)
}
