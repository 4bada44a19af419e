//! Mesh densification
//!
//! Derives the fine point set from a coarse grid: deep ocean is dropped, the
//! second water ring is thinned, and extra points are inserted along the
//! coastline so coasts get a higher resolution than the open sea.

use std::time::Instant;

use crate::cell::{is_land, polygon_area, Point, LAND_COAST, WATER_COAST, WATER_RING};
use crate::error::Result;
use crate::features::FeatureKind;
use crate::generation::{build_cell_graph, round_to, CellGraph};
use crate::grid::Grid;
#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Every n-th cell of the second water ring is dropped
const WATER_RING_THINNING: usize = 4;

/// Points chosen for the fine mesh, with their provenance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Fine mesh points in emission order
    pub points: Vec<Point>,
    /// Grid cell each point was derived from
    pub source_cells: Vec<usize>,
    /// Height inherited from the source cell
    pub heights: Vec<u8>,
    /// How many of the points are coastline midpoints
    pub midpoints: usize,
}

impl Selection {
    fn push(&mut self, point: Point, source: usize, height: u8) {
        self.points.push(point);
        self.source_cells.push(source);
        self.heights.push(height);
    }
}

/// The fine mesh produced by [`refine`], before classification
#[derive(Debug, Clone)]
pub struct RefinedMesh {
    /// Voronoi graph over the selected points
    pub graph: CellGraph,
    /// Height per fine cell
    pub heights: Vec<u8>,
    /// Grid cell per fine cell
    pub source_cells: Vec<usize>,
    /// Absolute polygon area per fine cell, truncated
    pub areas: Vec<u32>,
    /// Nearest-cell lookup over the fine points
    #[cfg(feature = "spatial-index")]
    pub spatial_index: SpatialIndex,
}

/// Choose the fine mesh points from a coarse grid
///
/// Cells are visited in id order. A cell contributes its own point unless it is
/// deep water, or second-ring water that is either every fourth cell or part of
/// a lake. Coastal cells away from the map border additionally contribute the
/// midpoint towards each higher-id neighbour with the same coast type, as long
/// as the two centers are at least one grid spacing apart.
pub fn select_points(grid: &Grid) -> Selection {
    let points = grid.points();
    let heights = grid.heights();
    let coast = grid.coast_types();
    let border = &grid.graph().border;
    let spacing2 = grid.spacing() * grid.spacing();

    let mut selection = Selection::default();

    for i in 0..grid.cell_count() {
        let height = heights[i];
        let t = coast[i];

        if !is_land(height) && t != WATER_COAST && t != WATER_RING {
            continue;
        }
        if t == WATER_RING && (i % WATER_RING_THINNING == 0 || in_lake(grid, i)) {
            continue;
        }

        let p = points[i];
        selection.push(p, i, height);

        if (t != LAND_COAST && t != WATER_COAST) || border[i] {
            continue;
        }
        for &e in grid.graph().neighbors_of(i) {
            if e < i || coast[e] != t {
                continue;
            }
            if p.distance_squared(points[e]) < spacing2 {
                continue;
            }
            let mid = (p + points[e]) / 2.0;
            let mid = Point::new(round_to(mid.x, 1), round_to(mid.y, 1));
            selection.push(mid, i, height);
            selection.midpoints += 1;
        }
    }

    selection
}

fn in_lake(grid: &Grid, cell: usize) -> bool {
    grid.feature_of(cell)
        .is_some_and(|feature| feature.kind == FeatureKind::Lake)
}

/// Refine a coarse grid into a fine mesh
///
/// Selects the points with [`select_points`], triangulates them with the grid's
/// boundary ring and computes cell areas.
///
/// # Errors
///
/// Returns a triangulation error if the selected points are degenerate, for
/// example when fewer than three points survive selection.
pub fn refine(grid: &Grid) -> Result<RefinedMesh> {
    let timer = Instant::now();

    let selection = select_points(grid);
    log::debug!(
        "[Regraph] selected {} points ({} coastline midpoints) from {} grid cells",
        selection.points.len(),
        selection.midpoints,
        grid.cell_count()
    );

    let graph = build_cell_graph(&selection.points, grid.boundary())?;

    let areas = (0..graph.len())
        .map(|cell| polygon_area(&graph.polygon(cell)).abs() as u32)
        .collect();

    #[cfg(feature = "spatial-index")]
    let spatial_index = SpatialIndex::new(&graph.points);

    log::debug!("[Regraph] fine mesh of {} cells built in {:?}", graph.len(), timer.elapsed());

    Ok(RefinedMesh {
        graph,
        heights: selection.heights,
        source_cells: selection.source_cells,
        areas,
        #[cfg(feature = "spatial-index")]
        spatial_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lattice, lattice_heights};

    const COLS: usize = 24;
    const ROWS: usize = 24;

    /// Square island in the middle of a 24x24 lattice, with a one-cell lake
    fn island_grid(spacing: f64) -> Grid {
        let (points, boundary) = lattice(COLS, ROWS, 10.0);
        let heights = lattice_heights(COLS, ROWS, |col, row| {
            (6..18).contains(&col) && (6..18).contains(&row) && !(col == 11 && row == 11)
        });
        Grid::from_points(points, boundary, spacing, heights).unwrap()
    }

    #[test]
    fn test_every_land_cell_is_kept() {
        let grid = island_grid(10.0);
        let selection = select_points(&grid);

        for cell in 0..grid.cell_count() {
            if is_land(grid.heights()[cell]) {
                assert!(
                    selection.source_cells.contains(&cell),
                    "land cell {} was dropped",
                    cell
                );
            }
        }
    }

    #[test]
    fn test_water_selection_rules() {
        let grid = island_grid(10.0);
        let selection = select_points(&grid);
        let coast = grid.coast_types();

        for cell in 0..grid.cell_count() {
            if is_land(grid.heights()[cell]) {
                continue;
            }
            let kept = selection.source_cells.contains(&cell);
            let expected = match coast[cell] {
                WATER_COAST => true,
                WATER_RING => cell % 4 != 0,
                _ => false,
            };
            assert_eq!(kept, expected, "water cell {} with coast {}", cell, coast[cell]);
        }

        // The lake cell is a water coast cell and always survives
        let lake = 11 * COLS + 11;
        assert_eq!(coast[lake], WATER_COAST);
        assert!(selection.source_cells.contains(&lake));
    }

    #[test]
    fn test_lake_ring_is_dropped() {
        // A 3x3 lake inside a large island: its center is second ring water
        let (points, boundary) = lattice(COLS, ROWS, 10.0);
        let heights = lattice_heights(COLS, ROWS, |col, row| {
            (4..20).contains(&col) && (4..20).contains(&row) && !((10..13).contains(&col) && (10..13).contains(&row))
        });
        let grid = Grid::from_points(points, boundary, 10.0, heights).unwrap();

        let center = 11 * COLS + 11;
        assert_eq!(grid.coast_types()[center], WATER_RING);
        assert_eq!(grid.feature_of(center).map(|f| f.kind), Some(FeatureKind::Lake));
        assert_ne!(center % 4, 0);

        let selection = select_points(&grid);
        assert!(!selection.source_cells.contains(&center));
    }

    #[test]
    fn test_coastline_midpoints() {
        // A tiny spacing lets every same-type coastal pair produce a midpoint
        let grid = island_grid(1.0);
        let selection = select_points(&grid);
        let coast = grid.coast_types();
        let border = &grid.graph().border;

        let mut expected = 0;
        for i in 0..grid.cell_count() {
            let t = coast[i];
            if (t == LAND_COAST || t == WATER_COAST) && !border[i] {
                expected += grid
                    .graph()
                    .neighbors_of(i)
                    .iter()
                    .filter(|&&e| e > i && coast[e] == t)
                    .count();
            }
        }
        assert!(expected > 0);
        assert_eq!(selection.midpoints, expected);

        // Each midpoint sits on a rounded pair center and is tagged with the
        // lower id of the pair
        let points = grid.points();
        let mut pairs = Vec::new();
        for (k, &point) in selection.points.iter().enumerate() {
            let source = selection.source_cells[k];
            assert_eq!(selection.heights[k], grid.heights()[source]);
            if point == points[source] {
                continue;
            }

            let partners: Vec<usize> = grid
                .graph()
                .neighbors_of(source)
                .iter()
                .copied()
                .filter(|&e| {
                    let mid = (points[source] + points[e]) / 2.0;
                    point == Point::new(round_to(mid.x, 1), round_to(mid.y, 1))
                })
                .collect();
            assert_eq!(partners.len(), 1, "midpoint {} has no unique partner", k);

            let partner = partners[0];
            assert_eq!(source, source.min(partner), "midpoint {} tagged with the higher id", k);
            assert_eq!(coast[partner], coast[source]);
            pairs.push((source, partner));
        }

        assert_eq!(pairs.len(), expected);
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), expected);
    }

    #[test]
    fn test_midpoint_rounding() {
        let grid = island_grid(1.0);
        let selection = select_points(&grid);

        let midpoints: Vec<Point> = selection
            .points
            .iter()
            .zip(&selection.source_cells)
            .filter(|&(p, &source)| *p != grid.points()[source])
            .map(|(&p, _)| p)
            .collect();
        assert_eq!(midpoints.len(), selection.midpoints);

        for p in midpoints {
            assert_eq!(p.x, round_to(p.x, 1));
            assert_eq!(p.y, round_to(p.y, 1));
        }
    }

    #[test]
    fn test_large_spacing_disables_midpoints() {
        let grid = island_grid(100.0);
        let selection = select_points(&grid);
        assert_eq!(selection.midpoints, 0);
        assert!(selection.source_cells.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_refine_builds_mesh() {
        let grid = island_grid(1.0);
        let selection = select_points(&grid);
        let mesh = refine(&grid).unwrap();

        assert_eq!(mesh.graph.len(), selection.points.len());
        assert_eq!(mesh.heights, selection.heights);
        assert_eq!(mesh.source_cells, selection.source_cells);
        assert_eq!(mesh.areas.len(), mesh.graph.len());
        assert!(mesh.graph.len() > grid.features()[1].cell_count);

        for cell in 0..mesh.graph.len() {
            for &n in mesh.graph.neighbors_of(cell) {
                assert!(mesh.graph.neighbors_of(n).contains(&cell));
            }
        }

        #[cfg(feature = "spatial-index")]
        {
            let p = mesh.graph.points[7];
            assert_eq!(mesh.spatial_index.find_nearest(p), Some(7));
        }
    }
}
