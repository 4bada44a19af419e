//! Cell primitives
//!
//! Height and coast-type conventions shared by the grid and the pack, plus a
//! borrowed view over a single classified pack cell.

use glam::DVec2;

/// A 2D coordinate in map units
pub type Point = DVec2;

/// Heights at or above this value are land, below it water
pub const LAND_HEIGHT: u8 = 20;

/// Highest valid height
pub const MAX_HEIGHT: u8 = 100;

/// Coast type of a cell that has not been tagged
pub const UNMARKED: i8 = 0;
/// Land cell with at least one water neighbour
pub const LAND_COAST: i8 = 1;
/// Water cell with at least one land neighbour
pub const WATER_COAST: i8 = -1;
/// Land cell one ring inland from the coast
pub const LAND_RING: i8 = 2;
/// Water cell one ring away from the coast
pub const WATER_RING: i8 = -2;

/// Check whether a height code is land
#[inline]
pub fn is_land(height: u8) -> bool {
    height >= LAND_HEIGHT
}

/// Signed area of a polygon (shoelace formula)
///
/// The sign depends on the winding; callers wanting a size should take `abs()`.
pub fn polygon_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut b = polygon[n - 1];
    for &a in polygon {
        area += b.y * a.x - b.x * a.y;
        b = a;
    }
    area / 2.0
}

/// A single classified cell of the pack
///
/// Borrowed view assembled from the pack's per-cell buffers. Obtain one with
/// [`Pack::cell`](crate::Pack::cell).
#[derive(Debug, Clone)]
pub struct PackCell<'a> {
    /// Cell identifier (0 to cell_count-1)
    pub id: usize,

    /// Cell center in map units
    pub point: Point,

    /// Height code inherited from the source grid cell
    pub height: u8,

    /// IDs of adjacent cells
    pub neighbors: &'a [usize],

    /// Voronoi polygon of the cell
    pub polygon: Vec<Point>,

    /// Absolute polygon area, truncated
    pub area: u32,

    /// Grid cell this point was derived from
    pub source_cell: usize,

    /// Owning feature id (1-based)
    pub feature: usize,

    /// Coast type or inland ring value
    pub coast_type: i8,

    /// Nearest adjacent water cell, set for coastal land
    pub haven: Option<usize>,

    /// Number of adjacent water cells, set for coastal land
    pub harbor: u8,
}

impl PackCell<'_> {
    /// Check whether the cell is land
    #[inline]
    pub fn is_land(&self) -> bool {
        is_land(self.height)
    }

    /// Check whether the cell is on a coastline, on either side
    #[inline]
    pub fn is_coastal(&self) -> bool {
        self.coast_type == LAND_COAST || self.coast_type == WATER_COAST
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains(&other_cell_id)
    }

    /// Squared distance from the cell center to a point
    #[inline]
    pub fn distance_squared_to(&self, point: Point) -> f64 {
        self.point.distance_squared(point)
    }
}
