//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::cell::Point;

/// Wrapper around KD-tree for nearest-cell queries
///
/// Provides O(log n) lookups from map coordinates to cell ids. Because the
/// cells are Voronoi cells of their centers, the nearest center is the cell
/// containing the position.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
}

impl SpatialIndex {
    /// Build spatial index from cell centers
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_coastline::*;
    ///
    /// let centers = vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 0.0),
    ///     Point::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Point::new(8.0, 1.0)), Some(1));
    /// ```
    pub fn new(centers: &[Point]) -> Self {
        if centers.is_empty() {
            return Self { tree: None, len: 0 };
        }

        let points: Vec<[f64; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
            len: points.len(),
        }
    }

    /// Number of indexed cells
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no cells are indexed
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the cell whose center is nearest to a position
    ///
    /// # Arguments
    ///
    /// * `position` - Map coordinates to query
    ///
    /// # Returns
    ///
    /// Cell ID (index into the centers passed to [`SpatialIndex::new`]) of the
    /// nearest center, or `None` for an empty index
    ///
    /// # Performance
    ///
    /// O(log n) lookup, a few dozen comparisons even for large packs.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_coastline::*;
    /// let index = SpatialIndex::new(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    /// assert_eq!(index.find_nearest(Point::new(9.0, 3.0)), Some(1));
    /// assert_eq!(SpatialIndex::new(&[]).find_nearest(Point::ZERO), None);
    /// ```
    pub fn find_nearest(&self, position: Point) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(nearest.item)
    }

    /// Find the nearest cell, but only if its center lies within `radius`
    ///
    /// Useful for snapping clicks to cells while ignoring positions far off
    /// the mesh, such as the dropped open sea of a pack.
    ///
    /// # Arguments
    ///
    /// * `position` - Map coordinates to query
    /// * `radius` - Maximum distance between `position` and the cell center
    ///
    /// # Returns
    ///
    /// Cell ID of the nearest center, or `None` if it is farther than `radius`
    /// or the index is empty
    pub fn find_within(&self, position: Point, radius: f64) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        (nearest.distance <= radius * radius).then_some(nearest.item)
    }

    /// All cells with centers within `radius`, nearest first
    ///
    /// # Arguments
    ///
    /// * `position` - Map coordinates to query
    /// * `radius` - Search radius in map units
    ///
    /// # Performance
    ///
    /// O(log n + k) for k results; the result vector is allocated per call.
    pub fn cells_within(&self, position: Point, radius: f64) -> Vec<usize> {
        match &self.tree {
            Some(tree) => tree
                .within::<SquaredEuclidean>(&[position.x, position.y], radius * radius)
                .into_iter()
                .map(|neighbour| neighbour.item)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ]
    }

    #[test]
    fn test_spatial_index_basic() {
        let index = SpatialIndex::new(&square());

        assert_eq!(index.find_nearest(Point::new(1.0, 2.0)), Some(0));
        assert_eq!(index.find_nearest(Point::new(9.0, 0.5)), Some(1));
        assert_eq!(index.find_nearest(Point::new(-3.0, 12.0)), Some(2));
        assert_eq!(index.find_nearest(Point::new(7.0, 6.0)), Some(3));
    }

    #[test]
    fn test_spatial_index_radius() {
        let index = SpatialIndex::new(&square());

        assert_eq!(index.find_within(Point::new(1.0, 1.0), 2.0), Some(0));
        assert_eq!(index.find_within(Point::new(5.0, 5.0), 2.0), None);

        let mut near = index.cells_within(Point::new(2.0, 1.0), 10.5);
        assert_eq!(near.first(), Some(&0));
        near.sort_unstable();
        assert_eq!(near, vec![0, 1, 2]);
    }

    #[test]
    fn test_spatial_index_empty() {
        let index = SpatialIndex::new(&[]);
        assert_eq!(index.find_nearest(Point::new(0.0, 0.0)), None);
        assert!(index.cells_within(Point::new(0.0, 0.0), 100.0).is_empty());
    }
}
