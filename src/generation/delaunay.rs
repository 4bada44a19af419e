//! Planar Delaunay triangulation
//!
//! Thin wrapper around the `delaunator` half-edge triangulation. Triangle `t` owns
//! half-edges `3t`, `3t + 1` and `3t + 2`; `halfedges[e]` is the opposite half-edge
//! in the adjacent triangle, or [`EMPTY`] on the hull.

use delaunator::triangulate;

use crate::cell::Point;
use crate::error::{MeshError, Result};

/// Marker for a half-edge without an opposite (hull edge)
pub use delaunator::EMPTY;

/// Result of Delaunay triangulation
///
/// Point ids are the indices of the input slice; nothing is reordered.
#[derive(Debug, Clone)]
pub struct DelaunayResult {
    /// Point id at the start of each half-edge
    pub triangles: Vec<usize>,
    /// Opposite half-edge, or `EMPTY`
    pub halfedges: Vec<usize>,
}

impl DelaunayResult {
    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Triangle that owns a half-edge
    #[inline]
    pub fn triangle_of_edge(e: usize) -> usize {
        e / 3
    }

    /// Next half-edge within the same triangle
    #[inline]
    pub fn next_halfedge(e: usize) -> usize {
        if e % 3 == 2 {
            e - 2
        } else {
            e + 1
        }
    }

    /// The three point ids of a triangle
    #[inline]
    pub fn points_of_triangle(&self, t: usize) -> [usize; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }
}

/// Compute the Delaunay triangulation of a point set
///
/// # Errors
///
/// Returns `TriangulationFailed` if the points do not span a plane (fewer than
/// three points, or all collinear)
pub fn compute_delaunay(points: &[Point]) -> Result<DelaunayResult> {
    let coords: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point { x: p.x, y: p.y })
        .collect();

    let triangulation = triangulate(&coords);
    if triangulation.triangles.is_empty() {
        return Err(MeshError::TriangulationFailed(format!(
            "{} points do not form a single triangle (collinear or too few)",
            points.len()
        )));
    }

    Ok(DelaunayResult {
        triangles: triangulation.triangles,
        halfedges: triangulation.halfedges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_delaunay_square() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.1),
        ];

        let result = compute_delaunay(&points).unwrap();

        assert_eq!(result.triangle_count(), 2);
        assert_eq!(result.halfedges.len(), 6);
        // Exactly one interior edge, seen from both sides; the rest is hull
        let interior = result.halfedges.iter().filter(|&&h| h != EMPTY).count();
        assert_eq!(interior, 2);
        assert_eq!(result.halfedges.len() - interior, 4);
    }

    #[test]
    fn test_collinear_points_fail() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ];
        assert!(matches!(
            compute_delaunay(&points),
            Err(MeshError::TriangulationFailed(_))
        ));
    }

    #[test]
    fn test_too_few_points_fail() {
        assert!(compute_delaunay(&[]).is_err());
        assert!(compute_delaunay(&[Point::ZERO, Point::X]).is_err());
    }

    #[test]
    fn test_halfedge_helpers() {
        assert_eq!(DelaunayResult::next_halfedge(0), 1);
        assert_eq!(DelaunayResult::next_halfedge(2), 0);
        assert_eq!(DelaunayResult::next_halfedge(5), 3);
        assert_eq!(DelaunayResult::triangle_of_edge(5), 1);
    }
}
