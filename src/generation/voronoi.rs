//! Voronoi cell graph construction from Delaunay triangulation
//!
//! Each input point becomes a cell whose polygon vertices are the circumcenters of
//! the Delaunay triangles around it. Boundary points are triangulated together
//! with the cell points so that cells near the map edge get closed polygons, but
//! they never become cells themselves.

use std::time::Instant;

use crate::cell::Point;
use crate::error::{MeshError, Result};
use crate::generation::delaunay::{compute_delaunay, DelaunayResult, EMPTY};

/// Voronoi cell graph over a planar point set
///
/// Struct-of-arrays layout: every per-cell buffer is indexed by cell id
/// (`0..len()`), every per-vertex buffer by Voronoi vertex id, which is also the
/// id of the Delaunay triangle the vertex is the circumcenter of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGraph {
    /// Cell centers
    pub points: Vec<Point>,

    /// Adjacent cell ids, in counter-clockwise walk order
    ///
    /// Symmetric and free of self loops. Boundary points are never listed.
    pub neighbors: Vec<Vec<usize>>,

    /// Voronoi vertex ids forming each cell polygon, in walk order
    pub cell_vertices: Vec<Vec<usize>>,

    /// True if the cell touches the boundary ring or the triangulation hull
    pub border: Vec<bool>,

    /// Voronoi vertex coordinates (triangle circumcenters)
    pub vertex_points: Vec<Point>,

    /// Adjacent Voronoi vertices, `None` across a hull edge
    pub vertex_neighbors: Vec<[Option<usize>; 3]>,

    /// Point ids of the triangle behind each vertex
    ///
    /// Ids `>= len()` refer to boundary points.
    pub vertex_cells: Vec<[usize; 3]>,
}

impl CellGraph {
    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the graph has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Neighbor ids of a cell, empty for an invalid id
    pub fn neighbors_of(&self, cell: usize) -> &[usize] {
        self.neighbors
            .get(cell)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Polygon of a cell as points, empty for an invalid id
    pub fn polygon(&self, cell: usize) -> Vec<Point> {
        self.cell_vertices
            .get(cell)
            .map(|vertices| vertices.iter().map(|&v| self.vertex_points[v]).collect())
            .unwrap_or_default()
    }
}

/// Build the Voronoi cell graph of `points`, padded by `boundary`
///
/// Cell ids follow the order of `points`. An empty point set yields an empty graph.
///
/// # Errors
///
/// Returns `TriangulationFailed` if the combined point set cannot be
/// triangulated, or if a cell point is dropped by the triangulation (exact
/// duplicate).
pub fn build_cell_graph(points: &[Point], boundary: &[Point]) -> Result<CellGraph> {
    let n = points.len();
    if n == 0 {
        return Ok(CellGraph::default());
    }

    let start = Instant::now();

    let mut all_points = Vec::with_capacity(n + boundary.len());
    all_points.extend_from_slice(points);
    all_points.extend_from_slice(boundary);

    let delaunay = compute_delaunay(&all_points)?;

    // One incoming half-edge per cell point; for hull points, the one without
    // an opposite, so that walking from it covers the whole fan.
    let mut inedge = vec![EMPTY; n];
    for e in 0..delaunay.triangles.len() {
        let p = delaunay.triangles[DelaunayResult::next_halfedge(e)];
        if p < n && (delaunay.halfedges[e] == EMPTY || inedge[p] == EMPTY) {
            inedge[p] = e;
        }
    }
    if let Some(missing) = inedge.iter().position(|&e| e == EMPTY) {
        return Err(MeshError::TriangulationFailed(format!(
            "point {} at ({}, {}) is not part of the triangulation (duplicate point?)",
            missing, points[missing].x, points[missing].y
        )));
    }

    let mut neighbors = Vec::with_capacity(n);
    let mut cell_vertices = Vec::with_capacity(n);
    let mut border = Vec::with_capacity(n);

    for (p, &start_edge) in inedge.iter().enumerate() {
        let fan = edges_around_point(&delaunay, start_edge)?;

        let mut adjacent: Vec<usize> = fan
            .edges
            .iter()
            .map(|&e| delaunay.triangles[e])
            .collect();
        if let Some(last) = fan.hull_edge {
            let q = delaunay.triangles[DelaunayResult::next_halfedge(last)];
            if adjacent.last() != Some(&q) {
                adjacent.push(q);
            }
        }

        let cell_neighbors: Vec<usize> = adjacent.iter().copied().filter(|&q| q < n && q != p).collect();

        border.push(fan.hull_edge.is_some() || adjacent.len() > cell_neighbors.len());
        cell_vertices.push(fan.edges.iter().map(|&e| DelaunayResult::triangle_of_edge(e)).collect());
        neighbors.push(cell_neighbors);
    }

    let triangle_count = delaunay.triangle_count();
    let mut vertex_points = Vec::with_capacity(triangle_count);
    let mut vertex_neighbors = Vec::with_capacity(triangle_count);
    let mut vertex_cells = Vec::with_capacity(triangle_count);

    for t in 0..triangle_count {
        let corners = delaunay.points_of_triangle(t);
        vertex_points.push(circumcenter(
            all_points[corners[0]],
            all_points[corners[1]],
            all_points[corners[2]],
        ));
        vertex_neighbors.push([0, 1, 2].map(|k| {
            let opposite = delaunay.halfedges[3 * t + k];
            (opposite != EMPTY).then(|| DelaunayResult::triangle_of_edge(opposite))
        }));
        vertex_cells.push(corners);
    }

    log::debug!(
        "[Voronoi] {} cells ({} boundary points), {} vertices in {:?}",
        n,
        boundary.len(),
        triangle_count,
        start.elapsed()
    );

    Ok(CellGraph {
        points: points.to_vec(),
        neighbors,
        cell_vertices,
        border,
        vertex_points,
        vertex_neighbors,
        vertex_cells,
    })
}

/// Incoming half-edges around a point
struct Fan {
    /// Half-edges ending at the point, in walk order
    edges: Vec<usize>,
    /// Last outgoing half-edge when the walk stopped at the hull
    hull_edge: Option<usize>,
}

/// Walk the triangles around the end point of `start`
fn edges_around_point(delaunay: &DelaunayResult, start: usize) -> Result<Fan> {
    let mut edges = Vec::new();
    let mut incoming = start;

    loop {
        edges.push(incoming);
        let outgoing = DelaunayResult::next_halfedge(incoming);
        let opposite = delaunay.halfedges[outgoing];

        if opposite == EMPTY {
            return Ok(Fan {
                edges,
                hull_edge: Some(outgoing),
            });
        }
        if opposite == start {
            return Ok(Fan {
                edges,
                hull_edge: None,
            });
        }
        if edges.len() > delaunay.halfedges.len() {
            return Err(MeshError::TriangulationFailed(format!(
                "half-edge walk from {} does not close",
                start
            )));
        }
        incoming = opposite;
    }
}

/// Circumcenter of a triangle
///
/// Falls back to the centroid for a degenerate (zero-area) triangle.
fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let ad = a.length_squared();
    let bd = b.length_squared();
    let cd = c.length_squared();
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));

    if d == 0.0 {
        return (a + b + c) / 3.0;
    }

    Point::new(
        (ad * (b.y - c.y) + bd * (c.y - a.y) + cd * (a.y - b.y)) / d,
        (ad * (c.x - b.x) + bd * (a.x - c.x) + cd * (b.x - a.x)) / d,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::polygon_area;
    use crate::testing::lattice;

    #[test]
    fn test_build_lattice() {
        let (points, boundary) = lattice(10, 10, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        assert_eq!(graph.len(), 100);
        assert_eq!(graph.neighbors.len(), 100);
        assert_eq!(graph.cell_vertices.len(), 100);

        for cell in 0..graph.len() {
            assert!(graph.cell_vertices[cell].len() >= 3, "cell {} polygon", cell);
            assert!(graph.neighbors[cell].len() >= 2, "cell {} neighbors", cell);
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let (points, boundary) = lattice(12, 8, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        // If A is a neighbor of B, then B should be a neighbor of A
        for (cell, neighbors) in graph.neighbors.iter().enumerate() {
            for &neighbor in neighbors {
                assert_ne!(neighbor, cell, "self loop at {}", cell);
                assert!(
                    graph.neighbors[neighbor].contains(&cell),
                    "Neighbor relationship should be symmetric ({} -> {})",
                    cell,
                    neighbor
                );
            }
        }
    }

    #[test]
    fn test_lattice_axis_neighbors() {
        let (points, boundary) = lattice(6, 6, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        // Cell (2, 2) touches its four axis neighbours
        let cell = 2 * 6 + 2;
        for other in [cell - 1, cell + 1, cell - 6, cell + 6] {
            assert!(graph.neighbors[cell].contains(&other));
        }
    }

    #[test]
    fn test_border_flags() {
        let (points, boundary) = lattice(8, 8, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        assert!(graph.border[0]);
        assert!(graph.border[7]);
        assert!(graph.border[63]);

        for row in 2..6 {
            for col in 2..6 {
                assert!(!graph.border[row * 8 + col], "interior cell flagged as border");
            }
        }
    }

    #[test]
    fn test_interior_polygon_area() {
        let (points, boundary) = lattice(8, 8, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        let area = polygon_area(&graph.polygon(3 * 8 + 4)).abs();
        assert!(area > 60.0 && area < 140.0, "area {}", area);
    }

    #[test]
    fn test_vertex_adjacency() {
        let (points, boundary) = lattice(5, 5, 10.0);
        let graph = build_cell_graph(&points, &boundary).unwrap();

        assert_eq!(graph.vertex_points.len(), graph.vertex_cells.len());
        for (v, adjacent) in graph.vertex_neighbors.iter().enumerate() {
            for &other in adjacent.iter().flatten() {
                assert!(graph.vertex_neighbors[other].contains(&Some(v)));
            }
        }

        // Every polygon vertex of a cell lists that cell among its corners
        for (cell, vertices) in graph.cell_vertices.iter().enumerate() {
            for &v in vertices {
                assert!(graph.vertex_cells[v].contains(&cell));
            }
        }
    }

    #[test]
    fn test_hull_points_without_boundary() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 5.5),
        ];
        let graph = build_cell_graph(&points, &[]).unwrap();

        assert_eq!(graph.neighbors[4].len(), 4);
        assert!(!graph.border[4]);
        for corner in 0..4 {
            assert!(graph.border[corner]);
            assert!(graph.neighbors[corner].contains(&4));
            assert!(graph.neighbors[4].contains(&corner));
        }
    }

    #[test]
    fn test_duplicate_point_fails() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
        ];
        assert!(matches!(
            build_cell_graph(&points, &[]),
            Err(MeshError::TriangulationFailed(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let graph = build_cell_graph(&[], &[]).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_circumcenter() {
        let c = circumcenter(Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(0.0, 2.0));
        assert!((c - Point::new(1.0, 1.0)).length() < 1e-9);

        let degenerate = circumcenter(Point::ZERO, Point::X, Point::X * 2.0);
        assert_eq!(degenerate, Point::new(1.0, 0.0));
    }
}
