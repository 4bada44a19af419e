//! Coarse grid
//!
//! The low-resolution input mesh: a Voronoi graph over a jittered lattice with
//! per-cell heights and the upstream markup (features and coast types) that
//! drives point selection during refinement.

use std::time::Instant;

use crate::cell::{Point, MAX_HEIGHT, WATER_RING};
use crate::config::GridConfig;
use crate::error::{MeshError, Result};
use crate::features::{mark_grid_features, Feature, NO_FEATURE};
use crate::generation::{build_cell_graph, generate_grid_points, CellGraph};
use crate::rings::label_rings;

/// Last water ring value written on the grid (exclusive)
pub const GRID_WATER_RING_LIMIT: i8 = -10;

/// Trait for assigning heights to generated grid points
///
/// Implemented for any `Fn(Point) -> u8`, so a closure is usually enough.
/// Values above 100 are clamped.
pub trait HeightSampler {
    /// Sample the height code at a point
    fn sample(&self, point: Point) -> u8;
}

impl<F> HeightSampler for F
where
    F: Fn(Point) -> u8,
{
    fn sample(&self, point: Point) -> u8 {
        self(point)
    }
}

/// Precomputed grid buffers as produced by an upstream generator
#[derive(Debug, Clone, Default)]
pub struct GridParts {
    /// Cell centers
    pub points: Vec<Point>,
    /// Boundary ring used for triangulation padding
    pub boundary: Vec<Point>,
    /// Base point spacing
    pub spacing: f64,
    /// Height code per cell
    pub heights: Vec<u8>,
    /// Feature id per cell (1-based)
    pub feature_ids: Vec<usize>,
    /// Coast type per cell
    pub coast_types: Vec<i8>,
    /// Grid features in id order
    pub features: Vec<Feature>,
}

/// The coarse input grid
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Grid {
    graph: CellGraph,
    boundary: Vec<Point>,
    spacing: f64,
    heights: Vec<u8>,
    feature_ids: Vec<usize>,
    coast_types: Vec<i8>,
    features: Vec<Feature>,
}

impl Grid {
    /// Generate a grid from configuration, sampling heights at every point
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_coastline::*;
    ///
    /// let config = GridConfigBuilder::new()
    ///     .seed(42)
    ///     .size(200.0, 200.0).unwrap()
    ///     .cells_desired(400).unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// // Round island in the middle of the map
    /// let center = Point::new(100.0, 100.0);
    /// let grid = Grid::generate(&config, &|p: Point| if p.distance(center) < 60.0 { 50u8 } else { 5 }).unwrap();
    ///
    /// assert_eq!(grid.cell_count(), 400);
    /// assert!(grid.features().len() >= 2);
    /// ```
    pub fn generate<S: HeightSampler>(config: &GridConfig, sampler: &S) -> Result<Self> {
        let (points, boundary) = generate_grid_points(config);
        let heights = points
            .iter()
            .map(|&p| sampler.sample(p).min(MAX_HEIGHT))
            .collect();
        Self::from_points(points, boundary, config.spacing(), heights)
    }

    /// Build a grid from points and heights, deriving features and coast types
    ///
    /// Land coasts are tagged `1`, water coasts `-1`, and water rings
    /// `-2, -3, ...` down to `-9` outward from the coast.
    ///
    /// # Errors
    ///
    /// Returns `BufferMismatch` if `heights` does not match `points`,
    /// `InvalidConfig` for a non-positive spacing, and triangulation errors from the
    /// geometry kernel.
    pub fn from_points(
        points: Vec<Point>,
        boundary: Vec<Point>,
        spacing: f64,
        heights: Vec<u8>,
    ) -> Result<Self> {
        MeshError::check_len("heights", points.len(), heights.len())?;
        check_spacing(spacing)?;

        let timer = Instant::now();
        let graph = build_cell_graph(&points, &boundary)?;

        let mut markup = mark_grid_features(&graph, &heights)?;
        label_rings(
            &graph.neighbors,
            &mut markup.coast_types,
            WATER_RING,
            -1,
            GRID_WATER_RING_LIMIT,
        )?;

        log::debug!(
            "[Grid] {} cells, {} features marked in {:?}",
            graph.len(),
            markup.features.len(),
            timer.elapsed()
        );

        Ok(Self {
            graph,
            boundary,
            spacing,
            heights,
            feature_ids: markup.feature_ids,
            coast_types: markup.coast_types,
            features: markup.features,
        })
    }

    /// Build a grid from precomputed upstream buffers
    ///
    /// The markup is taken as-is; only its consistency is checked.
    ///
    /// # Errors
    ///
    /// Returns `BufferMismatch` if a per-cell buffer does not match the point
    /// count, and `InvalidInput` if a feature id is unknown or the feature list is
    /// not in id order.
    pub fn from_parts(parts: GridParts) -> Result<Self> {
        let n = parts.points.len();
        MeshError::check_len("heights", n, parts.heights.len())?;
        MeshError::check_len("feature_ids", n, parts.feature_ids.len())?;
        MeshError::check_len("coast_types", n, parts.coast_types.len())?;
        check_spacing(parts.spacing)?;

        for (index, feature) in parts.features.iter().enumerate() {
            if feature.id != index + 1 {
                return Err(MeshError::InvalidInput(format!(
                    "feature at position {} has id {}, expected {}",
                    index,
                    feature.id,
                    index + 1
                )));
            }
        }
        if let Some(cell) = parts
            .feature_ids
            .iter()
            .position(|&f| f == NO_FEATURE || f > parts.features.len())
        {
            return Err(MeshError::InvalidInput(format!(
                "cell {} refers to unknown feature {}",
                cell, parts.feature_ids[cell]
            )));
        }

        let graph = build_cell_graph(&parts.points, &parts.boundary)?;

        Ok(Self {
            graph,
            boundary: parts.boundary,
            spacing: parts.spacing,
            heights: parts.heights,
            feature_ids: parts.feature_ids,
            coast_types: parts.coast_types,
            features: parts.features,
        })
    }

    /// Number of grid cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.graph.len()
    }

    /// Base point spacing
    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Voronoi graph of the grid
    #[inline]
    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }

    /// Cell centers
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.graph.points
    }

    /// Boundary ring
    #[inline]
    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    /// Height code per cell
    #[inline]
    pub fn heights(&self) -> &[u8] {
        &self.heights
    }

    /// Feature id per cell
    #[inline]
    pub fn feature_ids(&self) -> &[usize] {
        &self.feature_ids
    }

    /// Coast type per cell
    #[inline]
    pub fn coast_types(&self) -> &[i8] {
        &self.coast_types
    }

    /// Grid features in id order
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Look up a feature by id
    pub fn feature(&self, id: usize) -> Option<&Feature> {
        id.checked_sub(1).and_then(|index| self.features.get(index))
    }

    /// Feature a cell belongs to
    pub fn feature_of(&self, cell: usize) -> Option<&Feature> {
        self.feature_ids.get(cell).and_then(|&id| self.feature(id))
    }
}

fn check_spacing(spacing: f64) -> Result<()> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidConfig(format!(
            "point spacing must be positive (got {})",
            spacing
        )))
    }
}
