//! Pack: the refined, classified mesh

use std::time::Instant;

use crate::cell::{is_land, PackCell, Point, LAND_RING};
use crate::densify::refine;
use crate::error::Result;
use crate::features::{classify, Feature, FeatureGroup};
use crate::generation::CellGraph;
use crate::grid::Grid;
use crate::rings::label_rings;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// First inland ring value written on the pack
pub const INLAND_RING_START: i8 = LAND_RING + 1;

/// A refined mesh with land/water features and coastline markup
///
/// Built from a coarse [`Grid`]: the coastline is densified, the sea floor far
/// from land is dropped, and the resulting cells are classified into oceans,
/// lakes and landmasses. Land cells carry their distance ring from the coast.
///
/// # Examples
///
/// ```
/// use rust_voronoi_coastline::*;
///
/// let config = GridConfigBuilder::new()
///     .seed(7)
///     .size(300.0, 300.0).unwrap()
///     .cells_desired(900).unwrap()
///     .build()
///     .unwrap();
///
/// let center = Point::new(150.0, 150.0);
/// let grid = Grid::generate(&config, &|p: Point| if p.distance(center) < 90.0 { 60u8 } else { 10 }).unwrap();
/// let pack = Pack::generate(&grid).unwrap();
///
/// for feature in pack.features() {
///     println!("{} #{}: {} cells", feature.group.name(), feature.id, feature.cell_count);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Pack {
    graph: CellGraph,
    heights: Vec<u8>,
    source_cells: Vec<usize>,
    areas: Vec<u32>,
    feature_ids: Vec<usize>,
    coast_types: Vec<i8>,
    havens: Vec<Option<usize>>,
    harbors: Vec<u8>,
    features: Vec<Feature>,

    /// Cell count of the grid the pack was refined from
    reference_cells: usize,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Pack {
    /// Refine and classify a grid
    ///
    /// Runs the densifier, classifies the fine cells with the grid's cell count
    /// as the size reference, then labels inland rings `3, 4, ...` outward from
    /// the coast buffer.
    ///
    /// # Errors
    ///
    /// Fails if the refined points cannot be triangulated or a classification
    /// invariant is violated.
    pub fn generate(grid: &Grid) -> Result<Self> {
        let timer = Instant::now();
        let reference_cells = grid.cell_count();

        let mesh = refine(grid)?;
        let mut markup = classify(&mesh.graph, &mesh.heights, reference_cells)?;
        label_rings(
            &mesh.graph.neighbors,
            &mut markup.coast_types,
            INLAND_RING_START,
            1,
            0,
        )?;

        log::info!(
            "[Features] {} features on {} cells: {}",
            markup.features.len(),
            mesh.graph.len(),
            summarize(&markup.features)
        );
        log::debug!("[Pack] generated in {:?}", timer.elapsed());

        Ok(Self {
            graph: mesh.graph,
            heights: mesh.heights,
            source_cells: mesh.source_cells,
            areas: mesh.areas,
            feature_ids: markup.feature_ids,
            coast_types: markup.coast_types,
            havens: markup.havens,
            harbors: markup.harbors,
            features: markup.features,
            reference_cells,
            #[cfg(feature = "spatial-index")]
            spatial_index: mesh.spatial_index,
        })
    }

    /// Get the number of cells in the pack
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.graph.len()
    }

    /// Cell count of the source grid, used as the feature size reference
    #[inline]
    pub fn reference_cells(&self) -> usize {
        self.reference_cells
    }

    /// Get a view of a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_coastline::*;
    /// # let config = GridConfigBuilder::new().seed(1).cells_desired(400).unwrap().build().unwrap();
    /// # let grid = Grid::generate(&config, &|p: Point| if p.x < 480.0 { 40u8 } else { 0 }).unwrap();
    /// # let pack = Pack::generate(&grid).unwrap();
    /// if let Some(cell) = pack.cell(0) {
    ///     println!("Cell 0 has {} neighbors, coast type {}", cell.neighbor_count(), cell.coast_type);
    /// }
    /// ```
    pub fn cell(&self, id: usize) -> Option<PackCell<'_>> {
        if id >= self.cell_count() {
            return None;
        }

        Some(PackCell {
            id,
            point: self.graph.points[id],
            height: self.heights[id],
            neighbors: &self.graph.neighbors[id],
            polygon: self.graph.polygon(id),
            area: self.areas[id],
            source_cell: self.source_cells[id],
            feature: self.feature_ids[id],
            coast_type: self.coast_types[id],
            haven: self.havens[id],
            harbor: self.harbors[id],
        })
    }

    /// Get neighbor IDs for a cell
    ///
    /// # Arguments
    ///
    /// * `cell_id` - Cell ID to query
    ///
    /// # Returns
    ///
    /// Adjacent cell IDs in walk order, or an empty slice if the cell ID is invalid
    pub fn neighbors(&self, cell_id: usize) -> &[usize] {
        self.graph
            .neighbors
            .get(cell_id)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Voronoi graph of the pack
    #[inline]
    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }

    /// Cell centers
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.graph.points
    }

    /// Height per cell
    #[inline]
    pub fn heights(&self) -> &[u8] {
        &self.heights
    }

    /// Source grid cell per cell
    #[inline]
    pub fn source_cells(&self) -> &[usize] {
        &self.source_cells
    }

    /// Absolute polygon area per cell
    #[inline]
    pub fn areas(&self) -> &[u32] {
        &self.areas
    }

    /// Feature id per cell
    #[inline]
    pub fn feature_ids(&self) -> &[usize] {
        &self.feature_ids
    }

    /// Coast type or inland ring per cell
    #[inline]
    pub fn coast_types(&self) -> &[i8] {
        &self.coast_types
    }

    /// Haven per cell
    #[inline]
    pub fn havens(&self) -> &[Option<usize>] {
        &self.havens
    }

    /// Harbor count per cell
    #[inline]
    pub fn harbors(&self) -> &[u8] {
        &self.harbors
    }

    /// Features in id order
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Look up a feature by id
    pub fn feature(&self, id: usize) -> Option<&Feature> {
        id.checked_sub(1).and_then(|index| self.features.get(index))
    }

    /// Feature a cell belongs to
    pub fn feature_of(&self, cell_id: usize) -> Option<&Feature> {
        self.feature_ids.get(cell_id).and_then(|&id| self.feature(id))
    }

    /// IDs of all land cells, ascending
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_coastline::*;
    /// # let config = GridConfigBuilder::new().seed(2).cells_desired(400).unwrap().build().unwrap();
    /// # let grid = Grid::generate(&config, &|p: Point| if p.y < 270.0 { 35u8 } else { 0 }).unwrap();
    /// # let pack = Pack::generate(&grid).unwrap();
    /// let coastal = pack
    ///     .land_cells()
    ///     .filter(|&id| pack.harbors()[id] > 0)
    ///     .count();
    /// println!("{} coastal land cells", coastal);
    /// ```
    pub fn land_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.heights
            .iter()
            .enumerate()
            .filter(|&(_, &h)| is_land(h))
            .map(|(id, _)| id)
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// Uses the KD-tree over cell centers; the nearest center is the Voronoi
    /// cell that contains the position. Positions in the dropped open sea map
    /// to the nearest remaining water cell.
    ///
    /// # Arguments
    ///
    /// * `position` - Map coordinates to query
    ///
    /// # Returns
    ///
    /// Cell ID of the nearest cell, or `None` for an empty pack
    ///
    /// # Performance
    ///
    /// O(log n) lookup.
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Point) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Find the cell containing a position, if its center is within `radius`
    ///
    /// # Arguments
    ///
    /// * `position` - Map coordinates to query
    /// * `radius` - Maximum distance from `position` to the cell center
    ///
    /// # Returns
    ///
    /// Cell ID, or `None` if no center lies within `radius`
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_within(&self, position: Point, radius: f64) -> Option<usize> {
        self.spatial_index.find_within(position, radius)
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting cell ID
    /// * `hops` - Maximum number of cell hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Reached cell IDs in ascending order, including the center cell.
    /// Returns an empty vec if `center_id` is invalid.
    ///
    /// # Performance
    ///
    /// O(n) for the visited mask plus the size of the reached region.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_coastline::*;
    /// # let config = GridConfigBuilder::new().seed(3).cells_desired(400).unwrap().build().unwrap();
    /// # let grid = Grid::generate(&config, &|p: Point| if p.x > 300.0 { 60u8 } else { 0 }).unwrap();
    /// # let pack = Pack::generate(&grid).unwrap();
    /// let nearby = pack.cells_within_hops(0, 2);
    /// assert!(nearby.contains(&0));
    /// assert!(nearby.windows(2).all(|w| w[0] < w[1]));
    /// ```
    pub fn cells_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cell_count() {
            return vec![];
        }

        let mut visited = vec![false; self.cell_count()];
        let mut current = vec![center_id];
        visited[center_id] = true;

        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell_id in &current {
                for &neighbor in self.neighbors(cell_id) {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            current = next;
        }

        visited
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .map(|(id, _)| id)
            .collect()
    }
}

/// "3 ocean, 1 continent, ..." in group order
fn summarize(features: &[Feature]) -> String {
    const GROUPS: [FeatureGroup; 8] = [
        FeatureGroup::Ocean,
        FeatureGroup::Sea,
        FeatureGroup::Gulf,
        FeatureGroup::Lake,
        FeatureGroup::Continent,
        FeatureGroup::Island,
        FeatureGroup::Isle,
        FeatureGroup::LakeIsland,
    ];

    let parts: Vec<String> = GROUPS
        .iter()
        .filter_map(|&group| {
            let count = features.iter().filter(|f| f.group == group).count();
            (count > 0).then(|| format!("{} {}", count, group.name()))
        })
        .collect();

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
