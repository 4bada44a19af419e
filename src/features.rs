//! Feature classification
//!
//! Partitions a cell graph into connected components of same land/water-ness
//! ("features") with a single flood fill per component, marking coastlines on the
//! way. Each feature gets a kind (island, lake, ocean) and a size-based group.

use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::{is_land, LAND_COAST, LAND_RING, UNMARKED, WATER_COAST};
use crate::error::{MeshError, Result};
use crate::generation::CellGraph;

/// Feature id reserved for "no feature"
pub const NO_FEATURE: usize = 0;

/// Basic kind of a feature
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Connected land
    Island,
    /// Water not touching the map border
    Lake,
    /// Water touching the map border
    Ocean,
}

impl FeatureKind {
    /// Lowercase name used by downstream consumers
    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Island => "island",
            FeatureKind::Lake => "lake",
            FeatureKind::Ocean => "ocean",
        }
    }
}

/// Size-based subtype of a feature
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    /// Land larger than a tenth of the reference cell count
    Continent,
    /// Land larger than a thousandth of the reference cell count
    Island,
    /// Small land
    Isle,
    /// Land whose first cell follows a lake cell in id order
    LakeIsland,
    /// Border water larger than a 25th of the reference cell count
    Ocean,
    /// Border water larger than a hundredth of the reference cell count
    Sea,
    /// Small border water
    Gulf,
    /// Enclosed water
    Lake,
}

impl FeatureGroup {
    /// Lowercase name used by downstream consumers
    pub fn name(self) -> &'static str {
        match self {
            FeatureGroup::Continent => "continent",
            FeatureGroup::Island => "island",
            FeatureGroup::Isle => "isle",
            FeatureGroup::LakeIsland => "lake_island",
            FeatureGroup::Ocean => "ocean",
            FeatureGroup::Sea => "sea",
            FeatureGroup::Gulf => "gulf",
            FeatureGroup::Lake => "lake",
        }
    }

    /// Group of a water feature touching the border
    pub fn for_ocean(cell_count: usize, reference_cells: usize) -> Self {
        let count = cell_count as f64;
        let reference = reference_cells as f64;
        if count > reference / 25.0 {
            FeatureGroup::Ocean
        } else if count > reference / 100.0 {
            FeatureGroup::Sea
        } else {
            FeatureGroup::Gulf
        }
    }

    /// Group of a land feature not flagged as a lake island
    pub fn for_land(cell_count: usize, reference_cells: usize) -> Self {
        let count = cell_count as f64;
        let reference = reference_cells as f64;
        if count > reference / 10.0 {
            FeatureGroup::Continent
        } else if count > reference / 1000.0 {
            FeatureGroup::Island
        } else {
            FeatureGroup::Isle
        }
    }
}

/// A connected component of land or water cells
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature id, 1-based and sequential in creation order
    pub id: usize,
    /// True for land features
    pub is_land: bool,
    /// True if any member cell is a border cell
    pub touches_border: bool,
    /// Basic kind
    pub kind: FeatureKind,
    /// Size-based subtype
    pub group: FeatureGroup,
    /// Number of member cells
    pub cell_count: usize,
    /// Cell the flood fill started from (lowest member id)
    pub seed_cell: usize,
}

/// Per-cell classification of a cell graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Owning feature id of each cell
    pub feature_ids: Vec<usize>,
    /// Coast type or ring value of each cell
    pub coast_types: Vec<i8>,
    /// Nearest adjacent water cell of coastal land cells
    pub havens: Vec<Option<usize>>,
    /// Number of adjacent water cells of coastal land cells
    pub harbors: Vec<u8>,
    /// Features in id order
    pub features: Vec<Feature>,
}

impl Classification {
    /// Look up a feature by id
    pub fn feature(&self, id: usize) -> Option<&Feature> {
        id.checked_sub(1).and_then(|index| self.features.get(index))
    }
}

/// What the flood fill records besides feature ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloodMode {
    /// Coarse grid: coast types ±1 only
    Grid,
    /// Fine pack: inland buffer ring, havens and harbors
    Pack,
}

/// Classify the cells of a fine mesh into features
///
/// `reference_cells` is the size reference for feature groups, normally the
/// cell count of the coarse grid the mesh was refined from.
///
/// Land cells next to water get coast type `1`, water cells next to land `-1`,
/// and land cells next to a `1` cell are pre-tagged `2` as the seed of the
/// inland rings. Coastal land cells get their haven (nearest water neighbour by
/// squared distance, first on ties) and harbor (number of water neighbours).
///
/// Land groups use a known heuristic: a land feature whose first cell directly
/// follows a lake cell in id order is a lake island.
///
/// # Errors
///
/// Returns `BufferMismatch` if `heights` does not cover every cell, and
/// `Internal` if a cell is left without a feature.
pub fn classify(graph: &CellGraph, heights: &[u8], reference_cells: usize) -> Result<Classification> {
    flood_features(graph, heights, reference_cells, FloodMode::Pack)
}

/// Classify the cells of a coarse grid into features
///
/// Same flood fill as [`classify`], but only coast types `1` and `-1` are
/// written and no havens are computed. Groups are sized against the grid itself.
pub fn mark_grid_features(graph: &CellGraph, heights: &[u8]) -> Result<Classification> {
    flood_features(graph, heights, graph.len(), FloodMode::Grid)
}

fn flood_features(
    graph: &CellGraph,
    heights: &[u8],
    reference_cells: usize,
    mode: FloodMode,
) -> Result<Classification> {
    let n = graph.len();
    MeshError::check_len("heights", n, heights.len())?;

    let timer = Instant::now();
    let mut cls = Classification {
        feature_ids: vec![NO_FEATURE; n],
        coast_types: vec![UNMARKED; n],
        havens: vec![None; n],
        harbors: vec![0; n],
        features: Vec::new(),
    };

    let mut cursor = 0;
    let mut stack = Vec::new();

    while let Some(start) = next_unmarked(&cls.feature_ids, &mut cursor) {
        let id = cls.features.len() + 1;
        let land = is_land(heights[start]);
        let mut touches_border = false;
        let mut cell_count = 1;

        cls.feature_ids[start] = id;
        stack.push(start);

        while let Some(q) = stack.pop() {
            touches_border |= graph.border[q];

            // Coast flags of `q` are settled before its land neighbours are looked
            // at, so the inland buffer does not depend on the visiting order.
            if land {
                mark_coast(graph, heights, q, mode, &mut cls);
            }

            for &e in &graph.neighbors[q] {
                let e_land = is_land(heights[e]);

                if land && e_land && mode == FloodMode::Pack {
                    if cls.coast_types[e] == UNMARKED && cls.coast_types[q] == LAND_COAST {
                        cls.coast_types[e] = LAND_RING;
                    } else if cls.coast_types[q] == UNMARKED && cls.coast_types[e] == LAND_COAST {
                        cls.coast_types[q] = LAND_RING;
                    }
                }

                if cls.feature_ids[e] == NO_FEATURE && land == e_land {
                    cls.feature_ids[e] = id;
                    cell_count += 1;
                    stack.push(e);
                }
            }
        }

        let kind = if land {
            FeatureKind::Island
        } else if touches_border {
            FeatureKind::Ocean
        } else {
            FeatureKind::Lake
        };

        let group = match kind {
            FeatureKind::Ocean => FeatureGroup::for_ocean(cell_count, reference_cells),
            FeatureKind::Lake => FeatureGroup::Lake,
            FeatureKind::Island => {
                if follows_lake(&cls, start) {
                    FeatureGroup::LakeIsland
                } else {
                    FeatureGroup::for_land(cell_count, reference_cells)
                }
            }
        };

        cls.features.push(Feature {
            id,
            is_land: land,
            touches_border,
            kind,
            group,
            cell_count,
            seed_cell: start,
        });
    }

    if let Some(cell) = cls.feature_ids.iter().position(|&f| f == NO_FEATURE) {
        return Err(MeshError::Internal(format!(
            "cell {} left unclassified after {} features",
            cell,
            cls.features.len()
        )));
    }

    let land_features = cls.features.iter().filter(|f| f.is_land).count();
    log::debug!(
        "[Features] {:?}: {} features ({} land, {} water) over {} cells in {:?}",
        mode,
        cls.features.len(),
        land_features,
        cls.features.len() - land_features,
        n,
        timer.elapsed()
    );

    Ok(cls)
}

/// Advance the cursor to the next cell without a feature
///
/// Cells are only ever marked, never unmarked, so the cursor never moves back.
fn next_unmarked(feature_ids: &[usize], cursor: &mut usize) -> Option<usize> {
    while *cursor < feature_ids.len() {
        if feature_ids[*cursor] == NO_FEATURE {
            return Some(*cursor);
        }
        *cursor += 1;
    }
    None
}

/// Check whether the cell preceding `start` in id order belongs to a lake
///
/// Every cell before `start` is already classified when `start` opens a feature.
fn follows_lake(cls: &Classification, start: usize) -> bool {
    start
        .checked_sub(1)
        .and_then(|previous| cls.feature(cls.feature_ids[previous]))
        .is_some_and(|feature| feature.kind == FeatureKind::Lake)
}

/// Tag a land cell and its water neighbours as coast
fn mark_coast(graph: &CellGraph, heights: &[u8], cell: usize, mode: FloodMode, cls: &mut Classification) {
    let mut coastal = false;
    for &neighbor in &graph.neighbors[cell] {
        if !is_land(heights[neighbor]) {
            cls.coast_types[neighbor] = WATER_COAST;
            coastal = true;
        }
    }

    if coastal {
        cls.coast_types[cell] = LAND_COAST;
        if mode == FloodMode::Pack && cls.havens[cell].is_none() {
            define_haven(graph, heights, cell, cls);
        }
    }
}

/// Record the nearest water neighbour and the water neighbour count of a land cell
fn define_haven(graph: &CellGraph, heights: &[u8], cell: usize, cls: &mut Classification) {
    let origin = graph.points[cell];
    let mut closest: Option<(usize, f64)> = None;
    let mut water = 0usize;

    for &neighbor in &graph.neighbors[cell] {
        if is_land(heights[neighbor]) {
            continue;
        }
        water += 1;
        let dist2 = origin.distance_squared(graph.points[neighbor]);
        if closest.map_or(true, |(_, best)| dist2 < best) {
            closest = Some((neighbor, dist2));
        }
    }

    cls.havens[cell] = closest.map(|(neighbor, _)| neighbor);
    cls.harbors[cell] = u8::try_from(water).unwrap_or(u8::MAX);
}
