//! Coastline-aware Voronoi mesh refinement
//!
//! Takes a coarse, uniformly spaced Voronoi grid with heights and turns it into
//! a "pack": a mesh that drops open sea, adds resolution along coastlines, and
//! classifies its cells into oceans, lakes and landmasses with coastline and
//! inland distance markup.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_coastline::*;
//!
//! // Coarse grid
//! let config = GridConfigBuilder::new()
//!     .seed(42)
//!     .size(400.0, 300.0).unwrap()
//!     .cells_desired(1200).unwrap()
//!     .build().unwrap();
//!
//! let center = Point::new(200.0, 150.0);
//! let grid = Grid::generate(&config, &|p: Point| {
//!     if p.distance(center) < 100.0 { 50u8 } else { 5 }
//! }).unwrap();
//!
//! // Refine and classify
//! let pack = Pack::generate(&grid).unwrap();
//! println!("{} grid cells refined into {} pack cells", grid.cell_count(), pack.cell_count());
//!
//! for feature in pack.features() {
//!     println!("#{} {} ({} cells)", feature.id, feature.group.name(), feature.cell_count);
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, features and exported buffers

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod generation;
pub mod rings;
pub mod features;
pub mod grid;
pub mod densify;
pub mod pack;
pub mod export;

#[cfg(feature = "spatial-index")]
pub mod spatial;

#[cfg(test)]
mod testing;

// Re-export core types for convenience
pub use error::{MeshError, Result};
pub use config::{GridConfig, GridConfigBuilder};
pub use cell::{is_land, polygon_area, PackCell, Point, LAND_HEIGHT, MAX_HEIGHT};
pub use generation::{build_cell_graph, CellGraph};
pub use rings::label_rings;
pub use features::{classify, mark_grid_features, Classification, Feature, FeatureGroup, FeatureKind};
pub use grid::{Grid, GridParts, HeightSampler};
pub use densify::{refine, select_points, RefinedMesh, Selection};
pub use pack::Pack;
pub use export::{IndexBuffer, IndexWidth, PackBuffers, COMPACT_INDEX_LIMIT};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
