//! Flat buffer export
//!
//! Downstream consumers expect typed arrays. Grid cell references are stored as
//! 16-bit integers when the grid is small enough and 32-bit otherwise.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::features::Feature;
use crate::pack::Pack;

/// Grids with fewer cells than this use 16-bit cell references
pub const COMPACT_INDEX_LIMIT: usize = 65_535;

/// Integer width of an exported index buffer
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWidth {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexWidth {
    /// Width needed to reference `count` cells
    pub fn for_count(count: usize) -> Self {
        if count < COMPACT_INDEX_LIMIT {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }
}

/// A buffer of cell indices at the chosen width
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// 16-bit indices
    U16(Vec<u16>),
    /// 32-bit indices
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Pack `indices` at the width required for a range of `count` cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an index does not fit the chosen width.
    pub fn pack(indices: &[usize], count: usize) -> Result<Self> {
        match IndexWidth::for_count(count) {
            IndexWidth::U16 => indices
                .iter()
                .map(|&i| narrow::<u16>(i))
                .collect::<Result<Vec<_>>>()
                .map(IndexBuffer::U16),
            IndexWidth::U32 => indices
                .iter()
                .map(|&i| narrow::<u32>(i))
                .collect::<Result<Vec<_>>>()
                .map(IndexBuffer::U32),
        }
    }

    /// Width of the buffer
    pub fn width(&self) -> IndexWidth {
        match self {
            IndexBuffer::U16(_) => IndexWidth::U16,
            IndexBuffer::U32(_) => IndexWidth::U32,
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    /// True if the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `position`, widened back to `usize`
    pub fn get(&self, position: usize) -> Option<usize> {
        match self {
            IndexBuffer::U16(v) => v.get(position).map(|&i| usize::from(i)),
            IndexBuffer::U32(v) => v.get(position).map(|&i| i as usize),
        }
    }
}

fn narrow<T: TryFrom<usize>>(index: usize) -> Result<T> {
    T::try_from(index)
        .map_err(|_| MeshError::InvalidInput(format!("cell index {} does not fit the index width", index)))
}

/// Flat per-cell buffers of a pack, ready for serialization
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PackBuffers {
    /// Cell centers as `[x, y]`
    pub points: Vec<[f64; 2]>,
    /// Source grid cell per cell, sized by the grid cell count
    pub source_cells: IndexBuffer,
    /// Height per cell
    pub heights: Vec<u8>,
    /// Polygon area per cell, clamped to 16 bits
    pub areas: Vec<u16>,
    /// Feature id per cell
    pub feature_ids: Vec<u32>,
    /// Coast type or inland ring per cell
    pub coast_types: Vec<i8>,
    /// Haven per cell, `0` where unset, sized by the pack cell count
    pub havens: IndexBuffer,
    /// Harbor count per cell
    pub harbors: Vec<u8>,
    /// Features in id order
    pub features: Vec<Feature>,
}

impl PackBuffers {
    /// Flatten a pack into typed buffers
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an index or feature id exceeds 32 bits.
    pub fn from_pack(pack: &Pack) -> Result<Self> {
        let havens: Vec<usize> = pack.havens().iter().map(|h| h.unwrap_or(0)).collect();
        let feature_ids = pack
            .feature_ids()
            .iter()
            .map(|&id| narrow::<u32>(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            points: pack.points().iter().map(|p| [p.x, p.y]).collect(),
            source_cells: IndexBuffer::pack(pack.source_cells(), pack.reference_cells())?,
            heights: pack.heights().to_vec(),
            areas: pack
                .areas()
                .iter()
                .map(|&a| u16::try_from(a).unwrap_or(u16::MAX))
                .collect(),
            feature_ids,
            coast_types: pack.coast_types().to_vec(),
            havens: IndexBuffer::pack(&havens, pack.cell_count())?,
            harbors: pack.harbors().to_vec(),
            features: pack.features().to_vec(),
        })
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.points.len()
    }
}
