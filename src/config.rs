//! Grid Configuration and Builder
//!
//! This module provides configuration types for deterministic coarse grid generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Upper bound on the number of cells a generated grid may request
pub const MAX_CELLS_DESIRED: usize = 1_000_000;

/// Default jitter, as a fraction of half the point spacing
pub const DEFAULT_JITTER: f64 = 0.9;

/// Configuration for deterministic coarse grid generation
///
/// The same configuration will always produce the identical point set, so only the
/// configuration (and the heights) need to be persisted to rebuild a grid.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_coastline::*;
///
/// let config = GridConfigBuilder::new()
///     .seed(42)
///     .size(960.0, 540.0).unwrap()
///     .cells_desired(2_000).unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.spacing(), 16.1);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Random seed for point jittering
    pub seed: u32,

    /// Map width in map units
    pub width: f64,

    /// Map height in map units
    pub height: f64,

    /// Approximate number of grid cells
    ///
    /// The actual count is `cells_x() * cells_y()`, which can differ slightly
    /// because points are laid out on a square lattice.
    pub cells_desired: usize,

    /// Jitter strength as a fraction of half the point spacing
    ///
    /// - 0.0: Regular square lattice
    /// - 0.9: Default, irregular cells without overlapping neighbours
    pub jitter: f64,
}

impl GridConfig {
    /// Base point spacing, rounded to two decimals
    #[inline]
    pub fn spacing(&self) -> f64 {
        let raw = ((self.width * self.height) / self.cells_desired as f64).sqrt();
        (raw * 100.0).round() / 100.0
    }

    /// Number of lattice columns
    pub fn cells_x(&self) -> usize {
        let spacing = self.spacing();
        ((self.width + 0.5 * spacing - 1e-10) / spacing).floor() as usize
    }

    /// Number of lattice rows
    pub fn cells_y(&self) -> usize {
        let spacing = self.spacing();
        ((self.height + 0.5 * spacing - 1e-10) / spacing).floor() as usize
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 960.0,
            height: 540.0,
            cells_desired: 10_000,
            jitter: DEFAULT_JITTER,
        }
    }
}

/// Builder for creating GridConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_coastline::*;
///
/// let config = GridConfigBuilder::new()
///     .seed(7)
///     .cells_desired(500)
///     .unwrap()
///     .jitter(0.5)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 7);
/// ```
#[derive(Debug, Clone)]
pub struct GridConfigBuilder {
    seed: Option<u32>,
    width: f64,
    height: f64,
    cells_desired: usize,
    jitter: f64,
}

impl GridConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - size: 960 x 540
    /// - cells_desired: 10,000
    /// - jitter: 0.9
    pub fn new() -> Self {
        let defaults = GridConfig::default();
        Self {
            seed: None,
            width: defaults.width,
            height: defaults.height,
            cells_desired: defaults.cells_desired,
            jitter: defaults.jitter,
        }
    }

    /// Set the random seed used for jittering
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not a positive finite number
    pub fn size(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(MeshError::InvalidConfig(format!(
                "map size must be positive (got {}x{})",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the approximate number of cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the count is zero or above [`MAX_CELLS_DESIRED`]
    pub fn cells_desired(mut self, cells: usize) -> Result<Self> {
        if cells == 0 || cells > MAX_CELLS_DESIRED {
            return Err(MeshError::InvalidConfig(format!(
                "cells desired must be in 1..={} (got {})",
                MAX_CELLS_DESIRED, cells
            )));
        }
        self.cells_desired = cells;
        Ok(self)
    }

    /// Set the jitter strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if jitter is outside `0.0..=1.0`
    pub fn jitter(mut self, jitter: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(MeshError::InvalidConfig(format!(
                "jitter must be in 0.0..=1.0 (got {})",
                jitter
            )));
        }
        self.jitter = jitter;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the map is too small to hold a single cell
    pub fn build(self) -> Result<GridConfig> {
        let config = GridConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            width: self.width,
            height: self.height,
            cells_desired: self.cells_desired,
            jitter: self.jitter,
        };

        if config.spacing() <= 0.0 || config.cells_x() == 0 || config.cells_y() == 0 {
            return Err(MeshError::InvalidConfig(format!(
                "{}x{} map cannot hold {} cells",
                config.width, config.height, config.cells_desired
            )));
        }

        Ok(config)
    }
}

impl Default for GridConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
