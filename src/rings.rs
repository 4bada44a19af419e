//! Concentric distance rings
//!
//! Breadth-first labeling outward from a frontier of already tagged cells. Used to
//! stamp land cells with their distance band from the coast (`3, 4, 5, ...`) and
//! grid water cells with their distance band from land (`-2, -3, ...`).

use std::time::Instant;

use crate::cell::UNMARKED;
use crate::error::{MeshError, Result};

/// Label untagged cells with ring values spreading out from an existing frontier
///
/// The frontier is every cell tagged `start - increment`. Each pass tags the
/// untagged neighbours of the current frontier with the current ring value, and
/// those cells form the next frontier. Labeling stops when a pass tags nothing,
/// or when the ring value reaches `limit`. `limit` only bounds the labeling if it
/// lies ahead of `start` in the direction of `increment`; pass a value behind
/// `start` (such as `0` for inland rings) for no bound.
///
/// Returns the number of cells tagged.
///
/// # Errors
///
/// Returns `InvalidConfig` if `increment` is zero or `start - increment` overflows,
/// and `BufferMismatch` if the buffers cover different cell counts.
///
/// # Example
///
/// ```
/// use rust_voronoi_coastline::label_rings;
///
/// // A path 0 - 1 - 2 - 3 with the coast buffer at cell 0
/// let neighbors = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
/// let mut coast = vec![2, 0, 0, 0];
///
/// let tagged = label_rings(&neighbors, &mut coast, 3, 1, 0).unwrap();
/// assert_eq!(tagged, 3);
/// assert_eq!(coast, vec![2, 3, 4, 5]);
/// ```
pub fn label_rings(
    neighbors: &[Vec<usize>],
    coast_types: &mut [i8],
    start: i8,
    increment: i8,
    limit: i8,
) -> Result<usize> {
    if increment == 0 {
        return Err(MeshError::InvalidConfig("ring increment must not be zero".into()));
    }
    MeshError::check_len("coast_types", neighbors.len(), coast_types.len())?;

    let previous = start.checked_sub(increment).ok_or_else(|| {
        MeshError::InvalidConfig(format!("ring {} - {} overflows", start, increment))
    })?;

    let bounded = if increment > 0 { limit > start } else { limit < start };
    let reached = |ring: i8| {
        bounded && if increment > 0 { ring >= limit } else { ring <= limit }
    };

    let timer = Instant::now();
    let mut frontier: Vec<usize> = coast_types
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t == previous)
        .map(|(cell, _)| cell)
        .collect();

    let mut ring = start;
    let mut tagged = 0;
    let mut rings = 0;

    while !frontier.is_empty() && !reached(ring) {
        let mut next = Vec::new();
        for &cell in &frontier {
            for &neighbor in &neighbors[cell] {
                if coast_types[neighbor] == UNMARKED {
                    coast_types[neighbor] = ring;
                    next.push(neighbor);
                }
            }
        }

        if next.is_empty() {
            break;
        }
        tagged += next.len();
        rings += 1;
        frontier = next;

        ring = match ring.checked_add(increment) {
            Some(value) => value,
            None => {
                log::warn!(
                    "[Rings] ring value overflow after {}; {} frontier cells left unlabeled beyond it",
                    ring,
                    frontier.len()
                );
                break;
            }
        };
    }

    log::debug!(
        "[Rings] start={} increment={} limit={}: {} rings, {} cells in {:?}",
        start,
        increment,
        limit,
        rings,
        tagged,
        timer.elapsed()
    );

    Ok(tagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path graph 0 - 1 - ... - (n-1)
    fn path(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|i| {
                let mut adjacent = Vec::new();
                if i > 0 {
                    adjacent.push(i - 1);
                }
                if i + 1 < n {
                    adjacent.push(i + 1);
                }
                adjacent
            })
            .collect()
    }

    #[test]
    fn test_inland_rings_unbounded() {
        let neighbors = path(6);
        let mut coast = vec![1, 2, 0, 0, 0, 0];

        let tagged = label_rings(&neighbors, &mut coast, 3, 1, 0).unwrap();

        assert_eq!(tagged, 4);
        assert_eq!(coast, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_water_rings_stop_at_limit() {
        let neighbors = path(12);
        let mut coast = vec![0; 12];
        coast[0] = 1;
        coast[1] = -1;

        let tagged = label_rings(&neighbors, &mut coast, -2, -1, -10).unwrap();

        // Rings -2 ..= -9, the -10 ring is never written
        assert_eq!(tagged, 8);
        assert_eq!(&coast[..10], &[1, -1, -2, -3, -4, -5, -6, -7, -8, -9]);
        assert_eq!(&coast[10..], &[0, 0]);
    }

    #[test]
    fn test_multi_source_frontier() {
        // Path of 7 with buffer cells at both ends
        let neighbors = path(7);
        let mut coast = vec![2, 0, 0, 0, 0, 0, 2];

        label_rings(&neighbors, &mut coast, 3, 1, 0).unwrap();

        assert_eq!(coast, vec![2, 3, 4, 5, 4, 3, 2]);
    }

    #[test]
    fn test_tagged_cells_untouched() {
        let neighbors = path(4);
        let mut coast = vec![2, -1, 0, 0];

        let tagged = label_rings(&neighbors, &mut coast, 3, 1, 0).unwrap();

        // The water cell blocks the only path inland
        assert_eq!(tagged, 0);
        assert_eq!(coast, vec![2, -1, 0, 0]);
    }

    #[test]
    fn test_empty_frontier() {
        let neighbors = path(3);
        let mut coast = vec![0; 3];
        assert_eq!(label_rings(&neighbors, &mut coast, 3, 1, 0).unwrap(), 0);
        assert_eq!(coast, vec![0; 3]);
    }

    #[test]
    fn test_ring_overflow_stops() {
        let neighbors = path(4);
        let mut coast = vec![125, 0, 0, 0];

        let tagged = label_rings(&neighbors, &mut coast, 126, 1, 0).unwrap();

        assert_eq!(tagged, 2);
        assert_eq!(coast, vec![125, 126, 127, 0]);
    }

    #[test]
    fn test_invalid_arguments() {
        let neighbors = path(3);

        let mut coast = vec![0; 3];
        assert!(matches!(
            label_rings(&neighbors, &mut coast, 3, 0, 0),
            Err(MeshError::InvalidConfig(_))
        ));

        let mut short = vec![0; 2];
        assert!(matches!(
            label_rings(&neighbors, &mut short, 3, 1, 0),
            Err(MeshError::BufferMismatch { .. })
        ));
    }
}
