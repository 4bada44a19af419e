//! Error types for mesh refinement and classification

/// Errors that can occur while building, refining or classifying a cell graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Delaunay triangulation of the input points failed (degenerate, collinear or duplicate points)
    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),

    /// A per-cell buffer does not match the cell count it belongs to
    #[error("buffer `{buffer}` has {actual} entries, expected {expected}")]
    BufferMismatch {
        /// Name of the offending buffer
        buffer: &'static str,
        /// Number of cells the buffer should cover
        expected: usize,
        /// Number of entries actually supplied
        actual: usize,
    },

    /// Upstream data is internally inconsistent
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant was violated; the output must not be used
    #[error("internal error: {0}")]
    Internal(String),
}

impl MeshError {
    /// Check a buffer length against the expected cell count
    pub(crate) fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MeshError::BufferMismatch {
                buffer,
                expected,
                actual,
            })
        }
    }
}

/// Result type alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(MeshError::check_len("heights", 3, 3).is_ok());

        let err = MeshError::check_len("heights", 3, 2).unwrap_err();
        assert_eq!(
            err,
            MeshError::BufferMismatch {
                buffer: "heights",
                expected: 3,
                actual: 2,
            }
        );
        assert_eq!(err.to_string(), "buffer `heights` has 2 entries, expected 3");
    }
}
