//! Error types for the automaton core.

use thiserror::Error;

/// Error when a grid cannot be created with the requested geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Width or height was zero or too large to index.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Cell size must be finite and positive.
    #[error("invalid cell size {0}")]
    InvalidCellSize(f32),
}

/// Errors raised by stage selection and rule changes.
///
/// Every variant is recoverable: the active stage is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// Stage index outside the loaded campaign.
    #[error("stage {index} does not exist ({count} stages loaded)")]
    UnknownStage {
        /// Requested index.
        index: usize,
        /// Number of stages available.
        count: usize,
    },

    /// Rule text that names no known variant.
    #[error("unknown rule {0:?}")]
    UnknownRule(String),

    /// Cluster that cannot be placed on this grid.
    #[error("cluster {index} is malformed: {reason}")]
    InvalidCluster {
        /// Position in the descriptor's cluster list.
        index: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Start or goal coordinate outside the grid.
    #[error("{what} ({x}, {y}) is outside the grid")]
    OutOfBounds {
        /// Which coordinate was rejected.
        what: &'static str,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// No stage has been loaded yet.
    #[error("no active stage")]
    NoActiveStage,
}

/// Errors reading or writing stage files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure.
    #[error("stage file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not a stage or campaign.
    #[error("stage file format: {0}")]
    Json(#[from] serde_json::Error),
}
