//! Unified error type for the cookoff backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Kitchen is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("Chef {id} is already in the kitchen")]
    DuplicateEntry { id: i64 },

    #[error("A cookoff needs at least two chefs, the kitchen has {count}")]
    InsufficientParticipants { count: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Total skill {total} leaves no usable weighting for a draw")]
    DegenerateWeights { total: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
