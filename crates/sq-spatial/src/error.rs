//! Spatial-subsystem error type.

use thiserror::Error;

use sq_core::AgentId;

use crate::CellCoord;

/// Errors produced by `sq-spatial`.
#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellCoord),

    #[error("cell {0} is an obstacle")]
    Obstacle(CellCoord),

    #[error("cell {cell} is held by {occupant}, refused to {requested}")]
    CellOccupied {
        cell:      CellCoord,
        occupant:  AgentId,
        requested: AgentId,
    },

    #[error("invalid grid configuration: {0}")]
    Config(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
