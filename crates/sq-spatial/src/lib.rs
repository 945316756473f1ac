//! `sq-spatial` — navigation grid, occupancy, cover registry, and pathfinding.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`grid`]       | `Grid`, `Cell`, `CellCoord`, `CoverLocation`, `GridBuilder` |
//! | [`pathfinder`] | `Pathfinder` trait, `GridPath`, `AStarPathfinder`         |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on coordinates and cells.  |

pub mod error;
pub mod grid;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{Cell, CellCoord, CoverLocation, Grid, GridBuilder};
pub use pathfinder::{AStarPathfinder, GridPath, Pathfinder};
