//! Navigation grid, occupancy, and the cover registry.
//!
//! # Layout
//!
//! The grid is a square of `size × size` cells on the world `x`/`z` plane.
//! Cell `(x, z)` covers world `[origin.x + x·cs, origin.x + (x+1)·cs)` by
//! `[origin.z + z·cs, origin.z + (z+1)·cs)` where `cs` is `cell_size`, and
//! cells are stored row-major (`z * size + x`).
//!
//! Every world↔cell conversion in the workspace goes through the methods
//! here; nothing else does grid arithmetic.
//!
//! # Occupancy
//!
//! Each cell holds at most one [`AgentId`].  [`Grid::occupy`] refuses to
//! overwrite another agent's reservation and [`Grid::vacate`] only clears
//! the caller's own, so a stale or foreign release cannot corrupt the map.

use std::fmt;

use sq_core::{AgentId, CoverId, SquadConfig, Vec3};
use tracing::trace;

use crate::{SpatialError, SpatialResult};

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer cell address.  May lie outside the grid; bounds are checked at use.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Orthogonal neighbours in expansion order: +x, −x, +z, −z.
    #[inline]
    pub fn neighbours(self) -> [CellCoord; 4] {
        [
            CellCoord::new(self.x + 1, self.z),
            CellCoord::new(self.x - 1, self.z),
            CellCoord::new(self.x, self.z + 1),
            CellCoord::new(self.x, self.z - 1),
        ]
    }

    #[inline]
    pub fn manhattan(self, other: CellCoord) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub is_obstacle: bool,
    /// Orthogonally adjacent to an obstacle; listed in the cover registry.
    pub is_cover:    bool,
    pub occupant:    Option<AgentId>,
}

// ── CoverLocation ─────────────────────────────────────────────────────────────

/// A registered cover spot: the cell and its centre in world space.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverLocation {
    pub world_position: Vec3,
    pub cell:           CellCoord,
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// The shared navigation grid.  Build with [`GridBuilder`].
#[derive(Clone, Debug)]
pub struct Grid {
    size:      i32,
    cell_size: f32,
    origin:    Vec3,
    cells:     Vec<Cell>,
    covers:    Vec<CoverLocation>,
}

impl Grid {
    // ── Dimensions ────────────────────────────────────────────────────────

    /// Cells per side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn in_bounds(&self, c: CellCoord) -> bool {
        c.x >= 0 && c.z >= 0 && c.x < self.size && c.z < self.size
    }

    #[inline]
    fn index(&self, c: CellCoord) -> Option<usize> {
        self.in_bounds(c).then(|| (c.z * self.size + c.x) as usize)
    }

    // ── Conversions ───────────────────────────────────────────────────────

    /// Cell containing `pos`, or `None` outside the grid.
    pub fn world_to_cell(&self, pos: Vec3) -> Option<CellCoord> {
        let c = self.floor_cell(pos);
        self.in_bounds(c).then_some(c)
    }

    /// Cell containing `pos`, clamped onto the nearest edge cell.
    pub fn world_to_cell_clamped(&self, pos: Vec3) -> CellCoord {
        let c = self.floor_cell(pos);
        CellCoord::new(c.x.clamp(0, self.size - 1), c.z.clamp(0, self.size - 1))
    }

    fn floor_cell(&self, pos: Vec3) -> CellCoord {
        let local = (pos - self.origin) / self.cell_size;
        CellCoord::new(local.x.floor() as i32, local.z.floor() as i32)
    }

    /// World-space centre of `c` at ground height.
    pub fn cell_to_world(&self, c: CellCoord) -> Vec3 {
        Vec3::new(
            self.origin.x + (c.x as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (c.z as f32 + 0.5) * self.cell_size,
        )
    }

    /// Centre of the cell nearest to `pos`.
    pub fn snap_to_grid(&self, pos: Vec3) -> Vec3 {
        self.cell_to_world(self.world_to_cell_clamped(pos))
    }

    /// Clamp a world position into the grid's extent.
    pub fn clamp_world(&self, pos: Vec3) -> Vec3 {
        let extent = self.size as f32 * self.cell_size;
        let inset = self.cell_size * 1e-3;
        Vec3::new(
            pos.x.clamp(self.origin.x, self.origin.x + extent - inset),
            pos.y,
            pos.z.clamp(self.origin.z, self.origin.z + extent - inset),
        )
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    pub fn cell(&self, c: CellCoord) -> Option<&Cell> {
        self.index(c).map(|i| &self.cells[i])
    }

    /// In bounds and not an obstacle.
    pub fn is_walkable(&self, c: CellCoord) -> bool {
        self.cell(c).is_some_and(|cell| !cell.is_obstacle)
    }

    pub fn is_obstacle(&self, c: CellCoord) -> bool {
        self.cell(c).is_some_and(|cell| cell.is_obstacle)
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    pub fn occupant(&self, c: CellCoord) -> Option<AgentId> {
        self.cell(c).and_then(|cell| cell.occupant)
    }

    /// `true` if an agent other than `agent` holds `c`.
    pub fn is_occupied_by_other(&self, c: CellCoord, agent: AgentId) -> bool {
        self.occupant(c).is_some_and(|holder| holder != agent)
    }

    /// Walkable and free or already held by `agent`.
    pub fn can_enter(&self, c: CellCoord, agent: AgentId) -> bool {
        self.is_walkable(c) && !self.is_occupied_by_other(c, agent)
    }

    /// Reserve `c` for `agent`.  Idempotent for the current holder.
    ///
    /// # Errors
    ///
    /// [`SpatialError::OutOfBounds`], [`SpatialError::Obstacle`], or
    /// [`SpatialError::CellOccupied`] when another agent holds the cell; the
    /// existing reservation is left untouched.
    pub fn occupy(&mut self, c: CellCoord, agent: AgentId) -> SpatialResult<()> {
        let i = self.index(c).ok_or(SpatialError::OutOfBounds(c))?;
        let cell = &mut self.cells[i];
        if cell.is_obstacle {
            return Err(SpatialError::Obstacle(c));
        }
        match cell.occupant {
            Some(holder) if holder != agent => Err(SpatialError::CellOccupied {
                cell:      c,
                occupant:  holder,
                requested: agent,
            }),
            _ => {
                cell.occupant = Some(agent);
                trace!(%agent, cell = %c, "occupy");
                Ok(())
            }
        }
    }

    /// Release `agent`'s reservation on `c`.  Returns whether one existed.
    pub fn vacate(&mut self, c: CellCoord, agent: AgentId) -> bool {
        let Some(i) = self.index(c) else { return false };
        let cell = &mut self.cells[i];
        if cell.occupant == Some(agent) {
            cell.occupant = None;
            trace!(%agent, cell = %c, "vacate");
            true
        } else {
            false
        }
    }

    /// Every cell currently held by `agent`, in row-major order.
    pub fn reserved_by(&self, agent: AgentId) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.occupant == Some(agent))
            .map(|(i, _)| CellCoord::new(i as i32 % self.size, i as i32 / self.size))
            .collect()
    }

    // ── Cover registry ────────────────────────────────────────────────────

    /// All cover locations, in registration order.
    pub fn covers(&self) -> &[CoverLocation] {
        &self.covers
    }

    pub fn cover(&self, id: CoverId) -> Option<&CoverLocation> {
        self.covers.get(id.index())
    }

    /// `(id, location)` pairs in registration order.
    pub fn cover_iter(&self) -> impl Iterator<Item = (CoverId, &CoverLocation)> + '_ {
        self.covers
            .iter()
            .enumerate()
            .map(|(i, loc)| (CoverId(i as u32), loc))
    }

    // ── Line of sight ─────────────────────────────────────────────────────

    /// `true` if no obstacle cell lies strictly between the cells of `from`
    /// and `to` on the ground plane.  Both points are clamped into the grid.
    ///
    /// Walks the cells crossed by the segment with a 4-connected DDA; the
    /// endpoint cells themselves are never tested.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        let from = self.clamp_world(from);
        let to = self.clamp_world(to);
        let start = self.world_to_cell_clamped(from);
        let end = self.world_to_cell_clamped(to);
        if start == end {
            return true;
        }

        let p0 = (from - self.origin) / self.cell_size;
        let p1 = (to - self.origin) / self.cell_size;
        let (dx, dz) = (p1.x - p0.x, p1.z - p0.z);

        let axis = |d: f32, p: f32, c: i32| -> (i32, f32, f32) {
            if d > 0.0 {
                (1, ((c + 1) as f32 - p) / d, 1.0 / d)
            } else if d < 0.0 {
                (-1, (c as f32 - p) / d, -1.0 / d)
            } else {
                (0, f32::INFINITY, f32::INFINITY)
            }
        };
        let (step_x, mut t_max_x, t_delta_x) = axis(dx, p0.x, start.x);
        let (step_z, mut t_max_z, t_delta_z) = axis(dz, p0.z, start.z);

        let mut cell = start;
        for _ in 0..start.manhattan(end) {
            if t_max_x < t_max_z {
                cell.x += step_x;
                t_max_x += t_delta_x;
            } else {
                cell.z += step_z;
                t_max_z += t_delta_z;
            }
            if cell == end {
                return true;
            }
            if self.is_obstacle(cell) {
                return false;
            }
        }
        true
    }
}

// ── GridBuilder ───────────────────────────────────────────────────────────────

/// Collects obstacles, then derives the cover registry once in `build`.
///
/// ```rust,ignore
/// let mut b = GridBuilder::new(5, 1.0);
/// b.add_obstacle(CellCoord::new(2, 2))?;
/// let grid = b.build()?;
/// assert_eq!(grid.covers().len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct GridBuilder {
    size:      usize,
    cell_size: f32,
    origin:    Vec3,
    obstacles: Vec<CellCoord>,
}

impl GridBuilder {
    pub fn new(size: usize, cell_size: f32) -> Self {
        Self { size, cell_size, origin: Vec3::ZERO, obstacles: Vec::new() }
    }

    /// Grid dimensions from a run configuration.
    pub fn from_config(config: &SquadConfig) -> Self {
        Self::new(config.grid_size, config.cell_size)
    }

    /// World position of the grid's minimum corner.  Defaults to the origin.
    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    fn check(&self, c: CellCoord) -> SpatialResult<()> {
        let n = self.size as i32;
        if c.x < 0 || c.z < 0 || c.x >= n || c.z >= n {
            return Err(SpatialError::OutOfBounds(c));
        }
        Ok(())
    }

    pub fn add_obstacle(&mut self, c: CellCoord) -> SpatialResult<&mut Self> {
        self.check(c)?;
        self.obstacles.push(c);
        Ok(self)
    }

    /// Mark the inclusive rectangle `min..=max` as obstacles.
    pub fn add_obstacle_rect(&mut self, min: CellCoord, max: CellCoord) -> SpatialResult<&mut Self> {
        self.check(min)?;
        self.check(max)?;
        for z in min.z.min(max.z)..=min.z.max(max.z) {
            for x in min.x.min(max.x)..=min.x.max(max.x) {
                self.obstacles.push(CellCoord::new(x, z));
            }
        }
        Ok(self)
    }

    /// Build the grid and its cover registry.
    ///
    /// Cover cells are the in-bounds, non-obstacle orthogonal neighbours of
    /// obstacles, registered once each while scanning obstacles row-major.
    ///
    /// # Errors
    ///
    /// [`SpatialError::Config`] for a zero size or non-positive cell size.
    pub fn build(self) -> SpatialResult<Grid> {
        if self.size == 0 || self.size > i32::MAX as usize / 2 {
            return Err(SpatialError::Config(format!("grid size {} out of range", self.size)));
        }
        if !(self.cell_size > 0.0) {
            return Err(SpatialError::Config(format!(
                "cell size must be positive, got {}", self.cell_size
            )));
        }

        let mut grid = Grid {
            size:      self.size as i32,
            cell_size: self.cell_size,
            origin:    self.origin,
            cells:     vec![Cell::default(); self.size * self.size],
            covers:    Vec::new(),
        };
        for c in &self.obstacles {
            if let Some(i) = grid.index(*c) {
                grid.cells[i].is_obstacle = true;
            }
        }

        for i in 0..grid.cells.len() {
            if !grid.cells[i].is_obstacle {
                continue;
            }
            let obstacle = CellCoord::new(i as i32 % grid.size, i as i32 / grid.size);
            for n in obstacle.neighbours() {
                let Some(j) = grid.index(n) else { continue };
                let cell = &mut grid.cells[j];
                if cell.is_obstacle || cell.is_cover {
                    continue;
                }
                cell.is_cover = true;
                let world_position = grid.cell_to_world(n);
                grid.covers.push(CoverLocation { world_position, cell: n });
            }
        }

        Ok(grid)
    }
}
