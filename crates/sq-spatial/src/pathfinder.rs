//! Pathfinding trait and the default grid A*.
//!
//! # Pluggability
//!
//! Movement calls pathfinding through the [`Pathfinder`] trait, so a squad
//! can be given a different search (jump-point search, flow fields, a
//! navmesh adapter) without touching the agent code.
//!
//! # Failure
//!
//! An unreachable goal is not an error: the search returns an empty
//! [`GridPath`] and the caller decides what to do (movement keeps the
//! agent in place and reports it as still running).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use sq_core::HeuristicKind;

use crate::{CellCoord, Grid};

// ── GridPath ──────────────────────────────────────────────────────────────────

/// Inclusive cell sequence from start to goal.  Empty when no path exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridPath {
    pub cells: Vec<CellCoord>,
}

impl GridPath {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of cells, start and goal included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable grid search.
///
/// Implementations must be `Send + Sync` so a squad can share one instance
/// between all of its agents.
pub trait Pathfinder: Send + Sync {
    /// Shortest walkable path from `start` to `goal`, ignoring occupancy.
    fn find_path(&self, grid: &Grid, start: CellCoord, goal: CellCoord) -> GridPath {
        self.find_path_avoiding(grid, start, goal, &|_| false)
    }

    /// As [`find_path`][Self::find_path], additionally treating every cell
    /// for which `avoid` returns `true` as blocked.  `start` and `goal` are
    /// never tested against `avoid`.
    fn find_path_avoiding(
        &self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
        avoid: &dyn Fn(CellCoord) -> bool,
    ) -> GridPath;
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

/// 4-connected A* with unit step cost.
///
/// Ties on `f` are broken by lower `h`, then by insertion order, and
/// neighbours are expanded +x, −x, +z, −z, so the same query always yields
/// the same path.
///
/// Edge cases:
///
/// | Query                             | Result        |
/// |-----------------------------------|---------------|
/// | `start` or `goal` out of bounds   | empty         |
/// | `goal` is an obstacle             | empty         |
/// | `start == goal`                   | `[start]`     |
/// | `start` is an obstacle            | searched from |
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarPathfinder {
    pub heuristic: HeuristicKind,
}

impl AStarPathfinder {
    pub fn new(heuristic: HeuristicKind) -> Self {
        Self { heuristic }
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path_avoiding(
        &self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
        avoid: &dyn Fn(CellCoord) -> bool,
    ) -> GridPath {
        astar(grid, start, goal, self.heuristic, avoid)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

fn astar(
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
    heuristic: HeuristicKind,
    avoid: &dyn Fn(CellCoord) -> bool,
) -> GridPath {
    if !grid.in_bounds(start) || !grid.is_walkable(goal) {
        return GridPath::empty();
    }
    if start == goal {
        return GridPath { cells: vec![start] };
    }

    let n = grid.size();
    let idx = |c: CellCoord| c.z as usize * n + c.x as usize;
    let h = |c: CellCoord| heuristic.estimate(goal.x - c.x, goal.z - c.z);

    // g[v] = best known step count to v.
    let mut g      = vec![i32::MAX; n * n];
    let mut closed = vec![false; n * n];
    // parent[v] = predecessor cell on the best known path.
    let mut parent: Vec<Option<CellCoord>> = vec![None; n * n];

    // Min-heap on (f, h, seq).  `seq` preserves insertion order among ties.
    let mut open: BinaryHeap<Reverse<(i32, i32, u64, CellCoord)>> = BinaryHeap::new();
    let mut seq = 0u64;

    g[idx(start)] = 0;
    open.push(Reverse((h(start), h(start), seq, start)));

    while let Some(Reverse((_, _, _, cell))) = open.pop() {
        if cell == goal {
            return reconstruct(&parent, idx, goal);
        }
        if closed[idx(cell)] {
            continue;
        }
        closed[idx(cell)] = true;

        let next_g = g[idx(cell)] + 1;
        for nb in cell.neighbours() {
            if !grid.is_walkable(nb) || closed[idx(nb)] {
                continue;
            }
            if nb != goal && avoid(nb) {
                continue;
            }
            if next_g < g[idx(nb)] {
                g[idx(nb)] = next_g;
                parent[idx(nb)] = Some(cell);
                seq += 1;
                let hn = h(nb);
                open.push(Reverse((next_g + hn, hn, seq, nb)));
            }
        }
    }

    GridPath::empty()
}

fn reconstruct(
    parent: &[Option<CellCoord>],
    idx: impl Fn(CellCoord) -> usize,
    goal: CellCoord,
) -> GridPath {
    let mut cells = vec![goal];
    let mut cur = goal;
    while let Some(prev) = parent[idx(cur)] {
        cells.push(prev);
        cur = prev;
    }
    cells.reverse();
    GridPath { cells }
}
