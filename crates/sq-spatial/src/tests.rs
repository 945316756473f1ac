//! Unit tests for sq-spatial.
//!
//! All tests use small hand-built grids.

#[cfg(test)]
mod helpers {
    use crate::{CellCoord, Grid, GridBuilder};

    pub fn open_grid(size: usize) -> Grid {
        GridBuilder::new(size, 1.0).build().unwrap()
    }

    /// 5×5 grid with a single obstacle at (2, 2).
    pub fn pillar_grid() -> Grid {
        let mut b = GridBuilder::new(5, 1.0);
        b.add_obstacle(CellCoord::new(2, 2)).unwrap();
        b.build().unwrap()
    }

    /// Path is 4-connected, inside the grid, and free of obstacles.
    pub fn assert_valid_path(grid: &Grid, cells: &[CellCoord]) {
        for w in cells.windows(2) {
            assert_eq!(w[0].manhattan(w[1]), 1, "non-adjacent step {} -> {}", w[0], w[1]);
        }
        for c in &cells[1..] {
            assert!(grid.is_walkable(*c), "path crosses {c}");
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod conversion_tests {
    use sq_core::Vec3;

    use super::helpers::open_grid;
    use crate::{CellCoord, GridBuilder};

    #[test]
    fn world_to_cell_floors() {
        let grid = open_grid(10);
        assert_eq!(grid.world_to_cell(Vec3::new(3.7, 0.0, 0.2)), Some(CellCoord::new(3, 0)));
        assert_eq!(grid.world_to_cell(Vec3::new(-0.1, 0.0, 0.0)), None);
        assert_eq!(grid.world_to_cell(Vec3::new(10.0, 0.0, 0.0)), None);
    }

    #[test]
    fn clamped_conversion() {
        let grid = open_grid(10);
        assert_eq!(grid.world_to_cell_clamped(Vec3::new(-5.0, 0.0, 42.0)), CellCoord::new(0, 9));
    }

    #[test]
    fn cell_centre_roundtrip() {
        let grid = GridBuilder::new(8, 2.0).origin(Vec3::new(-8.0, 0.0, -8.0)).build().unwrap();
        let c = CellCoord::new(5, 1);
        let centre = grid.cell_to_world(c);
        assert_eq!(centre, Vec3::new(3.0, 0.0, -5.0));
        assert_eq!(grid.world_to_cell(centre), Some(c));
        assert_eq!(grid.snap_to_grid(Vec3::new(3.9, 0.0, -4.1)), centre);
    }
}

// ── Builder & cover registry ──────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::helpers::pillar_grid;
    use crate::{CellCoord, GridBuilder, SpatialError};

    #[test]
    fn pillar_has_four_covers() {
        let grid = pillar_grid();
        let cells: Vec<_> = grid.covers().iter().map(|c| c.cell).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(3, 2),
                CellCoord::new(1, 2),
                CellCoord::new(2, 3),
                CellCoord::new(2, 1),
            ]
        );
        assert!(cells.iter().all(|c| grid.cell(*c).unwrap().is_cover));
    }

    #[test]
    fn shared_neighbour_registered_once() {
        let mut b = GridBuilder::new(5, 1.0);
        b.add_obstacle(CellCoord::new(1, 1)).unwrap();
        b.add_obstacle(CellCoord::new(3, 1)).unwrap();
        let grid = b.build().unwrap();
        let count = grid.covers().iter().filter(|c| c.cell == CellCoord::new(2, 1)).count();
        assert_eq!(count, 1);
        assert_eq!(grid.covers().len(), 7);
    }

    #[test]
    fn obstacles_and_edges_are_never_cover() {
        let mut b = GridBuilder::new(4, 1.0);
        b.add_obstacle_rect(CellCoord::new(0, 0), CellCoord::new(1, 0)).unwrap();
        let grid = b.build().unwrap();
        for loc in grid.covers() {
            assert!(grid.in_bounds(loc.cell));
            assert!(!grid.cell(loc.cell).unwrap().is_obstacle);
        }
        assert_eq!(grid.covers().len(), 3);
    }

    #[test]
    fn out_of_bounds_obstacle_rejected() {
        let mut b = GridBuilder::new(4, 1.0);
        let err = b.add_obstacle(CellCoord::new(4, 0)).unwrap_err();
        assert_eq!(err, SpatialError::OutOfBounds(CellCoord::new(4, 0)));
    }

    #[test]
    fn bad_dimensions_rejected() {
        assert!(matches!(GridBuilder::new(0, 1.0).build(), Err(SpatialError::Config(_))));
        assert!(matches!(GridBuilder::new(4, 0.0).build(), Err(SpatialError::Config(_))));
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy_tests {
    use sq_core::AgentId;

    use super::helpers::{open_grid, pillar_grid};
    use crate::{CellCoord, SpatialError};

    const A: AgentId = AgentId(0);
    const B: AgentId = AgentId(1);

    #[test]
    fn occupy_is_exclusive() {
        let mut grid = open_grid(5);
        let c = CellCoord::new(1, 1);
        grid.occupy(c, A).unwrap();
        let err = grid.occupy(c, B).unwrap_err();
        assert_eq!(err, SpatialError::CellOccupied { cell: c, occupant: A, requested: B });
        assert_eq!(grid.occupant(c), Some(A));
    }

    #[test]
    fn occupy_is_idempotent_for_holder() {
        let mut grid = open_grid(5);
        let c = CellCoord::new(4, 4);
        grid.occupy(c, A).unwrap();
        grid.occupy(c, A).unwrap();
        assert_eq!(grid.reserved_by(A), vec![c]);
    }

    #[test]
    fn vacate_only_releases_own() {
        let mut grid = open_grid(5);
        let c = CellCoord::new(2, 3);
        grid.occupy(c, A).unwrap();
        assert!(!grid.vacate(c, B));
        assert_eq!(grid.occupant(c), Some(A));
        assert!(grid.vacate(c, A));
        assert_eq!(grid.occupant(c), None);
        assert!(!grid.vacate(c, A));
    }

    #[test]
    fn obstacle_and_out_of_bounds_refused() {
        let mut grid = pillar_grid();
        assert_eq!(grid.occupy(CellCoord::new(2, 2), A), Err(SpatialError::Obstacle(CellCoord::new(2, 2))));
        assert_eq!(grid.occupy(CellCoord::new(-1, 0), A), Err(SpatialError::OutOfBounds(CellCoord::new(-1, 0))));
    }

    #[test]
    fn can_enter_and_other_checks() {
        let mut grid = open_grid(3);
        let c = CellCoord::new(0, 1);
        grid.occupy(c, A).unwrap();
        assert!(grid.can_enter(c, A));
        assert!(!grid.can_enter(c, B));
        assert!(grid.is_occupied_by_other(c, B));
        assert!(!grid.is_occupied_by_other(c, A));
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar_tests {
    use sq_core::HeuristicKind;

    use super::helpers::{assert_valid_path, open_grid, pillar_grid};
    use crate::{AStarPathfinder, CellCoord, GridBuilder, Pathfinder};

    #[test]
    fn open_grid_length_is_manhattan_plus_one() {
        let grid = open_grid(12);
        let pf = AStarPathfinder::default();
        for (dx, dz) in [(0, 0), (5, 0), (0, 7), (3, 4), (11, 11)] {
            let path = pf.find_path(&grid, CellCoord::new(0, 0), CellCoord::new(dx, dz));
            assert_eq!(path.len() as i32, dx + dz + 1, "to ({dx}, {dz})");
            assert_valid_path(&grid, &path.cells);
        }
    }

    #[test]
    fn pillar_is_avoided() {
        let grid = pillar_grid();
        let path = AStarPathfinder::default().find_path(&grid, CellCoord::new(0, 0), CellCoord::new(4, 4));
        assert_eq!(path.len(), 9);
        assert!(!path.cells.contains(&CellCoord::new(2, 2)));
        assert_eq!(path.start(), Some(CellCoord::new(0, 0)));
        assert_eq!(path.goal(), Some(CellCoord::new(4, 4)));
        assert_valid_path(&grid, &path.cells);
    }

    #[test]
    fn deterministic() {
        let grid = pillar_grid();
        let pf = AStarPathfinder::default();
        let a = pf.find_path(&grid, CellCoord::new(0, 4), CellCoord::new(4, 0));
        let b = pf.find_path(&grid, CellCoord::new(0, 4), CellCoord::new(4, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut b = GridBuilder::new(5, 1.0);
        for c in CellCoord::new(2, 2).neighbours() {
            b.add_obstacle(c).unwrap();
        }
        let grid = b.build().unwrap();
        let path = AStarPathfinder::default().find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2));
        assert!(path.is_empty());
    }

    #[test]
    fn edge_cases() {
        let grid = pillar_grid();
        let pf = AStarPathfinder::default();
        assert_eq!(pf.find_path(&grid, CellCoord::new(1, 1), CellCoord::new(1, 1)).cells, vec![CellCoord::new(1, 1)]);
        assert!(pf.find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2)).is_empty());
        assert!(pf.find_path(&grid, CellCoord::new(0, 0), CellCoord::new(9, 0)).is_empty());
        assert!(pf.find_path(&grid, CellCoord::new(-1, 0), CellCoord::new(0, 0)).is_empty());
        // Starting inside an obstacle still searches outward.
        let out = pf.find_path(&grid, CellCoord::new(2, 2), CellCoord::new(2, 4));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn avoid_routes_around_cells() {
        let grid = open_grid(3);
        let pf = AStarPathfinder::default();
        let blocked = CellCoord::new(1, 0);
        let path = pf.find_path_avoiding(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0), &|c| c == blocked);
        assert!(!path.cells.contains(&blocked));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn avoid_never_blocks_goal() {
        let grid = open_grid(3);
        let goal = CellCoord::new(2, 2);
        let path = AStarPathfinder::default().find_path_avoiding(&grid, CellCoord::new(0, 0), goal, &|c| c == goal);
        assert_eq!(path.goal(), Some(goal));
    }

    #[test]
    fn legacy_heuristic_still_finds_valid_paths() {
        let grid = pillar_grid();
        let pf = AStarPathfinder::new(HeuristicKind::LegacyProduct);
        for goal in [CellCoord::new(4, 4), CellCoord::new(0, 4), CellCoord::new(4, 0)] {
            let path = pf.find_path(&grid, CellCoord::new(0, 0), goal);
            assert_eq!(path.goal(), Some(goal));
            assert!(path.len() as i32 >= goal.manhattan(CellCoord::new(0, 0)) + 1);
            assert_valid_path(&grid, &path.cells);
        }
    }
}

// ── Line of sight ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod los_tests {
    use sq_core::Vec3;

    use super::helpers::{open_grid, pillar_grid};

    #[test]
    fn clear_on_open_grid() {
        let grid = open_grid(10);
        assert!(grid.line_of_sight(Vec3::new(0.5, 0.0, 0.5), Vec3::new(9.5, 0.0, 7.5)));
    }

    #[test]
    fn blocked_by_pillar() {
        let grid = pillar_grid();
        assert!(!grid.line_of_sight(Vec3::new(0.5, 1.6, 2.5), Vec3::new(4.5, 1.0, 2.5)));
        assert!(!grid.line_of_sight(Vec3::new(2.5, 0.0, 0.5), Vec3::new(2.5, 0.0, 4.5)));
    }

    #[test]
    fn passes_beside_pillar() {
        let grid = pillar_grid();
        assert!(grid.line_of_sight(Vec3::new(0.5, 0.0, 0.5), Vec3::new(4.5, 0.0, 0.5)));
    }

    #[test]
    fn endpoint_cells_are_not_tested() {
        let grid = pillar_grid();
        assert!(grid.line_of_sight(Vec3::new(2.5, 0.0, 2.5), Vec3::new(3.5, 0.0, 2.5)));
    }
}
