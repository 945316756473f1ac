//! The demo arena: a walled yard with crates, and a grid-raycast environment
//! with a player walking a fixed loop.

use anyhow::{ensure, Result};
use sq_agent::{AnimationState, Environment, RayHit};
use sq_core::geo::{at_eye_height, planar_distance};
use sq_core::{AgentId, SquadConfig, Vec3};
use sq_spatial::{CellCoord, Grid, GridBuilder};
use tracing::trace;

/// Crates and low walls scaled to the configured grid size.
pub fn build_grid(config: &SquadConfig) -> Result<Grid> {
    let s = config.grid_size as i32;
    ensure!(s >= 16, "the arena needs a grid of at least 16 cells, got {s}");

    let q = s / 4;
    let mut b = GridBuilder::from_config(config);
    b.add_obstacle_rect(CellCoord::new(q, q), CellCoord::new(q + 1, q + 3))?
        .add_obstacle_rect(CellCoord::new(2 * q, q + 1), CellCoord::new(2 * q + 3, q + 1))?
        .add_obstacle_rect(CellCoord::new(3 * q - 1, 2 * q), CellCoord::new(3 * q, 2 * q + 2))?
        .add_obstacle_rect(CellCoord::new(q + 2, 3 * q), CellCoord::new(2 * q, 3 * q))?
        .add_obstacle(CellCoord::new(2 * q, 2 * q))?;
    Ok(b.build()?)
}

/// Player on a rectangular loop through the far half of the arena.
/// Visibility is a DDA walk over the obstacle cells.
pub struct ArenaEnv {
    grid:     Grid,
    route:    Vec<Vec3>,
    leg:      usize,
    player:   Vec3,
    speed:    f32,
    pub shots: usize,
}

impl ArenaEnv {
    pub fn new(grid: Grid, speed: f32) -> Self {
        let s = grid.size() as i32;
        let corner = |x: i32, z: i32| grid.cell_to_world(CellCoord::new(x, z));
        let route = vec![
            corner(s - 3, s - 3),
            corner(s / 2, s - 3),
            corner(s / 2, s / 2 + 2),
            corner(s - 3, s / 2 + 2),
        ];
        let player = route[0];
        Self { grid, route, leg: 0, player, speed, shots: 0 }
    }

    /// Walk the player `speed * dt` along the loop.
    pub fn advance(&mut self, dt: f32) {
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let target = self.route[(self.leg + 1) % self.route.len()];
            let remaining = planar_distance(self.player, target);
            if remaining <= budget {
                self.player = target;
                self.leg = (self.leg + 1) % self.route.len();
                budget -= remaining;
                if remaining == 0.0 {
                    break;
                }
            } else {
                self.player += (target - self.player).normalize_or_zero() * budget;
                budget = 0.0;
            }
        }
    }

    /// Can the player see `position` (eye to eye)?
    pub fn sees(&self, position: Vec3, eye_height: f32) -> bool {
        self.grid.line_of_sight(at_eye_height(position, eye_height), self.player)
    }
}

impl Environment for ArenaEnv {
    fn player_position(&self) -> Vec3 {
        self.player
    }

    fn cast_ray(&self, origin: Vec3, _direction: Vec3, _exclude: AgentId) -> RayHit {
        let visible = self.grid.line_of_sight(origin, self.player);
        RayHit { visible, hit_point: if visible { self.player } else { origin } }
    }

    fn play_animation(&mut self, agent: AgentId, animation: AnimationState) {
        trace!(%agent, ?animation, "animation");
    }

    fn play_sound(&mut self, agent: AgentId, sound: &str) {
        if sound == "gunshot" {
            self.shots += 1;
        }
        trace!(%agent, sound, "sound");
    }
}
