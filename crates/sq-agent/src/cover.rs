//! Cover selection.

use sq_core::geo::{at_eye_height, planar_distance};
use sq_core::{AgentId, CoverId, Tunables, Vec3};
use sq_spatial::Grid;

use crate::Environment;

/// Pick the best cover location for `agent`, or `None` if every candidate
/// is held by another agent.
///
/// ```text
/// score = cover_player_weight · |cover − player|
///       − 1 / (|cover − agent| + 1)
///       + cover_hidden_bonus    if the player cannot see the cover
/// ```
///
/// Candidates are scanned in registry order and only a strictly higher
/// score replaces the current best, so the first of equal candidates wins.
/// Visibility is a ray from the cover at eye height toward the player.
pub fn score_cover(
    grid: &Grid,
    agent: AgentId,
    agent_position: Vec3,
    player_position: Vec3,
    env: &dyn Environment,
    tunables: &Tunables,
) -> Option<CoverId> {
    score_cover_excluding(grid, agent, agent_position, player_position, env, tunables, &[])
}

/// [`score_cover`] that also passes over every cover in `skip`.
pub fn score_cover_excluding(
    grid: &Grid,
    agent: AgentId,
    agent_position: Vec3,
    player_position: Vec3,
    env: &dyn Environment,
    tunables: &Tunables,
    skip: &[CoverId],
) -> Option<CoverId> {
    let mut best: Option<(CoverId, f32)> = None;

    for (id, loc) in grid.cover_iter() {
        if skip.contains(&id) || grid.is_occupied_by_other(loc.cell, agent) {
            continue;
        }
        let eye = at_eye_height(loc.world_position, tunables.eye_height);
        let direction = (player_position - eye).normalize_or_zero();
        let hidden = !env.cast_ray(eye, direction, agent).visible;

        let score = tunables.cover_player_weight * planar_distance(loc.world_position, player_position)
            - 1.0 / (planar_distance(loc.world_position, agent_position) + 1.0)
            + if hidden { tunables.cover_hidden_bonus } else { 0.0 };

        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }

    best.map(|(id, _)| id)
}
