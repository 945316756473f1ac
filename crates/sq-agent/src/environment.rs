//! The narrow interface to everything outside the AI core.

use sq_core::{AgentId, Vec3};

/// Result of a visibility ray.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RayHit {
    /// The ray reached the player unobstructed.
    pub visible:   bool,
    /// Where the ray stopped (the player, or the first obstruction).
    pub hit_point: Vec3,
}

/// Animation an agent asks its presentation layer to play.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationState {
    Idle,
    Walk,
    Run,
    Aim,
    Shoot,
    Crouch,
    Hit,
    Dying,
}

/// World services the agents consume.
///
/// Queries take `&self`; the presentation calls are fire-and-forget and
/// default to no-ops so headless runs and tests only implement the two
/// queries.
pub trait Environment {
    /// Current world position of the player.
    fn player_position(&self) -> Vec3;

    /// Cast a ray from `origin` along `direction` toward the player,
    /// ignoring `exclude`'s own body.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, exclude: AgentId) -> RayHit;

    fn play_animation(&mut self, _agent: AgentId, _animation: AnimationState) {}

    fn play_sound(&mut self, _agent: AgentId, _sound: &str) {}
}
