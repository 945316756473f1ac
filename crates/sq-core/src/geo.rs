//! World-space vector type and the few helpers the AI layer needs.
//!
//! Positions are `glam::Vec3` with `y` up; the navigation grid lies on the
//! `x`/`z` plane.  Helpers here never touch grid indices; world↔cell
//! conversion belongs to `sq_spatial::Grid` alone.

pub use glam::Vec3;

/// Distance between two points ignoring height.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Unit vector from `from` toward `to` on the ground plane.
///
/// Returns `Vec3::ZERO` when the points coincide horizontally.
#[inline]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// `p` lifted to eye height: the origin for line-of-sight rays.
#[inline]
pub fn at_eye_height(p: Vec3, eye_height: f32) -> Vec3 {
    Vec3::new(p.x, p.y + eye_height, p.z)
}
