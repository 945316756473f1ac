//! Discretised decision state.
//!
//! Bucket edges are upper-inclusive:
//!
//! | Bucket           | Range          |
//! |------------------|----------------|
//! | `Distance::Close`  | `d ≤ 15`     |
//! | `Distance::Medium` | `15 < d ≤ 60`|
//! | `Distance::Far`    | `d > 60`     |
//! | `Health::Low`      | `h ≤ 40`     |
//! | `Health::Medium`   | `40 < h ≤ 70`|
//! | `Health::High`     | `h > 70`     |

/// Distance to the player, bucketed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DistanceBucket {
    Close,
    Medium,
    Far,
}

impl DistanceBucket {
    pub const CLOSE_MAX:  f32 = 15.0;
    pub const MEDIUM_MAX: f32 = 60.0;

    pub fn from_distance(d: f32) -> Self {
        if d <= Self::CLOSE_MAX {
            DistanceBucket::Close
        } else if d <= Self::MEDIUM_MAX {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Far
        }
    }
}

/// Health, bucketed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HealthBucket {
    Low,
    Medium,
    High,
}

impl HealthBucket {
    pub const LOW_MAX:    f32 = 40.0;
    pub const MEDIUM_MAX: f32 = 70.0;

    pub fn from_health(h: f32) -> Self {
        if h <= Self::LOW_MAX {
            HealthBucket::Low
        } else if h <= Self::MEDIUM_MAX {
            HealthBucket::Medium
        } else {
            HealthBucket::High
        }
    }
}

/// Lookup key of a [`PolicyTable`][crate::PolicyTable].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PolicyState {
    pub player_detected:    bool,
    pub player_visible:     bool,
    pub distance:           DistanceBucket,
    pub health:             HealthBucket,
    pub suppression_active: bool,
}

impl PolicyState {
    /// Bucket live, continuous observations into a table key.
    pub fn discretize(
        player_detected: bool,
        player_visible: bool,
        distance: f32,
        health: f32,
        suppression_active: bool,
    ) -> Self {
        Self {
            player_detected,
            player_visible,
            distance: DistanceBucket::from_distance(distance),
            health: HealthBucket::from_health(health),
            suppression_active,
        }
    }
}
