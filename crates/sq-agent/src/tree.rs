//! The NPC's behavior tree: leaf keys and the fixed branch layout.
//!
//! ```text
//! root (selector)
//! ├── dead           IsDeadOrDying  → Die
//! ├── taking damage  IsTakingDamage → Flinch
//! ├── seek cover     ShouldSeekCover → PickCover → MoveToCover → EnterCover
//! ├── in cover       IsInCover → HoldCover → engage
//! ├── suppression    IsSuppressing → engage
//! ├── attack (sel)   [PlayerDetected → engage] | patrol
//! └── patrol         ShouldPatrol → Patrol
//!
//! engage (selector)  [PlayerVisible → Attack] | Chase
//! ```
//!
//! `engage` and `patrol` are built once and shared.

use sq_behavior::{BehaviorTree, TreeBuilder};

use crate::AgentResult;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NpcCondition {
    IsDeadOrDying,
    IsTakingDamage,
    ShouldSeekCover,
    IsInCover,
    IsSuppressing,
    PlayerDetected,
    PlayerVisible,
    ShouldPatrol,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NpcAction {
    Die,
    Flinch,
    PickCover,
    MoveToCover,
    EnterCover,
    HoldCover,
    Attack,
    Chase,
    Patrol,
    /// Only reachable from macro-policy mode.
    Retreat,
}

pub type NpcTree = BehaviorTree<NpcCondition, NpcAction>;

/// Build the standard NPC tree.
pub fn build_npc_tree() -> AgentResult<NpcTree> {
    use NpcAction as A;
    use NpcCondition as C;

    let mut b = TreeBuilder::new();

    // ── Shared subtrees ───────────────────────────────────────────────────
    let visible = b.condition(C::PlayerVisible);
    let attack  = b.action(A::Attack);
    let shoot   = b.sequence("shoot", vec![visible, attack]);
    let chase   = b.action(A::Chase);
    let engage  = b.selector("engage", vec![shoot, chase]);

    let should_patrol = b.condition(C::ShouldPatrol);
    let patrol_act    = b.action(A::Patrol);
    let patrol        = b.sequence("patrol", vec![should_patrol, patrol_act]);

    // ── Branches, highest priority first ──────────────────────────────────
    let dying = b.condition(C::IsDeadOrDying);
    let die   = b.action(A::Die);
    let dead  = b.sequence("dead", vec![dying, die]);

    let hurt   = b.condition(C::IsTakingDamage);
    let flinch = b.action(A::Flinch);
    let damage = b.sequence("taking damage", vec![hurt, flinch]);

    let low   = b.condition(C::ShouldSeekCover);
    let pick  = b.action(A::PickCover);
    let go    = b.action(A::MoveToCover);
    let enter = b.action(A::EnterCover);
    let seek  = b.sequence("seek cover", vec![low, pick, go, enter]);

    let covered  = b.condition(C::IsInCover);
    let hold     = b.action(A::HoldCover);
    let in_cover = b.sequence("in cover", vec![covered, hold, engage]);

    let suppressing = b.condition(C::IsSuppressing);
    let suppression = b.sequence("suppression", vec![suppressing, engage]);

    let detected  = b.condition(C::PlayerDetected);
    let hunt      = b.sequence("player detected", vec![detected, engage]);
    let attacking = b.selector("attack", vec![hunt, patrol]);

    let root = b.selector(
        "root",
        vec![dead, damage, seek, in_cover, suppression, attacking, patrol],
    );
    Ok(b.build(root)?)
}
