//! Integration tests for sq-sim.

use sq_agent::{AnimationState, Branch, Environment, RayHit};
use sq_core::{AgentId, SquadConfig, Tick, Vec3};
use sq_spatial::{CellCoord, GridBuilder};

use crate::{Spawn, Squad, SquadBuilder, SquadObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Environment with a fixed player and all-or-nothing line of sight.
struct StaticEnv {
    player:  Vec3,
    visible: bool,
    shots:   usize,
}

impl StaticEnv {
    fn blind() -> Self {
        Self { player: Vec3::new(19.5, 0.0, 19.5), visible: false, shots: 0 }
    }
}

impl Environment for StaticEnv {
    fn player_position(&self) -> Vec3 {
        self.player
    }

    fn cast_ray(&self, origin: Vec3, _direction: Vec3, _exclude: AgentId) -> RayHit {
        RayHit { visible: self.visible, hit_point: if self.visible { self.player } else { origin } }
    }

    fn play_animation(&mut self, _agent: AgentId, animation: AnimationState) {
        if animation == AnimationState::Shoot {
            self.shots += 1;
        }
    }
}

fn test_config(grid_size: usize) -> SquadConfig {
    SquadConfig {
        frame_secs: 0.05,
        total_ticks: 40,
        grid_size,
        ..SquadConfig::default()
    }
}

fn centre(x: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32 + 0.5, 0.0, z as f32 + 0.5)
}

fn cell_of(squad: &Squad, id: AgentId) -> CellCoord {
    squad.grid().world_to_cell_clamped(squad.position(id).unwrap())
}

#[derive(Default)]
struct Recorder {
    starts:   u64,
    ends:     u64,
    changes:  Vec<(AgentId, Branch, Branch)>,
    finished: Option<Tick>,
}

impl SquadObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_branch_change(&mut self, _tick: Tick, agent: AgentId, from: Branch, to: Branch) {
        self.changes.push((agent, from, to));
    }

    fn on_tick_end(&mut self, _tick: Tick, squad: &Squad) {
        assert!(squad.alive_count() <= squad.len());
        self.ends += 1;
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.finished = Some(final_tick);
    }
}

// ── SquadBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use sq_event::EventKind;
    use sq_spatial::SpatialError;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_and_places_agents() {
        let squad = SquadBuilder::new(test_config(10))
            .agent(Spawn::at(Vec3::new(1.2, 0.0, 1.9)))
            .agent(Spawn::at(centre(5, 5)))
            .build()
            .unwrap();

        assert_eq!(squad.len(), 2);
        assert_eq!(squad.position(AgentId(0)), Some(centre(1, 1)), "snapped to the cell centre");
        assert_eq!(squad.grid().occupant(CellCoord::new(1, 1)), Some(AgentId(0)));
        assert_eq!(squad.grid().occupant(CellCoord::new(5, 5)), Some(AgentId(1)));
        assert_eq!(squad.agent(AgentId(1)).unwrap().state.reserved, vec![CellCoord::new(5, 5)]);
        assert_eq!(squad.state_label(AgentId(0)), Some("Idle"));
        assert_eq!(squad.health(AgentId(1)), Some(100.0));
        assert_eq!(squad.bus().subscriber_count(EventKind::NpcDamaged), 2);
        assert!(squad.policy().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SquadConfig { frame_secs: 0.0, ..test_config(10) };
        assert!(matches!(SquadBuilder::new(config).build(), Err(SimError::Core(_))));
    }

    #[test]
    fn spawn_outside_the_grid() {
        let err = SquadBuilder::new(test_config(10))
            .agent(Spawn::at(Vec3::new(-3.0, 0.0, 1.0)))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimError::Spawn { agent: AgentId(0), source: SpatialError::OutOfBounds(_), .. }
        ));
    }

    #[test]
    fn spawn_on_an_obstacle() {
        let mut b = GridBuilder::new(10, 1.0);
        b.add_obstacle(CellCoord::new(3, 3)).unwrap();
        let err = SquadBuilder::new(test_config(10))
            .grid(b.build().unwrap())
            .agent(Spawn::at(centre(3, 3)))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Spawn { source: SpatialError::Obstacle(_), .. }));
    }

    #[test]
    fn two_spawns_in_one_cell() {
        let err = SquadBuilder::new(test_config(10))
            .agents([Spawn::at(centre(2, 2)), Spawn::at(Vec3::new(2.9, 0.0, 2.1))])
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimError::Spawn { agent: AgentId(1), source: SpatialError::CellOccupied { .. }, .. }
        ));
    }

    #[test]
    fn policy_csv_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"player_detected,player_visible,distance_to_player,is_suppression_fire,health,action,q_value\n\
              0,0,120.0,0,100.0,3,1.5\n",
        )
        .unwrap();
        let squad = SquadBuilder::new(test_config(10)).policy_csv(file.path()).unwrap().build().unwrap();
        assert_eq!(squad.policy().map(|t| t.len()), Some(1));
    }

    #[test]
    fn missing_policy_file() {
        let result = SquadBuilder::new(test_config(10)).policy_csv("/nonexistent/policy.csv");
        assert!(matches!(result, Err(SimError::Policy(_))));
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod update_tests {
    use sq_agent::DecisionMode;
    use sq_policy::{MacroAction, PolicyState, PolicyTable};

    use super::*;

    #[test]
    fn healthy_agent_patrols() {
        let mut squad = SquadBuilder::new(test_config(20))
            .agent(Spawn::at(centre(2, 2)).waypoints(vec![centre(8, 2), centre(2, 2)]))
            .build()
            .unwrap();
        let mut env = StaticEnv::blind();

        assert_eq!(squad.update(0.05, &mut env), 1);
        let npc = squad.agent(AgentId(0)).unwrap();
        assert_eq!(npc.state.branch, Branch::Patrolling);
        assert_eq!(squad.state_label(AgentId(0)), Some("Patrolling"));
        assert!(!npc.state.current_path.is_empty());
        assert_eq!(squad.clock.current_tick, Tick(1));
    }

    #[test]
    fn crossing_agents_never_share_a_cell_and_both_arrive() {
        let mut squad = SquadBuilder::new(test_config(5))
            .agent(Spawn::at(centre(0, 2)).waypoints(vec![centre(4, 2)]))
            .agent(Spawn::at(centre(2, 0)).waypoints(vec![centre(2, 4)]))
            .build()
            .unwrap();
        let mut env = StaticEnv::blind();

        for _ in 0..300 {
            squad.update(0.05, &mut env);
            let a = cell_of(&squad, AgentId(0));
            let b = cell_of(&squad, AgentId(1));
            assert_ne!(a, b);
            for id in [AgentId(0), AgentId(1)] {
                for cell in &squad.agent(id).unwrap().state.reserved {
                    assert_eq!(squad.grid().occupant(*cell), Some(id));
                }
            }
        }
        assert_eq!(cell_of(&squad, AgentId(0)), CellCoord::new(4, 2));
        assert_eq!(cell_of(&squad, AgentId(1)), CellCoord::new(2, 4));
    }

    #[test]
    fn sighting_alerts_the_whole_squad_within_the_frame() {
        let mut squad = SquadBuilder::new(test_config(20))
            .agents([Spawn::at(centre(2, 2)), Spawn::at(centre(4, 2))])
            .build()
            .unwrap();
        let mut env = StaticEnv { player: centre(10, 2), visible: true, shots: 0 };

        squad.update(0.05, &mut env);
        for id in [AgentId(0), AgentId(1)] {
            let s = &squad.agent(id).unwrap().state;
            assert!(s.is_player_detected);
            assert_eq!(s.branch, Branch::Attacking);
        }
        assert_eq!(env.shots, 2);
    }

    #[test]
    fn macro_agent_follows_the_table() {
        let mut table = PolicyTable::new();
        table.insert(
            PolicyState::discretize(false, false, 120.0, 100.0, false),
            MacroAction::Attack,
            1.0,
        );
        let mut squad = SquadBuilder::new(test_config(100))
            .policy(table)
            .agent(Spawn::at(centre(2, 2)).mode(DecisionMode::MacroPolicy))
            .build()
            .unwrap();
        let mut env = StaticEnv { player: centre(90, 90), visible: false, shots: 0 };

        squad.update(0.05, &mut env);
        let s = &squad.agent(AgentId(0)).unwrap().state;
        assert_eq!(s.macro_action, Some(MacroAction::Attack));
        assert_eq!(s.position, centre(2, 2), "attack without sight holds position");
    }

    #[test]
    fn run_ticks_drives_the_observer() {
        let mut squad = SquadBuilder::new(test_config(10))
            .agent(Spawn::at(centre(1, 1)).waypoints(vec![centre(6, 1)]))
            .build()
            .unwrap();
        let mut env = StaticEnv::blind();
        let mut rec = Recorder::default();

        squad.run_ticks(5, &mut env, &mut rec);
        assert_eq!(rec.starts, 5);
        assert_eq!(rec.ends, 5);
        assert_eq!(squad.clock.current_tick, Tick(5));
        assert!((squad.clock.elapsed_secs - 0.25).abs() < 1e-5);
        assert_eq!(rec.changes, vec![(AgentId(0), Branch::Idle, Branch::Patrolling)]);
        assert_eq!(rec.finished, None);
    }

    #[test]
    fn run_stops_at_total_ticks() {
        let mut squad = SquadBuilder::new(test_config(10)).agent(Spawn::at(centre(1, 1))).build().unwrap();
        let mut env = StaticEnv::blind();
        let mut rec = Recorder::default();

        squad.run(&mut env, &mut rec);
        assert_eq!(squad.clock.current_tick, Tick(40));
        assert_eq!(rec.finished, Some(Tick(40)));
    }
}

// ── Damage and death ──────────────────────────────────────────────────────────

#[cfg(test)]
mod damage_tests {
    use super::*;
    use crate::SimError;

    fn pair() -> Squad {
        SquadBuilder::new(test_config(10))
            .agents([Spawn::at(centre(1, 1)), Spawn::at(centre(8, 8))])
            .build()
            .unwrap()
    }

    #[test]
    fn damage_pulls_allies_out_of_cover() {
        let mut squad = pair();
        {
            let ally = &mut squad.agent_mut(AgentId(0)).unwrap().state;
            ally.is_in_cover = true;
            ally.is_taking_cover = true;
        }

        squad.damage_agent(AgentId(1), 10.0).unwrap();

        let ally = &squad.agent(AgentId(0)).unwrap().state;
        assert!(!ally.is_in_cover);
        assert!(ally.provide_suppression_fire);
        assert_eq!(ally.suppression_timer, squad.config.tunables.suppression_secs);
        assert_eq!(ally.health, 100.0);

        let hit = &squad.agent(AgentId(1)).unwrap().state;
        assert_eq!(hit.health, 90.0);
        assert!(hit.is_taking_damage);
        assert!(!hit.provide_suppression_fire);
    }

    #[test]
    fn damaged_agent_flinches_on_the_next_frame() {
        let mut squad = pair();
        squad.damage_agent(AgentId(0), 5.0).unwrap();
        squad.update(0.05, &mut StaticEnv::blind());
        assert_eq!(squad.state_label(AgentId(0)), Some("Taking Damage"));
    }

    #[test]
    fn unknown_agent() {
        let mut squad = pair();
        assert!(matches!(squad.damage_agent(AgentId(7), 1.0), Err(SimError::UnknownAgent(AgentId(7)))));
        assert!(squad.set_waypoints(AgentId(7), Vec::new()).is_err());
    }

    #[test]
    fn lethal_damage_kills_and_the_dead_are_skipped() {
        let mut squad = pair();
        let mut env = StaticEnv::blind();
        squad.damage_agent(AgentId(0), 500.0).unwrap();
        assert_eq!(squad.health(AgentId(0)), Some(0.0));

        squad.update(0.05, &mut env);
        assert_eq!(squad.state_label(AgentId(0)), Some("Dying"));
        assert_eq!(squad.grid().occupant(CellCoord::new(1, 1)), None);

        squad.update(2.5, &mut env);
        assert_eq!(squad.state_label(AgentId(0)), Some("Dead"));
        assert_eq!(squad.agent(AgentId(1)).unwrap().state.dead_allies, 1);
        assert_eq!(squad.alive_count(), 1);

        assert_eq!(squad.update(0.05, &mut env), 1);
        squad.damage_agent(AgentId(0), 10.0).unwrap();
        assert_eq!(squad.health(AgentId(0)), Some(0.0));
    }
}
