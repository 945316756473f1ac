//! skirmish — a four-agent squad against a scripted player.
//!
//! The player walks a loop through the far half of a crate-strewn yard and
//! fires at the nearest agent it can see every `SHOT_INTERVAL_TICKS`.  One
//! agent runs on a small embedded macro-policy table; the others tick the
//! behavior tree.
//!
//! ```text
//! cargo run -p skirmish                     # built-in config
//! cargo run -p skirmish -- squad.json       # SquadConfig as JSON
//! RUST_LOG=debug cargo run -p skirmish      # branch changes, cover picks
//! ```

mod arena;

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use sq_agent::{Branch, DecisionMode, Environment};
use sq_core::geo::planar_distance;
use sq_core::{AgentId, SquadConfig, Tick, Vec3};
use sq_policy::load_policy_reader;
use sq_sim::{Spawn, Squad, SquadBuilder, SquadObserver};
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena::{build_grid, ArenaEnv};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:           usize = 40;
const FRAME_SECS:          f32   = 1.0 / 30.0;
const TOTAL_TICKS:         u64   = 1_800; // 60 s at 30 fps
const PLAYER_SPEED:        f32   = 2.5;
const PLAYER_DAMAGE:       f32   = 20.0;
const PLAYER_RANGE:        f32   = 25.0;
const SHOT_INTERVAL_TICKS: u64   = 45;

// ── Macro policy ──────────────────────────────────────────────────────────────

// Two rows share a bucket (detected, visible, medium range, high health) and
// are averaged: Attack wins 2.5 against Advance 2.0.
const POLICY_CSV: &str = "\
player_detected,player_visible,distance_to_player,is_suppression_fire,health,action,q_value\n\
1,1,10.0,0,90,3,5.0\n\
1,1,10.0,0,30,1,4.0\n\
1,0,40.0,0,90,2,3.0\n\
1,1,40.0,0,90,3,2.5\n\
1,1,40.0,0,90,2,2.0\n\
1,1,40.0,1,90,3,3.5\n\
0,0,80.0,0,100,0,1.0\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct BranchLog {
    changes: usize,
    deaths:  usize,
}

impl SquadObserver for BranchLog {
    fn on_branch_change(&mut self, tick: Tick, agent: AgentId, from: Branch, to: Branch) {
        self.changes += 1;
        if to == Branch::Dead {
            self.deaths += 1;
        }
        info!(%tick, %agent, %from, %to, "branch");
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SquadConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(SquadConfig {
            grid_size:   GRID_SIZE,
            frame_secs:  FRAME_SECS,
            total_ticks: TOTAL_TICKS,
            ..SquadConfig::default()
        }),
    }
}

/// Square patrol route of half-width `r` around `centre`.
fn square(centre: Vec3, r: f32) -> Vec<Vec3> {
    vec![
        centre + Vec3::new(-r, 0.0, -r),
        centre + Vec3::new(r, 0.0, -r),
        centre + Vec3::new(r, 0.0, r),
        centre + Vec3::new(-r, 0.0, r),
    ]
}

fn build_squad(config: &SquadConfig) -> Result<(Squad, ArenaEnv)> {
    let grid = build_grid(config)?;
    let env = ArenaEnv::new(grid.clone(), PLAYER_SPEED);
    let policy = load_policy_reader(Cursor::new(POLICY_CSV))?;

    let s = config.grid_size as f32 * config.cell_size;
    let at = |fx: f32, fz: f32| Vec3::new(s * fx + 0.5, 0.0, s * fz + 0.5);
    let r = s / 16.0;

    let squad = SquadBuilder::new(config.clone())
        .grid(grid)
        .policy(policy)
        .agents([
            Spawn::at(at(0.15, 0.15)).waypoints(square(at(0.15, 0.15), r)),
            Spawn::at(at(0.40, 0.10)).waypoints(square(at(0.40, 0.15), r)),
            Spawn::at(at(0.10, 0.45)).waypoints(square(at(0.15, 0.45), r)),
            Spawn::at(at(0.35, 0.35))
                .mode(DecisionMode::MacroPolicy)
                .waypoints(square(at(0.35, 0.35), r)),
        ])
        .build()?;
    Ok((squad, env))
}

/// The live agent the player can see and reach, nearest first.
fn player_target(squad: &Squad, env: &ArenaEnv) -> Option<AgentId> {
    let eye = squad.config.tunables.eye_height;
    let player = env.player_position();
    squad
        .agents()
        .iter()
        .filter(|npc| npc.state.is_alive() && env.sees(npc.state.position, eye))
        .map(|npc| (npc.id(), planar_distance(npc.state.position, player)))
        .filter(|&(_, d)| d <= PLAYER_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = load_config()?;
    let (mut squad, mut env) = build_squad(&config)?;
    let mut log = BranchLog::default();

    info!(
        agents = squad.len(),
        ticks  = config.total_ticks,
        covers = squad.grid().covers().len(),
        "skirmish start"
    );
    let started = Instant::now();

    for tick in 0..config.total_ticks {
        env.advance(config.frame_secs);
        squad.run_ticks(1, &mut env, &mut log);

        if tick % SHOT_INTERVAL_TICKS == 0 {
            if let Some(target) = player_target(&squad, &env) {
                squad.damage_agent(target, PLAYER_DAMAGE)?;
                info!(tick, %target, health = squad.health(target).unwrap_or(0.0), "player hits");
            }
        }
        if squad.alive_count() == 0 {
            info!(tick, "squad eliminated");
            break;
        }
    }

    let elapsed = started.elapsed();
    println!();
    println!("── Skirmish summary ({}) ──", squad.clock);
    println!("  wall time       : {:.1} ms", elapsed.as_secs_f64() * 1e3);
    println!("  branch changes  : {}", log.changes);
    println!("  agents lost     : {}", log.deaths);
    println!("  squad shots     : {}", env.shots);
    println!();
    println!("  {:<12} {:<18} {:>6}  {:>14}  {:>5}", "agent", "state", "health", "position", "shots");
    for npc in squad.agents() {
        let s = &npc.state;
        println!(
            "  {:<12} {:<18} {:>6.0}  ({:>5.1}, {:>5.1})  {:>5}",
            s.id.to_string(),
            s.state_label(),
            s.health,
            s.position.x,
            s.position.z,
            s.shots_fired,
        );
    }
    Ok(())
}
