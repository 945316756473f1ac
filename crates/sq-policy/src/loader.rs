//! CSV policy loader.
//!
//! # CSV format
//!
//! One row per recorded sample.  The header row is skipped and columns are
//! read by position, so header spelling does not matter.
//!
//! ```csv
//! player_detected,player_visible,distance_to_player,is_suppression_fire,health,action,q_value
//! 1,1,12.5,0,85,3,4.20
//! 1,0,33.0,0,35,1,1.75
//! 0,0,80.0,0,100,0,0.10
//! ```
//!
//! | Column                | Type                        |
//! |-----------------------|-----------------------------|
//! | `player_detected`     | flag (`0`/`1`/`true`/`false`) |
//! | `player_visible`      | flag                        |
//! | `distance_to_player`  | float, bucketed on load     |
//! | `is_suppression_fire` | flag                        |
//! | `health`              | float, bucketed on load     |
//! | `action`              | `0` Patrol, `1` Retreat, `2` Advance, `3` Attack |
//! | `q_value`             | float                       |
//!
//! Rows with an unknown action id or a non-finite value are skipped with a
//! warning; malformed rows abort the load.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::{MacroAction, PolicyError, PolicyResult, PolicyState, PolicyTable};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PolicyRecord {
    player_detected:     String,
    player_visible:      String,
    distance_to_player:  f32,
    is_suppression_fire: String,
    health:              f32,
    action:              i64,
    q_value:             f32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`PolicyTable`] from a CSV file.
pub fn load_policy_csv(path: &Path) -> PolicyResult<PolicyTable> {
    let file = std::fs::File::open(path).map_err(PolicyError::Io)?;
    load_policy_reader(file)
}

/// Like [`load_policy_csv`] but accepts any `Read` source.
pub fn load_policy_reader<R: Read>(reader: R) -> PolicyResult<PolicyTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut table = PolicyTable::new();
    let mut rows = 0usize;
    let mut skipped = 0usize;

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| PolicyError::Parse(e.to_string()))?;
        let row: PolicyRecord = record
            .deserialize(None)
            .map_err(|e| PolicyError::Parse(format!("row {}: {e}", line + 1)))?;

        let action = match MacroAction::from_csv_id(row.action) {
            Ok(a) => a,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping policy row");
                skipped += 1;
                continue;
            }
        };
        if !row.q_value.is_finite() {
            warn!(row = line + 1, value = row.q_value, "skipping policy row with non-finite value");
            skipped += 1;
            continue;
        }

        let state = PolicyState::discretize(
            parse_flag(&row.player_detected)?,
            parse_flag(&row.player_visible)?,
            row.distance_to_player,
            row.health,
            parse_flag(&row.is_suppression_fire)?,
        );
        table.insert(state, action, row.q_value);
        rows += 1;
    }

    info!(rows, skipped, states = table.len(), "policy table loaded");
    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_flag(s: &str) -> PolicyResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true"  => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(PolicyError::Parse(format!(
            "invalid flag {other:?}: expected 0, 1, true, or false"
        ))),
    }
}
