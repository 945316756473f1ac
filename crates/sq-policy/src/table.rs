//! Per-state action values.

use rustc_hash::FxHashMap;

use crate::{MacroAction, PolicyState};

#[derive(Copy, Clone, Debug, Default)]
struct Samples {
    sum:   f64,
    count: u32,
}

impl Samples {
    fn mean(self) -> Option<f32> {
        (self.count > 0).then(|| (self.sum / self.count as f64) as f32)
    }
}

/// Mean value of each [`MacroAction`] in each [`PolicyState`].
///
/// Several samples for the same state/action pair are averaged, which is how
/// rows that fall into the same bucket on load are merged.
#[derive(Clone, Debug, Default)]
pub struct PolicyTable {
    entries: FxHashMap<PolicyState, [Samples; 4]>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value sample for `action` in `state`.
    pub fn insert(&mut self, state: PolicyState, action: MacroAction, value: f32) {
        let slot = &mut self.entries.entry(state).or_default()[action.slot()];
        slot.sum += value as f64;
        slot.count += 1;
    }

    /// Mean of all samples for `action` in `state`.
    pub fn value(&self, state: &PolicyState, action: MacroAction) -> Option<f32> {
        self.entries.get(state)?[action.slot()].mean()
    }

    /// Highest-valued action with at least one sample; ties go to the
    /// earlier entry of [`MacroAction::ALL`].
    pub fn best_action(&self, state: &PolicyState) -> Option<MacroAction> {
        let samples = self.entries.get(state)?;
        let mut best: Option<(MacroAction, f32)> = None;
        for action in MacroAction::ALL {
            let Some(v) = samples[action.slot()].mean() else { continue };
            if best.is_none_or(|(_, b)| v > b) {
                best = Some((action, v));
            }
        }
        best.map(|(a, _)| a)
    }

    /// [`best_action`][Self::best_action], or `Patrol` when the state is
    /// unknown.
    pub fn select(&self, state: &PolicyState) -> MacroAction {
        self.best_action(state).unwrap_or(MacroAction::Patrol)
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
