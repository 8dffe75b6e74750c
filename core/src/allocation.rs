//! Allocation engine: distributes slot call volume across present agents.
//!
//! Per slot with `n` present agents and command `v`:
//!   base = v / n, remainder = v % n
//!   the first `remainder` agents in roster order get base + 1, the rest base.
//!
//! INVARIANTS (after every `recompute_all`):
//!   - Conservation: allocations in a slot with n > 0 sum to exactly v.
//!   - Fairness: two agents in the same slot differ by at most one call.
//!   - `SlotTotals[slot]` equals the sum of `calls_by_slot[slot]` over agents.

use crate::{
    capacity::CapacityConfig,
    error::{PlanError, PlanResult},
    presence::{agents_present, OverlapRule},
    roster::{Agent, Roster},
    shift::ShiftRegistry,
    time_slot::SlotSchedule,
    types::{AgentId, SlotIndex},
};
use serde::{Deserialize, Serialize};

/// Call volume expected per slot, manual or auto-seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCommands {
    values: Vec<u32>,
}

impl SlotCommands {
    pub fn zeroed(slot_count: usize) -> Self {
        Self { values: vec![0; slot_count] }
    }

    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    pub fn get(&self, slot: SlotIndex) -> u32 {
        self.values.get(slot).copied().unwrap_or(0)
    }

    pub fn set(&mut self, slot: SlotIndex, value: u32) -> PlanResult<()> {
        let slot_count = self.values.len();
        let cell = self
            .values
            .get_mut(slot)
            .ok_or(PlanError::SlotOutOfRange { index: slot, slot_count })?;
        *cell = value;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn total(&self) -> u64 {
        self.values.iter().map(|&v| v as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Calls actually allocated to agents per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTotals {
    values: Vec<u32>,
}

impl SlotTotals {
    pub fn zeroed(slot_count: usize) -> Self {
        Self { values: vec![0; slot_count] }
    }

    pub fn get(&self, slot: SlotIndex) -> u32 {
        self.values.get(slot).copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn grand_total(&self) -> u64 {
        self.values.iter().map(|&v| v as u64).sum()
    }
}

/// Splits `command` into `present` shares, larger shares first.
pub fn split_evenly(command: u32, present: usize) -> Vec<u32> {
    if present == 0 || command == 0 {
        return Vec::new();
    }
    let n = present as u32;
    let base = command / n;
    let remainder = (command % n) as usize;
    (0..present)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Allocation for one slot, keyed by agent, in the order agents are given.
/// Callers pass agents in roster order.
pub fn distribute(command: u32, present: &[&Agent]) -> Vec<(AgentId, u32)> {
    split_evenly(command, present.len())
        .into_iter()
        .zip(present)
        .map(|(calls, agent)| (agent.id.clone(), calls))
        .collect()
}

/// Re-run allocation for every slot from scratch.
/// Resets all agent call data first, so repeated calls give identical results.
pub fn recompute_all(
    schedule: &SlotSchedule,
    commands: &SlotCommands,
    roster:   &mut Roster,
    shifts:   &ShiftRegistry,
    rule:     OverlapRule,
) -> SlotTotals {
    roster.reset_calls();
    let mut totals = SlotTotals::zeroed(schedule.len());

    for (index, slot) in schedule.iter().enumerate() {
        let command = commands.get(index);
        let present = roster.present_in(slot, shifts, rule);
        if command > 0 && present.is_empty() {
            log::warn!("slot {}: command {command} has no agents on duty", slot.label);
            continue;
        }

        let mut allocated = 0u32;
        for (position, calls) in present.iter().zip(split_evenly(command, present.len())) {
            if let Some(agent) = roster.agent_mut(*position) {
                *agent.calls_by_slot.entry(index).or_insert(0) += calls;
                agent.calls_treated += calls as u64;
                allocated += calls;
            }
        }
        totals.values[index] = allocated;
    }

    log::debug!(
        "recompute: {} slots, {} agents, {} calls allocated",
        schedule.len(),
        roster.len(),
        totals.grand_total()
    );
    totals
}

/// Seed slot commands proportionally to presence:
/// `round(daily_target * agents_present(slot) / total_agents)`.
///
/// Rounding drift against the daily target is accepted, not corrected.
pub fn auto_distribute(
    schedule: &SlotSchedule,
    shifts:   &ShiftRegistry,
    capacity: &CapacityConfig,
    rule:     OverlapRule,
) -> SlotCommands {
    let total_agents = shifts.total_headcount();
    if total_agents == 0 {
        return SlotCommands::zeroed(schedule.len());
    }
    let target = capacity.daily_call_target as f64;
    let values = schedule
        .iter()
        .map(|slot| {
            let share = agents_present(slot, shifts, rule) as f64 / total_agents as f64;
            (target * share).round() as u32
        })
        .collect();
    SlotCommands::from_values(values)
}
