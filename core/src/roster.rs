//! Agent roster: individual agent records generated from shift headcounts.
//!
//! Generation is a full replace: any previous roster and its call history
//! is discarded. Given the same headcounts the same IDs come back in the
//! same order, so slot-level data stays attributable across regenerations.

use crate::{
    presence::OverlapRule,
    shift::{ShiftId, ShiftRegistry},
    time_slot::TimeSlot,
    types::{AgentId, SlotIndex},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id:            AgentId,
    pub shift:         ShiftId,
    pub working_hours: f64,
    pub calls_treated: u64,
    /// Calls allocated per slot, keyed by slot index.
    pub calls_by_slot: BTreeMap<SlotIndex, u32>,
}

impl Agent {
    pub fn is_present_in(&self, slot: &TimeSlot, shifts: &ShiftRegistry, rule: OverlapRule) -> bool {
        shifts
            .get(self.shift)
            .is_some_and(|shift| rule.covers(slot, shift))
    }

    pub fn calls_in(&self, slot: SlotIndex) -> u32 {
        self.calls_by_slot.get(&slot).copied().unwrap_or(0)
    }

    /// Calls treated per working hour, one decimal; 0 when hours is 0.
    pub fn productivity(&self) -> f64 {
        if self.working_hours > 0.0 {
            (self.calls_treated as f64 / self.working_hours * 10.0).round() / 10.0
        } else {
            0.0
        }
    }

    fn reset_calls(&mut self) {
        self.calls_treated = 0;
        self.calls_by_slot.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    /// One agent per unit of headcount, shifts in enumeration order.
    /// The sequence number is global across shifts, never reset.
    pub fn generate(shifts: &ShiftRegistry) -> Self {
        let mut agents = Vec::with_capacity(shifts.total_headcount() as usize);
        let mut sequence = 1u32;
        for shift in shifts.iter() {
            for _ in 0..shift.headcount {
                agents.push(Agent {
                    id:            format!("{}{sequence:03}", shift.id.letter()),
                    shift:         shift.id,
                    working_hours: shift.working_hours(),
                    calls_treated: 0,
                    calls_by_slot: BTreeMap::new(),
                });
                sequence += 1;
            }
        }
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Roster positions of the agents on duty in `slot`, in generation order.
    pub fn present_in(&self, slot: &TimeSlot, shifts: &ShiftRegistry, rule: OverlapRule) -> Vec<usize> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| agent.is_present_in(slot, shifts, rule))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn total_calls(&self) -> u64 {
        self.agents.iter().map(|a| a.calls_treated).sum()
    }

    pub(crate) fn reset_calls(&mut self) {
        self.agents.iter_mut().for_each(Agent::reset_calls);
    }

    pub(crate) fn agent_mut(&mut self, position: usize) -> Option<&mut Agent> {
        self.agents.get_mut(position)
    }
}
