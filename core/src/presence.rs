//! Presence calculator: how many agents are on duty in a slot.
//!
//! RULE: `OverlapRule::covers` is the only overlap test in the crate.
//! Presence counting, capacity and per-agent presence all go through it,
//! so slot totals and the per-agent matrix can never disagree.

use crate::{
    shift::{ShiftDefinition, ShiftRegistry},
    time_slot::TimeSlot,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapRule {
    /// The slot start lies in `[shift.start, shift.end)`.
    #[default]
    HalfOpen,
    /// Half-open start test, or the slot end lies in `(shift.start, shift.end]`,
    /// or the slot strictly contains the shift.
    Bidirectional,
}

impl OverlapRule {
    pub fn covers(&self, slot: &TimeSlot, shift: &ShiftDefinition) -> bool {
        let starts_within =
            slot.start_hour >= shift.start_hour && slot.start_hour < shift.end_hour;
        match self {
            Self::HalfOpen => starts_within,
            Self::Bidirectional => {
                starts_within
                    || (slot.end_hour > shift.start_hour && slot.end_hour <= shift.end_hour)
                    || (slot.start_hour < shift.start_hour && slot.end_hour > shift.end_hour)
            }
        }
    }
}

/// Sum of headcounts over every shift covering `slot`.
pub fn agents_present(slot: &TimeSlot, shifts: &ShiftRegistry, rule: OverlapRule) -> u32 {
    shifts
        .iter()
        .filter(|shift| rule.covers(slot, shift))
        .map(|shift| shift.headcount)
        .sum()
}
