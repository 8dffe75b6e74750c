//! Capacity model: converts agent presence into calls a slot can handle.
//!
//! capacity = floor(agents_present * (SLOT_DURATION_MINUTES / aht) * occupancy)
//!
//! Floor, never round: capacity must not overstate what can be handled.
//! Callers guarantee `average_handle_time_minutes > 0`; see `config` for
//! the boundary defaults.

use crate::{
    error::{PlanError, PlanResult},
    presence::{agents_present, OverlapRule},
    shift::ShiftRegistry,
    time_slot::{TimeSlot, SLOT_DURATION_MINUTES},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    pub average_handle_time_minutes: f64,
    pub occupancy_rate:              f64,
    pub daily_call_target:           u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            average_handle_time_minutes: 10.0,
            occupancy_rate:              0.85,
            daily_call_target:           700,
        }
    }
}

impl CapacityConfig {
    pub fn validate(&self) -> PlanResult<()> {
        let aht = self.average_handle_time_minutes;
        if !aht.is_finite() || aht <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "average handle time must be > 0 minutes, got {aht}"
            )));
        }
        let occ = self.occupancy_rate;
        if !occ.is_finite() || occ <= 0.0 || occ > 1.0 {
            return Err(PlanError::InvalidConfig(format!(
                "occupancy rate must be in (0, 1], got {occ}"
            )));
        }
        Ok(())
    }

    /// Calls `agents` can handle in one slot.
    pub fn capacity_for(&self, agents: u32) -> u32 {
        let raw = agents as f64
            * (SLOT_DURATION_MINUTES / self.average_handle_time_minutes)
            * self.occupancy_rate;
        raw.floor().max(0.0) as u32
    }
}

pub fn capacity(
    slot:   &TimeSlot,
    shifts: &ShiftRegistry,
    config: &CapacityConfig,
    rule:   OverlapRule,
) -> u32 {
    config.capacity_for(agents_present(slot, shifts, rule))
}

/// Reporting status of a slot, relative to its command volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Pending,
    Excellent,
    Good,
    Warning,
    Critical,
}

impl SlotStatus {
    pub fn classify(capacity: u32, command: u32) -> Self {
        if command == 0 {
            return Self::Pending;
        }
        let difference = capacity as f64 - command as f64;
        let margin = 0.3 * command as f64;
        if difference >= margin {
            Self::Excellent
        } else if difference >= 0.0 {
            Self::Good
        } else if difference >= -margin {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending   => "Pending",
            Self::Excellent => "Excellent",
            Self::Good      => "Good",
            Self::Warning   => "Warning",
            Self::Critical  => "Critical",
        }
    }
}
