//! Session events: the outcome record of every applied command.
//!
//! The presentation layer turns these into notifications; the core
//! never formats user-facing messages beyond `PlanEvent::summary`.

use crate::{
    shift::ShiftId,
    types::{SessionId, SlotIndex},
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanEvent {
    SessionStarted {
        session_id: SessionId,
        slot_count: usize,
    },
    ConfigurationUpdated {
        headcounts:          Vec<(ShiftId, u32)>,
        average_handle_time: f64,
        daily_target:        u32,
    },
    RosterRegenerated {
        agent_count: usize,
    },
    CommandSet {
        slot_index: SlotIndex,
        label:      String,
        value:      u32,
    },
    CommandsAutoDistributed {
        daily_target: u32,
        seeded_total: u64,
    },
    CommandsCleared,
    ClearDeclined,
    AllocationCompleted {
        allocated_total:   u64,
        unstaffed_command: u64,
    },
}

impl PlanEvent {
    /// Stable snake_case name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }          => "session_started",
            Self::ConfigurationUpdated { .. }    => "configuration_updated",
            Self::RosterRegenerated { .. }       => "roster_regenerated",
            Self::CommandSet { .. }              => "command_set",
            Self::CommandsAutoDistributed { .. } => "commands_auto_distributed",
            Self::CommandsCleared                => "commands_cleared",
            Self::ClearDeclined                  => "clear_declined",
            Self::AllocationCompleted { .. }     => "allocation_completed",
        }
    }

    /// One-line human summary for logs and banners.
    pub fn summary(&self) -> String {
        match self {
            Self::SessionStarted { session_id, slot_count } => {
                format!("Session {session_id} started with {slot_count} slots")
            }
            Self::ConfigurationUpdated { .. } => "Configuration updated".into(),
            Self::RosterRegenerated { agent_count } => {
                format!("Roster regenerated: {agent_count} agents")
            }
            Self::CommandSet { label, value, .. } => format!("Command for {label} set to {value}"),
            Self::CommandsAutoDistributed { daily_target, seeded_total } => {
                format!("Commands auto-distributed: {seeded_total} seeded for target {daily_target}")
            }
            Self::CommandsCleared => "All commands cleared".into(),
            Self::ClearDeclined => "Clear commands declined".into(),
            Self::AllocationCompleted { allocated_total, unstaffed_command } => {
                if *unstaffed_command > 0 {
                    format!(
                        "Calls allocated: {allocated_total} ({unstaffed_command} in unstaffed slots)"
                    )
                } else {
                    format!("Calls allocated: {allocated_total}")
                }
            }
        }
    }
}
