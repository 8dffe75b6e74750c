use crate::{config::ConfigUpdate, types::SlotIndex};
use serde::{Deserialize, Serialize};

/// All user-issued planner commands.
/// Variants added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlannerCommand {
    UpdateConfiguration(ConfigUpdate),
    SetCommand {
        slot_index: SlotIndex,
        value:      u32,
    },
    RecomputeAll,
    AutoDistribute,
    /// Destructive: only acts when the boundary obtained confirmation.
    ClearCommands {
        #[serde(default)]
        confirmed: bool,
    },
}
