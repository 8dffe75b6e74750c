//! Snapshot: every outbound table computed from one consistent state.
//!
//! Renderers and exporters read snapshots only, so a view never mixes
//! old commands with a new roster.

use crate::{
    report::{AgentSlotMatrix, AgentSummary, ConfigurationSummary, SlotSummary},
    types::SessionId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub session_id:    SessionId,
    pub slots:         SlotSummary,
    pub agents:        AgentSummary,
    pub matrix:        AgentSlotMatrix,
    pub configuration: ConfigurationSummary,
}
