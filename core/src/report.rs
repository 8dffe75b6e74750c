//! Outbound tables: slot summary, agent performance, agent × slot matrix,
//! configuration summary.
//!
//! Everything here is plain data for a renderer or exporter to serialize.
//! No formatting beyond the rounding each column defines.

use crate::{
    allocation::{SlotCommands, SlotTotals},
    capacity::{CapacityConfig, SlotStatus},
    presence::{agents_present, OverlapRule},
    roster::Roster,
    shift::{ShiftId, ShiftRegistry},
    time_slot::SlotSchedule,
    types::AgentId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(part: f64, whole: f64) -> u32 {
    if whole > 0.0 {
        (part / whole * 100.0).round() as u32
    } else {
        0
    }
}

// ── Slot summary ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRow {
    pub label:          String,
    pub agents_present: u32,
    pub command:        u32,
    pub capacity:       u32,
    /// capacity - command
    pub difference:     i64,
    pub status:         SlotStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayLoad {
    Ok,
    Overloaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub rows:             Vec<SlotRow>,
    /// Sum of per-slot presence (agent-slots, not distinct agents).
    pub total_agents:     u64,
    pub total_command:    u64,
    pub total_capacity:   u64,
    pub total_difference: i64,
    pub coverage_percent: u32,
    pub load:             DayLoad,
}

pub fn slot_summary(
    schedule: &SlotSchedule,
    shifts:   &ShiftRegistry,
    capacity: &CapacityConfig,
    rule:     OverlapRule,
    commands: &SlotCommands,
) -> SlotSummary {
    let rows: Vec<SlotRow> = schedule
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let present = agents_present(slot, shifts, rule);
            let slot_capacity = capacity.capacity_for(present);
            let command = commands.get(index);
            SlotRow {
                label:          slot.label.clone(),
                agents_present: present,
                command,
                capacity:       slot_capacity,
                difference:     slot_capacity as i64 - command as i64,
                status:         SlotStatus::classify(slot_capacity, command),
            }
        })
        .collect();

    let total_agents = rows.iter().map(|r| r.agents_present as u64).sum();
    let total_command: u64 = rows.iter().map(|r| r.command as u64).sum();
    let total_capacity: u64 = rows.iter().map(|r| r.capacity as u64).sum();
    let coverage_percent = percent(total_command as f64, total_capacity as f64);

    SlotSummary {
        rows,
        total_agents,
        total_command,
        total_capacity,
        total_difference: total_capacity as i64 - total_command as i64,
        coverage_percent,
        load: if coverage_percent <= 100 { DayLoad::Ok } else { DayLoad::Overloaded },
    }
}

// ── Agent performance ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementBand {
    /// >= 100%
    Met,
    /// >= 80%
    Near,
    /// >= 50%
    Behind,
    Far,
}

impl AchievementBand {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            100.. => Self::Met,
            80..=99 => Self::Near,
            50..=79 => Self::Behind,
            _ => Self::Far,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRow {
    pub agent_id:            AgentId,
    pub shift:               ShiftId,
    pub working_hours:       f64,
    pub calls_treated:       u64,
    pub productivity:        f64,
    pub achievement_percent: u32,
    pub achievement_band:    AchievementBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub rows:                        Vec<AgentRow>,
    pub average_calls:               u32,
    pub average_hours:               f64,
    pub average_productivity:        f64,
    pub overall_achievement_percent: u32,
}

pub fn agent_summary(roster: &Roster, capacity: &CapacityConfig) -> AgentSummary {
    let target = capacity.daily_call_target as f64;
    let n = roster.len();
    // Even per-agent share of the daily target.
    let share = if n > 0 { target / n as f64 } else { 0.0 };

    let rows: Vec<AgentRow> = roster
        .agents()
        .iter()
        .map(|agent| {
            let achievement = if target > 0.0 {
                percent(agent.calls_treated as f64, share)
            } else {
                0
            };
            AgentRow {
                agent_id:            agent.id.clone(),
                shift:               agent.shift,
                working_hours:       agent.working_hours,
                calls_treated:       agent.calls_treated,
                productivity:        agent.productivity(),
                achievement_percent: achievement,
                achievement_band:    AchievementBand::from_percent(achievement),
            }
        })
        .collect();

    let total_calls = roster.total_calls() as f64;
    let total_hours: f64 = roster.agents().iter().map(|a| a.working_hours).sum();
    let (average_calls, average_hours) = if n > 0 {
        ((total_calls / n as f64).round() as u32, round1(total_hours / n as f64))
    } else {
        (0, 0.0)
    };
    let average_productivity = if average_hours > 0.0 {
        round1(average_calls as f64 / average_hours)
    } else {
        0.0
    };

    AgentSummary {
        rows,
        average_calls,
        average_hours,
        average_productivity,
        overall_achievement_percent: percent(total_calls, target),
    }
}

// ── Agent × slot matrix ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixCell {
    Calls(u32),
    NotPresent,
}

impl MatrixCell {
    pub fn calls(&self) -> u32 {
        match self {
            Self::Calls(n) => *n,
            Self::NotPresent => 0,
        }
    }

    /// Cell text for tabular exports; "-" marks an absent agent.
    pub fn display(&self) -> String {
        match self {
            Self::Calls(n) => n.to_string(),
            Self::NotPresent => "-".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub agent_id: AgentId,
    pub shift:    ShiftId,
    pub cells:    Vec<MatrixCell>,
    pub total:    u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSlotMatrix {
    pub slot_labels:   Vec<String>,
    pub rows:          Vec<MatrixRow>,
    pub column_totals: Vec<u32>,
    pub grand_total:   u64,
}

pub fn agent_slot_matrix(
    schedule: &SlotSchedule,
    roster:   &Roster,
    shifts:   &ShiftRegistry,
    rule:     OverlapRule,
    totals:   &SlotTotals,
) -> AgentSlotMatrix {
    let rows = roster
        .agents()
        .iter()
        .map(|agent| MatrixRow {
            agent_id: agent.id.clone(),
            shift:    agent.shift,
            cells:    schedule
                .iter()
                .enumerate()
                .map(|(index, slot)| {
                    if agent.is_present_in(slot, shifts, rule) {
                        MatrixCell::Calls(agent.calls_in(index))
                    } else {
                        MatrixCell::NotPresent
                    }
                })
                .collect(),
            total:    agent.calls_treated,
        })
        .collect();

    AgentSlotMatrix {
        slot_labels:   schedule.labels(),
        rows,
        column_totals: (0..schedule.len()).map(|i| totals.get(i)).collect(),
        grand_total:   totals.grand_total(),
    }
}

/// Row selection for the matrix view; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixFilter {
    pub agent: Option<AgentId>,
    pub shift: Option<ShiftId>,
}

impl MatrixFilter {
    pub fn matches(&self, row: &MatrixRow) -> bool {
        self.agent.as_ref().is_none_or(|id| *id == row.agent_id)
            && self.shift.is_none_or(|shift| shift == row.shift)
    }
}

impl AgentSlotMatrix {
    /// Rows selected by `filter`. Column totals are not affected.
    pub fn filtered<'a>(&'a self, filter: &'a MatrixFilter) -> impl Iterator<Item = &'a MatrixRow> {
        self.rows.iter().filter(move |row| filter.matches(row))
    }
}

// ── Configuration summary ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    pub plan_date:         NaiveDate,
    pub daily_target:      u32,
    pub headcounts:        Vec<(ShiftId, u32)>,
    pub total_agents:      u32,
    pub aht_minutes:       f64,
    pub occupancy_percent: u32,
}

pub fn configuration_summary(
    plan_date: NaiveDate,
    shifts:    &ShiftRegistry,
    capacity:  &CapacityConfig,
) -> ConfigurationSummary {
    ConfigurationSummary {
        plan_date,
        daily_target:      capacity.daily_call_target,
        headcounts:        shifts.iter().map(|s| (s.id, s.headcount)).collect(),
        total_agents:      shifts.total_headcount(),
        aht_minutes:       capacity.average_handle_time_minutes,
        occupancy_percent: (capacity.occupancy_rate * 100.0).round() as u32,
    }
}
