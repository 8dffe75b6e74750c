//! The planning session: explicit context for one planner.
//!
//! CONTROL FLOW:
//!   configuration update -> shift registry -> roster regenerated
//!   recompute-all        -> allocation pass over every slot
//!   snapshot             -> presence, capacity and tables recomputed on demand
//!
//! RULES:
//!   - Every command runs to completion before the next one is applied.
//!   - Capacity and presence are never cached; only allocation results are.
//!   - Roster regeneration discards call history and zeroes slot totals.
//!   - One writer per session. Hosts sharing a session across threads
//!     wrap it in a mutex.

use crate::{
    allocation::{self, SlotCommands, SlotTotals},
    capacity::CapacityConfig,
    command::PlannerCommand,
    config::{ConfigUpdate, PlannerConfig},
    error::{PlanError, PlanResult},
    event::PlanEvent,
    presence::{agents_present, OverlapRule},
    report,
    roster::Roster,
    shift::{ShiftId, ShiftRegistry},
    snapshot::PlanSnapshot,
    time_slot::SlotSchedule,
    types::{SessionId, SlotIndex},
};
use chrono::NaiveDate;

pub struct PlanningSession {
    pub session_id: SessionId,
    capacity:       CapacityConfig,
    overlap_rule:   OverlapRule,
    shifts:         ShiftRegistry,
    schedule:       SlotSchedule,
    roster:         Roster,
    commands:       SlotCommands,
    totals:         SlotTotals,
    events:         Vec<PlanEvent>,
}

impl PlanningSession {
    pub fn new(config: PlannerConfig) -> PlanResult<Self> {
        Self::with_id(uuid::Uuid::new_v4().to_string(), config)
    }

    /// Build a session with a caller-chosen id (replay and tests).
    pub fn with_id(session_id: SessionId, config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        let schedule = config.schedule()?;
        let shifts = config.shift_registry();
        let roster = Roster::generate(&shifts);
        let slot_count = schedule.len();

        let mut session = Self {
            capacity:     config.capacity,
            overlap_rule: config.overlap_rule,
            commands:     SlotCommands::zeroed(slot_count),
            totals:       SlotTotals::zeroed(slot_count),
            events:       Vec::new(),
            session_id,
            shifts,
            schedule,
            roster,
        };
        log::info!(
            "session {}: {} slots, {} agents, rule={:?}",
            session.session_id,
            slot_count,
            session.roster.len(),
            session.overlap_rule
        );
        let started = PlanEvent::SessionStarted {
            session_id: session.session_id.clone(),
            slot_count,
        };
        session.events.push(started);
        Ok(session)
    }

    /// Apply one command and return the events it produced.
    pub fn apply(&mut self, command: PlannerCommand) -> PlanResult<Vec<PlanEvent>> {
        let events = match command {
            PlannerCommand::UpdateConfiguration(update) => self.update_configuration(&update)?,
            PlannerCommand::SetCommand { slot_index, value } => {
                vec![self.set_command(slot_index, value)?]
            }
            PlannerCommand::RecomputeAll => vec![self.recompute_all()],
            PlannerCommand::AutoDistribute => vec![self.auto_distribute()],
            PlannerCommand::ClearCommands { confirmed } => vec![self.clear_commands(confirmed)],
        };
        for event in &events {
            log::debug!("session {}: {}", self.session_id, event.kind());
        }
        self.events.extend(events.iter().cloned());
        Ok(events)
    }

    fn update_configuration(&mut self, update: &ConfigUpdate) -> PlanResult<Vec<PlanEvent>> {
        let capacity = CapacityConfig {
            average_handle_time_minutes: update.average_handle_time,
            daily_call_target:           update.daily_target,
            ..self.capacity.clone()
        };
        // Reject before mutating anything.
        capacity.validate()?;
        if let Some(id) = ShiftId::ALL
            .into_iter()
            .find(|&id| update.headcount(id) > 0 && self.shifts.get(id).is_none())
        {
            return Err(PlanError::InvalidConfig(format!(
                "shift {id} is not defined in this session, cannot staff {} agents",
                update.headcount(id)
            )));
        }
        self.capacity = capacity;

        for id in ShiftId::ALL {
            self.shifts.set_headcount(id, update.headcount(id));
        }
        let headcounts = self.shifts.iter().map(|s| (s.id, s.headcount)).collect();

        self.regenerate_roster();
        log::info!(
            "session {}: configuration updated, aht={} target={} agents={}",
            self.session_id,
            self.capacity.average_handle_time_minutes,
            self.capacity.daily_call_target,
            self.roster.len()
        );

        Ok(vec![
            PlanEvent::ConfigurationUpdated {
                headcounts,
                average_handle_time: self.capacity.average_handle_time_minutes,
                daily_target:        self.capacity.daily_call_target,
            },
            PlanEvent::RosterRegenerated { agent_count: self.roster.len() },
        ])
    }

    fn regenerate_roster(&mut self) {
        self.roster = Roster::generate(&self.shifts);
        self.totals = SlotTotals::zeroed(self.schedule.len());
    }

    fn set_command(&mut self, slot_index: SlotIndex, value: u32) -> PlanResult<PlanEvent> {
        self.commands.set(slot_index, value)?;
        let label = self
            .schedule
            .get(slot_index)
            .map(|s| s.label.clone())
            .ok_or(PlanError::SlotOutOfRange {
                index:      slot_index,
                slot_count: self.schedule.len(),
            })?;
        log::debug!("slot {label}: command set to {value}");
        self.warn_over_capacity(slot_index);
        Ok(PlanEvent::CommandSet { slot_index, label, value })
    }

    fn recompute_all(&mut self) -> PlanEvent {
        self.totals = allocation::recompute_all(
            &self.schedule,
            &self.commands,
            &mut self.roster,
            &self.shifts,
            self.overlap_rule,
        );
        let unstaffed_command = (0..self.schedule.len())
            .filter(|&i| self.agents_present(i) == 0)
            .map(|i| self.commands.get(i) as u64)
            .sum();
        for index in 0..self.schedule.len() {
            self.warn_over_capacity(index);
        }
        PlanEvent::AllocationCompleted {
            allocated_total: self.totals.grand_total(),
            unstaffed_command,
        }
    }

    fn auto_distribute(&mut self) -> PlanEvent {
        self.commands = allocation::auto_distribute(
            &self.schedule,
            &self.shifts,
            &self.capacity,
            self.overlap_rule,
        );
        let seeded_total = self.commands.total();
        log::debug!(
            "auto-distribute: seeded {seeded_total} calls for target {}",
            self.capacity.daily_call_target
        );
        PlanEvent::CommandsAutoDistributed {
            daily_target: self.capacity.daily_call_target,
            seeded_total,
        }
    }

    fn warn_over_capacity(&self, slot_index: SlotIndex) {
        let (command, capacity) = (self.commands.get(slot_index), self.capacity(slot_index));
        if command > capacity {
            let label = self.schedule.get(slot_index).map_or("?", |s| s.label.as_str());
            log::warn!("slot {label}: command {command} exceeds capacity {capacity}");
        }
    }

    fn clear_commands(&mut self, confirmed: bool) -> PlanEvent {
        if !confirmed {
            log::warn!("session {}: clear commands declined", self.session_id);
            return PlanEvent::ClearDeclined;
        }
        self.commands.clear();
        PlanEvent::CommandsCleared
    }

    // ── Queries ───────────────────────────────────────────────────

    pub fn agents_present(&self, slot_index: SlotIndex) -> u32 {
        self.schedule
            .get(slot_index)
            .map_or(0, |slot| agents_present(slot, &self.shifts, self.overlap_rule))
    }

    pub fn capacity(&self, slot_index: SlotIndex) -> u32 {
        self.capacity.capacity_for(self.agents_present(slot_index))
    }

    /// Slots whose command exceeds capacity, in schedule order.
    pub fn over_capacity_slots(&self) -> Vec<SlotIndex> {
        (0..self.schedule.len())
            .filter(|&i| self.commands.get(i) > self.capacity(i))
            .collect()
    }

    pub fn capacity_config(&self) -> &CapacityConfig { &self.capacity }
    pub fn overlap_rule(&self) -> OverlapRule { self.overlap_rule }
    pub fn shifts(&self) -> &ShiftRegistry { &self.shifts }
    pub fn schedule(&self) -> &SlotSchedule { &self.schedule }
    pub fn roster(&self) -> &Roster { &self.roster }
    pub fn commands(&self) -> &SlotCommands { &self.commands }
    pub fn totals(&self) -> &SlotTotals { &self.totals }
    pub fn events(&self) -> &[PlanEvent] { &self.events }

    /// All outbound tables as of today.
    pub fn snapshot(&self) -> PlanSnapshot {
        self.snapshot_on(chrono::Local::now().date_naive())
    }

    pub fn snapshot_on(&self, plan_date: NaiveDate) -> PlanSnapshot {
        PlanSnapshot {
            session_id:    self.session_id.clone(),
            slots:         report::slot_summary(
                &self.schedule,
                &self.shifts,
                &self.capacity,
                self.overlap_rule,
                &self.commands,
            ),
            agents:        report::agent_summary(&self.roster, &self.capacity),
            matrix:        report::agent_slot_matrix(
                &self.schedule,
                &self.roster,
                &self.shifts,
                self.overlap_rule,
                &self.totals,
            ),
            configuration: report::configuration_summary(plan_date, &self.shifts, &self.capacity),
        }
    }
}
