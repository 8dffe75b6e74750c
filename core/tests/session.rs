//! Planning session tests: command flow, events, regeneration and
//! snapshot consistency.

use staffing_core::{
    command::PlannerCommand,
    config::{ConfigUpdate, PlannerConfig, RawConfigInput},
    error::PlanError,
    event::PlanEvent,
    presence::OverlapRule,
    session::PlanningSession,
    shift::{ShiftDefinition, ShiftId},
};

const LUNCH: usize = 8;

fn build(session_id: &str) -> PlanningSession {
    PlanningSession::with_id(session_id.to_string(), PlannerConfig::default())
        .expect("build reference session")
}

fn update(a: u32, b: u32, c: u32) -> ConfigUpdate {
    ConfigUpdate {
        shift_a_count:       a,
        shift_b_count:       b,
        shift_c_count:       c,
        average_handle_time: 10.0,
        daily_target:        700,
    }
}

#[test]
fn session_starts_with_zero_commands_and_full_roster() {
    let session = build("start");
    assert_eq!(session.roster().len(), 80);
    assert_eq!(session.commands().total(), 0);
    assert_eq!(session.totals().grand_total(), 0);
    assert!(matches!(
        session.events().first(),
        Some(PlanEvent::SessionStarted { slot_count: 20, .. })
    ));
}

#[test]
fn new_sessions_get_distinct_ids() {
    let a = PlanningSession::new(PlannerConfig::default()).unwrap();
    let b = PlanningSession::new(PlannerConfig::default()).unwrap();
    assert_ne!(a.session_id, b.session_id);
}

#[test]
fn set_command_then_recompute_allocates() {
    let mut session = build("set-recompute");
    let events = session
        .apply(PlannerCommand::SetCommand { slot_index: LUNCH, value: 204 })
        .unwrap();
    assert_eq!(
        events,
        vec![PlanEvent::CommandSet { slot_index: LUNCH, label: "12h30-13h00".into(), value: 204 }]
    );
    // Setting a command alone does not allocate.
    assert_eq!(session.totals().grand_total(), 0);

    let events = session.apply(PlannerCommand::RecomputeAll).unwrap();
    assert_eq!(
        events,
        vec![PlanEvent::AllocationCompleted { allocated_total: 204, unstaffed_command: 0 }]
    );
    assert_eq!(session.totals().get(LUNCH), 204);
    assert_eq!(session.capacity(LUNCH), 204);
    assert_eq!(session.agents_present(LUNCH), 80);
}

#[test]
fn out_of_range_slot_is_an_error() {
    let mut session = build("out-of-range");
    let err = session
        .apply(PlannerCommand::SetCommand { slot_index: 20, value: 1 })
        .unwrap_err();
    assert!(
        matches!(err, PlanError::SlotOutOfRange { index: 20, slot_count: 20 }),
        "got {err:?}"
    );
}

#[test]
fn configuration_update_regenerates_roster_and_discards_history() {
    let mut session = build("regen");
    session.apply(PlannerCommand::AutoDistribute).unwrap();
    session.apply(PlannerCommand::RecomputeAll).unwrap();
    assert!(session.roster().total_calls() > 0);

    let events = session
        .apply(PlannerCommand::UpdateConfiguration(update(10, 0, 5)))
        .unwrap();

    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], PlanEvent::RosterRegenerated { agent_count: 15 }));
    assert_eq!(session.roster().len(), 15);
    assert_eq!(session.roster().total_calls(), 0, "call history must be discarded");
    assert_eq!(session.totals().grand_total(), 0);
    // Commands are independent input and survive regeneration.
    assert!(session.commands().total() > 0);
    assert_eq!(session.roster().agents()[10].id, "C011");
}

#[test]
fn invalid_handle_time_is_rejected_without_mutation() {
    let mut session = build("bad-aht");
    let mut bad = update(1, 1, 1);
    bad.average_handle_time = 0.0;
    assert!(session.apply(PlannerCommand::UpdateConfiguration(bad)).is_err());
    assert_eq!(session.roster().len(), 80, "roster must be untouched");
    assert_eq!(session.capacity_config().average_handle_time_minutes, 10.0);
}

#[test]
fn coerced_raw_input_drives_update() {
    let mut session = build("raw");
    let raw = RawConfigInput {
        shift_a_count:       Some("5".into()),
        shift_b_count:       Some("oops".into()),
        shift_c_count:       Some("3".into()),
        average_handle_time: Some("".into()),
        daily_target:        None,
    };
    session.apply(PlannerCommand::UpdateConfiguration(raw.coerce())).unwrap();
    assert_eq!(session.shifts().headcount(ShiftId::A), 5);
    assert_eq!(session.shifts().headcount(ShiftId::B), 0);
    assert_eq!(session.capacity_config().average_handle_time_minutes, 10.0);
    assert_eq!(session.capacity_config().daily_call_target, 700);
}

#[test]
fn clear_requires_confirmation() {
    let mut session = build("clear");
    session.apply(PlannerCommand::AutoDistribute).unwrap();
    let seeded = session.commands().total();

    let events = session.apply(PlannerCommand::ClearCommands { confirmed: false }).unwrap();
    assert_eq!(events, vec![PlanEvent::ClearDeclined]);
    assert_eq!(session.commands().total(), seeded);

    let events = session.apply(PlannerCommand::ClearCommands { confirmed: true }).unwrap();
    assert_eq!(events, vec![PlanEvent::CommandsCleared]);
    assert_eq!(session.commands().total(), 0);
}

#[test]
fn auto_distribute_does_not_touch_agents() {
    let mut session = build("auto");
    session.apply(PlannerCommand::AutoDistribute).unwrap();
    assert_eq!(session.roster().total_calls(), 0);
    assert_eq!(session.commands().get(LUNCH), 700);
}

#[test]
fn recompute_all_is_idempotent() {
    let mut session = build("idempotent");
    session.apply(PlannerCommand::AutoDistribute).unwrap();
    session.apply(PlannerCommand::RecomputeAll).unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let first = session.snapshot_on(date);
    session.apply(PlannerCommand::RecomputeAll).unwrap();
    let second = session.snapshot_on(date);
    assert_eq!(first, second);
}

#[test]
fn unstaffed_command_is_reported() {
    let config = PlannerConfig {
        shifts: vec![ShiftDefinition {
            id: ShiftId::B, start_hour: 11.0, end_hour: 19.0,
            paid_hours: 8.0, break_hours: 1.5, headcount: 4,
        }],
        ..PlannerConfig::default()
    };
    let mut session = PlanningSession::with_id("unstaffed".into(), config).unwrap();
    session.apply(PlannerCommand::SetCommand { slot_index: 0, value: 30 }).unwrap();
    session.apply(PlannerCommand::SetCommand { slot_index: 6, value: 9 }).unwrap();

    let events = session.apply(PlannerCommand::RecomputeAll).unwrap();
    assert_eq!(
        events,
        vec![PlanEvent::AllocationCompleted { allocated_total: 9, unstaffed_command: 30 }]
    );
}

#[test]
fn matrix_agrees_with_presence_under_bidirectional_rule() {
    let config = PlannerConfig {
        shifts: vec![ShiftDefinition {
            id: ShiftId::A, start_hour: 9.25, end_hour: 17.5,
            paid_hours: 8.25, break_hours: 1.0, headcount: 6,
        }],
        overlap_rule: OverlapRule::Bidirectional,
        ..PlannerConfig::default()
    };
    let mut session = PlanningSession::with_id("bidir".into(), config).unwrap();
    session.apply(PlannerCommand::SetCommand { slot_index: 1, value: 13 }).unwrap();
    session.apply(PlannerCommand::RecomputeAll).unwrap();

    assert_eq!(session.agents_present(1), 6, "9h00 slot overlaps a 9h15 start");
    assert_eq!(session.totals().get(1), 13);
    let snapshot = session.snapshot();
    let column: u32 = snapshot.matrix.rows.iter().map(|r| r.cells[1].calls()).sum();
    assert_eq!(column, 13);
}

#[test]
fn commands_round_trip_through_json() {
    let json = r#"{"cmd":"set_command","slot_index":3,"value":12}"#;
    let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
    assert_eq!(cmd, PlannerCommand::SetCommand { slot_index: 3, value: 12 });

    let json = r#"{"cmd":"clear_commands"}"#;
    let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
    assert_eq!(cmd, PlannerCommand::ClearCommands { confirmed: false });

    let json = r#"{"cmd":"update_configuration","shift_a_count":1,"shift_b_count":2,
                   "shift_c_count":3,"average_handle_time":8.0,"daily_target":90}"#;
    let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
    assert_eq!(cmd, PlannerCommand::UpdateConfiguration(ConfigUpdate {
        shift_a_count: 1, shift_b_count: 2, shift_c_count: 3,
        average_handle_time: 8.0, daily_target: 90,
    }));
}

#[test]
fn headcount_for_undefined_shift_is_rejected_without_mutation() {
    let config = PlannerConfig {
        shifts: vec![ShiftDefinition {
            id: ShiftId::A, start_hour: 8.5, end_hour: 17.5,
            paid_hours: 9.0, break_hours: 1.5, headcount: 3,
        }],
        ..PlannerConfig::default()
    };
    let mut session = PlanningSession::with_id("only-a".into(), config).unwrap();

    let result = session.apply(PlannerCommand::UpdateConfiguration(update(2, 40, 40)));
    assert!(matches!(result, Err(PlanError::InvalidConfig(_))));
    assert_eq!(session.roster().len(), 3, "roster must be untouched");
    assert_eq!(session.shifts().headcount(ShiftId::A), 3);

    // Zero for an undefined shift is not a staffing request.
    session.apply(PlannerCommand::UpdateConfiguration(update(2, 0, 0))).unwrap();
    assert_eq!(session.roster().len(), 2);
}

#[test]
fn over_capacity_slots_track_commands() {
    let mut session = build("over-capacity");
    assert!(session.over_capacity_slots().is_empty());

    // Lunch capacity is 204; 8h30 capacity is 63.
    session.apply(PlannerCommand::SetCommand { slot_index: LUNCH, value: 205 }).unwrap();
    session.apply(PlannerCommand::SetCommand { slot_index: 0, value: 63 }).unwrap();
    assert_eq!(session.over_capacity_slots(), vec![LUNCH]);

    // Reading a snapshot reports the same slots without changing anything.
    let snapshot = session.snapshot();
    let over: Vec<usize> = snapshot.slots.rows.iter().enumerate()
        .filter(|(_, r)| r.difference < 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(over, session.over_capacity_slots());
}
