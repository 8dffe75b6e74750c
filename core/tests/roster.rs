//! Agent roster generation tests.

use staffing_core::{
    presence::OverlapRule,
    roster::Roster,
    shift::{ShiftId, ShiftRegistry},
    time_slot::TimeSlot,
};

#[test]
fn ids_are_sequential_across_shifts() {
    let roster = Roster::generate(&ShiftRegistry::reference());
    let ids: Vec<&str> = roster.agents().iter().map(|a| a.id.as_str()).collect();

    assert_eq!(roster.len(), 80);
    assert_eq!(ids[0], "A001");
    assert_eq!(ids[24], "A025");
    assert_eq!(ids[25], "B026", "sequence must not reset per shift");
    assert_eq!(ids[49], "B050");
    assert_eq!(ids[50], "C051");
    assert_eq!(ids[79], "C080");
}

#[test]
fn working_hours_exclude_break() {
    let roster = Roster::generate(&ShiftRegistry::reference());
    assert_eq!(roster.get("A001").unwrap().working_hours, 7.5);
    assert_eq!(roster.get("B026").unwrap().working_hours, 6.5);
    assert_eq!(roster.get("C051").unwrap().working_hours, 8.5);
}

#[test]
fn generation_is_idempotent() {
    let shifts = ShiftRegistry::reference();
    assert_eq!(Roster::generate(&shifts), Roster::generate(&shifts));
}

#[test]
fn fresh_agents_have_no_calls() {
    let roster = Roster::generate(&ShiftRegistry::reference());
    assert!(roster.agents().iter().all(|a| a.calls_treated == 0 && a.calls_by_slot.is_empty()));
    assert_eq!(roster.total_calls(), 0);
}

#[test]
fn empty_shift_is_skipped() {
    let mut shifts = ShiftRegistry::reference();
    shifts.set_headcount(ShiftId::A, 0);
    shifts.set_headcount(ShiftId::B, 2);
    shifts.set_headcount(ShiftId::C, 1);
    let ids: Vec<String> = Roster::generate(&shifts).agents().iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec!["B001", "B002", "C003"]);
}

#[test]
fn present_positions_follow_roster_order() {
    let shifts = ShiftRegistry::reference();
    let roster = Roster::generate(&shifts);
    let slot = TimeSlot::parse("9h00-9h30").unwrap();
    let present = roster.present_in(&slot, &shifts, OverlapRule::HalfOpen);

    assert_eq!(present.len(), 55, "A + C on duty at 9h00");
    assert!(present.windows(2).all(|w| w[0] < w[1]), "positions must be ascending");
    assert_eq!(roster.agents()[present[25]].id, "C051", "C follows A with B skipped");
}

#[test]
fn productivity_is_zero_without_hours() {
    let mut shifts = ShiftRegistry::reference();
    shifts.set_headcount(ShiftId::B, 0);
    shifts.set_headcount(ShiftId::C, 0);
    let roster = Roster::generate(&shifts);
    let mut agent = roster.agents()[0].clone();
    agent.calls_treated = 10;
    agent.working_hours = 0.0;
    assert_eq!(agent.productivity(), 0.0);
    agent.working_hours = 7.5;
    assert_eq!(agent.productivity(), 1.3);
}
