//! staffing-core: per-slot staffing, capacity and call allocation for a
//! call-center shift roster.
//!
//! Leaves first: time_slot -> shift -> presence -> capacity -> roster
//! -> allocation -> report, and session ties them together.

pub mod allocation;
pub mod capacity;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod presence;
pub mod report;
pub mod roster;
pub mod session;
pub mod shift;
pub mod snapshot;
pub mod time_slot;
pub mod types;
