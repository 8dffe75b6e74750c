//! Shared primitive types used across the whole planner.

/// Position of a slot in the day's schedule, 0-based.
pub type SlotIndex = usize;

/// A stable agent identifier, shift-prefixed (`"A001"`).
pub type AgentId = String;

/// The canonical planning session identifier.
pub type SessionId = String;
