//! Shift registry: named schedules and their configurable headcounts.
//!
//! Start, end, paid hours and break are fixed schedule parameters.
//! Headcount is the only field mutated after initialization.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Shift identifiers in their fixed enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftId {
    A,
    B,
    C,
}

impl ShiftId {
    pub const ALL: [ShiftId; 3] = [ShiftId::A, ShiftId::B, ShiftId::C];

    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub id:          ShiftId,
    pub start_hour:  f64,
    pub end_hour:    f64,
    pub paid_hours:  f64,
    pub break_hours: f64,
    pub headcount:   u32,
}

impl ShiftDefinition {
    /// Productive hours per agent: paid time minus break.
    pub fn working_hours(&self) -> f64 {
        (self.paid_hours - self.break_hours).max(0.0)
    }
}

/// All shift definitions of a session, iterated in `ShiftId` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRegistry {
    shifts: BTreeMap<ShiftId, ShiftDefinition>,
}

impl ShiftRegistry {
    pub fn new(definitions: impl IntoIterator<Item = ShiftDefinition>) -> Self {
        Self {
            shifts: definitions.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// A 8h30–17h30 (25), B 11h–19h (25), C 9h–19h (30).
    pub fn reference() -> Self {
        Self::new([
            ShiftDefinition {
                id: ShiftId::A, start_hour: 8.5, end_hour: 17.5,
                paid_hours: 9.0, break_hours: 1.5, headcount: 25,
            },
            ShiftDefinition {
                id: ShiftId::B, start_hour: 11.0, end_hour: 19.0,
                paid_hours: 8.0, break_hours: 1.5, headcount: 25,
            },
            ShiftDefinition {
                id: ShiftId::C, start_hour: 9.0, end_hour: 19.0,
                paid_hours: 10.0, break_hours: 1.5, headcount: 30,
            },
        ])
    }

    pub fn get(&self, id: ShiftId) -> Option<&ShiftDefinition> {
        self.shifts.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftDefinition> {
        self.shifts.values()
    }

    /// Returns false when the shift is not registered.
    pub fn set_headcount(&mut self, id: ShiftId, headcount: u32) -> bool {
        match self.shifts.get_mut(&id) {
            Some(shift) => {
                shift.headcount = headcount;
                true
            }
            None => false,
        }
    }

    pub fn headcount(&self, id: ShiftId) -> u32 {
        self.get(id).map_or(0, |s| s.headcount)
    }

    pub fn total_headcount(&self) -> u32 {
        self.iter().map(|s| s.headcount).sum()
    }
}

impl Default for ShiftRegistry {
    fn default() -> Self { Self::reference() }
}
