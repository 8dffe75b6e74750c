//! Time slot model: the fixed, ordered sequence of intervals in a workday.
//!
//! Labels take the form `"{H}h{MM}-{H}h{MM}"` (`"12h30-13h00"`).
//! Each endpoint converts to decimal hours as `hours + minutes / 60`.
//!
//! RULES:
//!   - Every slot satisfies `start_hour < end_hour`.
//!   - A schedule is sorted and contiguous: `slot[i].end == slot[i + 1].start`.

use crate::{
    error::{PlanError, PlanResult},
    types::SlotIndex,
};
use serde::{Deserialize, Serialize};

/// Slot granularity used by the capacity formula.
pub const SLOT_DURATION_MINUTES: f64 = 30.0;

/// Reference operating day: 8h30 to 18h30 in half-hour slots.
pub const STANDARD_DAY_LABELS: [&str; 20] = [
    "8h30-9h00", "9h00-9h30", "9h30-10h00", "10h00-10h30",
    "10h30-11h00", "11h00-11h30", "11h30-12h00", "12h00-12h30",
    "12h30-13h00", "13h00-13h30", "13h30-14h00", "14h00-14h30",
    "14h30-15h00", "15h00-15h30", "15h30-16h00", "16h00-16h30",
    "16h30-17h00", "17h00-17h30", "17h30-18h00", "18h00-18h30",
];

const HOUR_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label:      String,
    pub start_hour: f64,
    pub end_hour:   f64,
}

impl TimeSlot {
    /// Parse a `"8h30-9h00"` label into a slot.
    pub fn parse(label: &str) -> PlanResult<Self> {
        let (start, end) = label.split_once('-').ok_or_else(|| PlanError::InvalidSlotLabel {
            label:  label.to_string(),
            reason: "expected '<start>-<end>'".into(),
        })?;
        let start_hour = parse_clock(label, start)?;
        let end_hour = parse_clock(label, end)?;
        if start_hour >= end_hour {
            return Err(PlanError::InvalidSlotLabel {
                label:  label.to_string(),
                reason: "start must be before end".into(),
            });
        }
        Ok(Self { label: label.to_string(), start_hour, end_hour })
    }

    /// Build a slot from decimal hours, deriving the canonical label.
    pub fn from_hours(start_hour: f64, end_hour: f64) -> Self {
        Self {
            label: format!("{}-{}", format_clock(start_hour), format_clock(end_hour)),
            start_hour,
            end_hour,
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        (self.end_hour - self.start_hour) * 60.0
    }

    /// The start endpoint of the label (`"8h30"`), used for compact headers.
    pub fn start_label(&self) -> &str {
        self.label.split('-').next().unwrap_or(&self.label)
    }
}

fn parse_clock(label: &str, clock: &str) -> PlanResult<f64> {
    let invalid = |reason: &str| PlanError::InvalidSlotLabel {
        label:  label.to_string(),
        reason: format!("'{clock}': {reason}"),
    };
    let (hours, minutes) = clock.trim().split_once('h').ok_or_else(|| invalid("missing 'h'"))?;
    let hours: u32 = hours.parse().map_err(|_| invalid("hours are not a number"))?;
    let minutes: u32 = if minutes.is_empty() {
        0
    } else {
        minutes.parse().map_err(|_| invalid("minutes are not a number"))?
    };
    if hours > 24 || minutes >= 60 || (hours == 24 && minutes > 0) {
        return Err(invalid("out of range"));
    }
    Ok(hours as f64 + minutes as f64 / 60.0)
}

fn format_clock(hour: f64) -> String {
    let total_minutes = (hour * 60.0).round() as u32;
    format!("{}h{:02}", total_minutes / 60, total_minutes % 60)
}

/// The ordered slots of one operating day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSchedule {
    slots: Vec<TimeSlot>,
}

impl SlotSchedule {
    pub fn standard_day() -> Self {
        let slots = (0..STANDARD_DAY_LABELS.len())
            .map(|i| {
                let start = 8.5 + i as f64 * 0.5;
                TimeSlot::from_hours(start, start + 0.5)
            })
            .collect();
        Self { slots }
    }

    /// Build a schedule from labels, enforcing order and contiguity.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> PlanResult<Self> {
        let slots = labels
            .iter()
            .map(|l| TimeSlot::parse(l.as_ref()))
            .collect::<PlanResult<Vec<_>>>()?;
        Self::from_slots(slots)
    }

    /// Contiguous grid of half-hour slots covering `[open, close)`.
    pub fn half_hour_grid(open: f64, close: f64) -> PlanResult<Self> {
        let on_grid = |h: f64| ((h * 2.0).round() - h * 2.0).abs() < HOUR_EPSILON;
        if !on_grid(open) || !on_grid(close) || open >= close || close > 24.0 || open < 0.0 {
            return Err(PlanError::InvalidSchedule(format!(
                "grid bounds {open}..{close} must be ordered multiples of 0.5 within the day"
            )));
        }
        let steps = ((close - open) * 2.0).round() as usize;
        let slots = (0..steps)
            .map(|i| {
                let start = open + i as f64 * 0.5;
                TimeSlot::from_hours(start, start + 0.5)
            })
            .collect();
        Self::from_slots(slots)
    }

    fn from_slots(slots: Vec<TimeSlot>) -> PlanResult<Self> {
        if slots.is_empty() {
            return Err(PlanError::InvalidSchedule("schedule has no slots".into()));
        }
        for pair in slots.windows(2) {
            if (pair[0].end_hour - pair[1].start_hour).abs() > HOUR_EPSILON {
                return Err(PlanError::InvalidSchedule(format!(
                    "'{}' is not followed contiguously by '{}'",
                    pair[0].label, pair[1].label
                )));
            }
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: SlotIndex) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.label.clone()).collect()
    }
}

impl Default for SlotSchedule {
    fn default() -> Self { Self::standard_day() }
}
