use crate::{
    capacity::CapacityConfig,
    error::{PlanError, PlanResult},
    presence::OverlapRule,
    shift::{ShiftDefinition, ShiftId, ShiftRegistry},
    time_slot::SlotSchedule,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::Path};

// ── Boundary defaults ─────────────────────────────────────────────
// Applied by `RawConfigInput::coerce` when a field is missing or invalid.

pub const DEFAULT_HEADCOUNT: u32 = 0;
pub const DEFAULT_AHT_MINUTES: f64 = 10.0;
pub const DEFAULT_DAILY_TARGET: u32 = 700;

/// Full planner configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub shifts:       Vec<ShiftDefinition>,
    pub capacity:     CapacityConfig,
    #[serde(default)]
    pub overlap_rule: OverlapRule,
    /// Slot labels; the standard 8h30–18h30 day when absent.
    #[serde(default)]
    pub slots:        Option<Vec<String>>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            shifts:       ShiftRegistry::reference().iter().cloned().collect(),
            capacity:     CapacityConfig::default(),
            overlap_rule: OverlapRule::default(),
            slots:        None,
        }
    }
}

impl PlannerConfig {
    /// Load and validate a JSON planner configuration.
    /// In tests, use PlannerConfig::default().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: PlannerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        log::info!(
            "config loaded from {}: {} shifts, rule={:?}",
            path.display(),
            config.shifts.len(),
            config.overlap_rule
        );
        Ok(config)
    }

    pub fn validate(&self) -> PlanResult<()> {
        self.capacity.validate()?;
        if self.shifts.is_empty() {
            return Err(PlanError::InvalidConfig("at least one shift is required".into()));
        }
        let mut seen = BTreeSet::new();
        for shift in &self.shifts {
            if !seen.insert(shift.id) {
                return Err(PlanError::InvalidConfig(format!("shift {} defined twice", shift.id)));
            }
            if shift.start_hour >= shift.end_hour {
                return Err(PlanError::InvalidConfig(format!(
                    "shift {} starts at {} but ends at {}",
                    shift.id, shift.start_hour, shift.end_hour
                )));
            }
            if shift.break_hours < 0.0 || shift.break_hours > shift.paid_hours {
                return Err(PlanError::InvalidConfig(format!(
                    "shift {} break of {}h exceeds {} paid hours",
                    shift.id, shift.break_hours, shift.paid_hours
                )));
            }
        }
        self.schedule().map(|_| ())
    }

    pub fn shift_registry(&self) -> ShiftRegistry {
        ShiftRegistry::new(self.shifts.iter().cloned())
    }

    pub fn schedule(&self) -> PlanResult<SlotSchedule> {
        match &self.slots {
            Some(labels) => SlotSchedule::from_labels(labels.as_slice()),
            None => Ok(SlotSchedule::standard_day()),
        }
    }
}

/// Validated configuration update, ready for the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub shift_a_count:       u32,
    pub shift_b_count:       u32,
    pub shift_c_count:       u32,
    pub average_handle_time: f64,
    pub daily_target:        u32,
}

impl ConfigUpdate {
    pub fn headcount(&self, id: ShiftId) -> u32 {
        match id {
            ShiftId::A => self.shift_a_count,
            ShiftId::B => self.shift_b_count,
            ShiftId::C => self.shift_c_count,
        }
    }
}

/// Configuration form input as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfigInput {
    pub shift_a_count:       Option<String>,
    pub shift_b_count:       Option<String>,
    pub shift_c_count:       Option<String>,
    pub average_handle_time: Option<String>,
    pub daily_target:        Option<String>,
}

impl RawConfigInput {
    /// Apply the documented default table to every invalid field.
    ///
    /// | field          | accepted            | default |
    /// |----------------|---------------------|---------|
    /// | shift counts   | integer >= 0        | 0       |
    /// | handle time    | finite number > 0   | 10      |
    /// | daily target   | integer >= 0        | 700     |
    pub fn coerce(&self) -> ConfigUpdate {
        let count = |raw: &Option<String>| {
            coerce_non_negative(raw.as_deref()).unwrap_or(DEFAULT_HEADCOUNT)
        };
        let aht = self
            .average_handle_time
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_AHT_MINUTES);
        ConfigUpdate {
            shift_a_count:       count(&self.shift_a_count),
            shift_b_count:       count(&self.shift_b_count),
            shift_c_count:       count(&self.shift_c_count),
            average_handle_time: aht,
            daily_target:        coerce_non_negative(self.daily_target.as_deref())
                .unwrap_or(DEFAULT_DAILY_TARGET),
        }
    }
}

/// Manual slot entry: anything unparsable or negative becomes 0.
pub fn parse_command_value(raw: &str) -> u32 {
    coerce_non_negative(Some(raw)).unwrap_or(0)
}

fn coerce_non_negative(raw: Option<&str>) -> Option<u32> {
    parse_leading_int(raw?)
        .filter(|v| *v >= 0)
        .map(|v| v.min(u32::MAX as i64) as u32)
}

/// Integer prefix of `raw` (`"12.7"` -> 12, `" 40 agents"` -> 40).
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}
