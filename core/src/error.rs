use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid slot label '{label}': {reason}")]
    InvalidSlotLabel { label: String, reason: String },

    #[error("Invalid slot schedule: {0}")]
    InvalidSchedule(String),

    #[error("Slot index {index} out of range (slot count {slot_count})")]
    SlotOutOfRange { index: usize, slot_count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
