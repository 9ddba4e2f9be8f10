use crate::model::{BookingId, DayLoad, ProjectId, ResourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed, missing, or ordering-violating input. Caught before any
    /// side effect.
    Validation(String),
    ResourceNotFound(ResourceId),
    ProjectNotFound(ProjectId),
    BookingNotFound(BookingId),
    /// Admitting the candidate would overbook at least one working day.
    /// Carries the full overbooked-day breakdown so callers can render
    /// exactly which days and by how much.
    Conflict {
        capacity_per_day: f64,
        days: Vec<DayLoad>,
    },
    LimitExceeded(&'static str),
    /// Store corruption or other faults outside the domain taxonomy.
    Internal(String),
}

impl EngineError {
    /// HTTP status for each error class at a serving boundary.
    pub fn status(&self) -> u16 {
        match self {
            EngineError::Validation(_) | EngineError::LimitExceeded(_) => 400,
            EngineError::ResourceNotFound(_)
            | EngineError::ProjectNotFound(_)
            | EngineError::BookingNotFound(_) => 404,
            EngineError::Conflict { .. } => 409,
            EngineError::Internal(_) => 500,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation failed: {msg}"),
            EngineError::ResourceNotFound(id) => write!(f, "resource not found: {id}"),
            EngineError::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::Conflict {
                capacity_per_day,
                days,
            } => {
                write!(
                    f,
                    "capacity {capacity_per_day} exceeded on {} day(s):",
                    days.len()
                )?;
                for day in days {
                    write!(f, " {} ({}h)", day.date, day.total_hours)?;
                }
                Ok(())
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
