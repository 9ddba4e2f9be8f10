use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::limits::*;
use crate::model::*;

use super::{Engine, EngineError, SharedLedger, capacity};

/// Listing filter: by resource, by date-range overlap, or both.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub resource_id: Option<ResourceId>,
    pub range: Option<DateRange>,
}

impl Engine {
    pub fn list_resources(&self) -> Vec<Resource> {
        self.directory.resources()
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.directory.projects()
    }

    pub async fn get_booking(&self, id: BookingId) -> Option<Booking> {
        let resource_id = self.resource_for_booking(id)?;
        let ledger = self.ledger(resource_id)?;
        let guard = ledger.read().await;
        guard.get(id).cloned()
    }

    /// Committed bookings matching the filter, ordered by booking id.
    pub async fn list_bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        let ledgers: Vec<SharedLedger> = match filter.resource_id {
            Some(resource_id) => self.ledger(resource_id).into_iter().collect(),
            None => self.ledgers.iter().map(|e| e.value().clone()).collect(),
        };

        let mut out = Vec::new();
        for ledger in ledgers {
            let guard = ledger.read().await;
            match &filter.range {
                Some(range) => out.extend(guard.overlapping(range).cloned()),
                None => out.extend(guard.bookings.iter().cloned()),
            }
        }
        out.sort_by_key(|b| b.id);
        out
    }

    /// Standalone pre-flight capacity check: same day-walk as admission, no
    /// side effect. An inverted range walks no days and comes back clean.
    pub async fn check_capacity(
        &self,
        resource_id: ResourceId,
        start: NaiveDate,
        end: NaiveDate,
        daily_hours: f64,
    ) -> Result<CapacityPreview, EngineError> {
        if !daily_hours.is_finite() {
            return Err(EngineError::Validation(
                "daily hours must be a finite number".into(),
            ));
        }
        let ledger = self
            .ledger(resource_id)
            .ok_or(EngineError::ResourceNotFound(resource_id))?;
        if start > end {
            return Ok(capacity::preview(Vec::new()));
        }
        let range = DateRange::new(start, end);
        if range.num_days() > MAX_QUERY_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("query window too wide"));
        }
        let guard = ledger.read().await;
        Ok(capacity::preview(capacity::day_loads(
            &guard,
            &range,
            daily_hours,
            None,
        )))
    }
}
