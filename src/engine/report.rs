use crate::calendar;
use crate::model::*;

use super::{Engine, EngineError};

/// Working days assumed for a report when no period is given.
const DEFAULT_PERIOD_WORKING_DAYS: u32 = 30;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Aggregate a ledger's committed bookings into a utilization report.
///
/// Each retained booking contributes `daily_hours` times the working days of
/// its own full range, not the intersection with the period. A booking only
/// partially inside the period therefore over-contributes; tests pin this so
/// switching to intersection accounting is a visible change.
fn build_report(
    resource: &Resource,
    ledger: &ResourceLedger,
    period: Option<DateRange>,
) -> UtilizationReport {
    let mut booked_hours = 0.0;
    for booking in &ledger.bookings {
        let retained = match &period {
            Some(p) => booking.range().overlaps(p),
            None => true,
        };
        if retained {
            let span_days =
                calendar::working_days_between(booking.start_date, booking.end_date);
            booked_hours += booking.daily_hours * span_days as f64;
        }
    }

    let period_working_days = match &period {
        Some(p) => p.working_day_count(),
        None => DEFAULT_PERIOD_WORKING_DAYS,
    };
    let capacity_hours = resource.capacity_per_day * period_working_days as f64;
    let utilization_pct = if capacity_hours > 0.0 {
        round2(booked_hours / capacity_hours * 100.0)
    } else {
        0.0
    };

    UtilizationReport {
        resource_id: resource.id,
        resource_name: resource.name.clone(),
        capacity_per_day: resource.capacity_per_day,
        period_working_days,
        booked_hours,
        capacity_hours,
        utilization_pct,
        available_hours: capacity_hours - booked_hours,
    }
}

impl Engine {
    pub async fn utilization(
        &self,
        resource_id: ResourceId,
        period: Option<DateRange>,
    ) -> Result<UtilizationReport, EngineError> {
        let resource = self
            .directory
            .resource(resource_id)
            .ok_or(EngineError::ResourceNotFound(resource_id))?;
        let ledger = self
            .ledger(resource_id)
            .ok_or(EngineError::ResourceNotFound(resource_id))?;
        let guard = ledger.read().await;
        Ok(build_report(&resource, &guard, period))
    }

    /// One report per directory resource, ordered by resource id. The
    /// default-30-working-day fallback applies per resource independently.
    pub async fn utilization_all(&self, period: Option<DateRange>) -> Vec<UtilizationReport> {
        let mut out = Vec::new();
        for resource in self.directory.resources() {
            let Some(ledger) = self.ledger(resource.id) else {
                continue;
            };
            let guard = ledger.read().await;
            out.push(build_report(&resource, &guard, period));
        }
        out
    }
}
