use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allocation::{self, AllocationError};
use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::{Engine, EngineError, capacity};

/// Booking creation input. Every admission-relevant field is optional so a
/// missing field surfaces as a `Validation` error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    pub resource_id: Option<ResourceId>,
    pub project_id: Option<ProjectId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub allocation_method: Option<AllocationMethod>,
    pub allocation_value: Option<f64>,
    pub kind: Option<BookingType>,
}

/// Partial update. Fields left `None` keep their stored value; the merged
/// candidate is re-validated and re-checked wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingPatch {
    pub resource_id: Option<ResourceId>,
    pub project_id: Option<ProjectId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub allocation_method: Option<AllocationMethod>,
    pub allocation_value: Option<f64>,
    pub kind: Option<BookingType>,
}

/// A fully validated, normalized booking candidate. Everything except the id
/// and timestamps.
struct Candidate {
    resource_id: ResourceId,
    project_id: ProjectId,
    range: DateRange,
    allocation_method: AllocationMethod,
    allocation_value: f64,
    daily_hours: f64,
    kind: BookingType,
}

impl Candidate {
    fn into_booking(self, id: BookingId, created_at: chrono::DateTime<Utc>) -> Booking {
        Booking {
            id,
            resource_id: self.resource_id,
            project_id: self.project_id,
            start_date: self.range.start,
            end_date: self.range.end,
            allocation_method: self.allocation_method,
            allocation_value: self.allocation_value,
            daily_hours: self.daily_hours,
            kind: self.kind,
            created_at,
            updated_at: Utc::now(),
        }
    }
}

fn require<T>(field: Option<T>, name: &str) -> Result<T, EngineError> {
    field.ok_or_else(|| EngineError::Validation(format!("{name} is required")))
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, EngineError> {
    if start >= end {
        return Err(EngineError::Validation(
            "end date must be after start date".into(),
        ));
    }
    let range = DateRange::new(start, end);
    if range.num_days() > MAX_RANGE_DAYS {
        return Err(EngineError::LimitExceeded("booking range too wide"));
    }
    Ok(range)
}

fn normalized_daily_hours(
    method: AllocationMethod,
    value: f64,
    range: &DateRange,
) -> Result<f64, EngineError> {
    let working_days = range.working_day_count();
    let daily = allocation::daily_hours(method, value, working_days).map_err(|e| match e {
        AllocationError::NoWorkingDays => {
            EngineError::Validation("booking range contains no working days".into())
        }
    })?;
    if !daily.is_finite() || daily <= 0.0 {
        return Err(EngineError::Validation(
            "daily hours must be greater than 0".into(),
        ));
    }
    Ok(daily)
}

impl Engine {
    /// Validate both directory references and normalize the allocation,
    /// producing a complete candidate or the first failing check's error.
    fn build_candidate(
        &self,
        resource_id: ResourceId,
        project_id: ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        method: AllocationMethod,
        value: f64,
        kind: BookingType,
    ) -> Result<Candidate, EngineError> {
        let range = validate_range(start, end)?;
        if self.directory.resource(resource_id).is_none() {
            return Err(EngineError::ResourceNotFound(resource_id));
        }
        if self.directory.project(project_id).is_none() {
            return Err(EngineError::ProjectNotFound(project_id));
        }
        let daily_hours = normalized_daily_hours(method, value, &range)?;
        Ok(Candidate {
            resource_id,
            project_id,
            range,
            allocation_method: method,
            allocation_value: value,
            daily_hours,
            kind,
        })
    }

    /// Reject the candidate if any working day in its range would exceed the
    /// resource's capacity. Caller holds the ledger write guard: the check
    /// and the subsequent commit are one critical section.
    fn admit(
        ledger: &ResourceLedger,
        candidate: &Candidate,
        exclude: Option<BookingId>,
    ) -> Result<(), EngineError> {
        let days = capacity::day_loads(ledger, &candidate.range, candidate.daily_hours, exclude);
        let overbooked: Vec<DayLoad> = days.into_iter().filter(|d| d.overbooked).collect();
        if overbooked.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Conflict {
                capacity_per_day: ledger.resource.capacity_per_day,
                days: overbooked,
            })
        }
    }

    pub async fn create_booking(&self, req: BookingRequest) -> Result<Booking, EngineError> {
        let started = std::time::Instant::now();
        let result = self.create_booking_inner(req).await;
        metrics::histogram!(observability::ADMISSION_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        match &result {
            Ok(booking) => {
                metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
                metrics::gauge!(observability::BOOKINGS_ACTIVE).increment(1.0);
                info!(
                    booking = booking.id,
                    resource = booking.resource_id,
                    daily_hours = booking.daily_hours,
                    "booking admitted"
                );
            }
            Err(e) => {
                metrics::counter!(
                    observability::ADMISSION_REJECTED_TOTAL,
                    "reason" => observability::error_label(e)
                )
                .increment(1);
                debug!("booking rejected: {e}");
            }
        }
        result
    }

    async fn create_booking_inner(&self, req: BookingRequest) -> Result<Booking, EngineError> {
        let resource_id = require(req.resource_id, "resource_id")?;
        let project_id = require(req.project_id, "project_id")?;
        let start = require(req.start_date, "start_date")?;
        let end = require(req.end_date, "end_date")?;
        let method = require(req.allocation_method, "allocation_method")?;
        let value = require(req.allocation_value, "allocation_value")?;
        let kind = req.kind.unwrap_or(BookingType::Hard);

        let candidate =
            self.build_candidate(resource_id, project_id, start, end, method, value, kind)?;

        let ledger = self
            .ledger(resource_id)
            .ok_or(EngineError::ResourceNotFound(resource_id))?;
        let mut guard = ledger.write().await;
        if guard.bookings.len() >= MAX_BOOKINGS_PER_RESOURCE {
            return Err(EngineError::LimitExceeded("too many bookings on resource"));
        }

        Self::admit(&guard, &candidate, None)?;

        let booking = candidate.into_booking(self.allocate_booking_id(), Utc::now());
        guard.insert(booking.clone());
        self.booking_index.insert(booking.id, resource_id);
        self.notify.send(
            resource_id,
            &Event::BookingCreated {
                booking: booking.clone(),
            },
        );
        Ok(booking)
    }

    pub async fn update_booking(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<Booking, EngineError> {
        let started = std::time::Instant::now();
        let result = self.update_booking_inner(id, patch).await;
        metrics::histogram!(observability::ADMISSION_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        match &result {
            Ok(booking) => {
                metrics::counter!(observability::BOOKINGS_UPDATED_TOTAL).increment(1);
                info!(
                    booking = booking.id,
                    resource = booking.resource_id,
                    daily_hours = booking.daily_hours,
                    "booking updated"
                );
            }
            Err(e) => {
                metrics::counter!(
                    observability::ADMISSION_REJECTED_TOTAL,
                    "reason" => observability::error_label(e)
                )
                .increment(1);
                debug!("booking update rejected: {e}");
            }
        }
        result
    }

    async fn update_booking_inner(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<Booking, EngineError> {
        let current_rid = self
            .resource_for_booking(id)
            .ok_or(EngineError::BookingNotFound(id))?;
        let target_rid = patch.resource_id.unwrap_or(current_rid);

        if target_rid == current_rid {
            let ledger = self
                .ledger(current_rid)
                .ok_or(EngineError::BookingNotFound(id))?;
            let mut guard = ledger.write().await;
            let existing = guard
                .get(id)
                .cloned()
                .ok_or(EngineError::BookingNotFound(id))?;
            let candidate = self.merged_candidate(&existing, &patch)?;

            // Full re-check against the rest of the store, even for no-op
            // patches. On conflict nothing below runs: the stored booking is
            // untouched.
            Self::admit(&guard, &candidate, Some(id))?;

            let updated = candidate.into_booking(id, existing.created_at);
            guard.remove(id);
            guard.insert(updated.clone());
            self.notify.send(
                current_rid,
                &Event::BookingUpdated {
                    booking: updated.clone(),
                    previous_resource_id: current_rid,
                },
            );
            Ok(updated)
        } else {
            let source = self
                .ledger(current_rid)
                .ok_or(EngineError::BookingNotFound(id))?;
            let target = self
                .ledger(target_rid)
                .ok_or(EngineError::ResourceNotFound(target_rid))?;

            // Acquire write locks in ascending resource-id order to prevent
            // deadlocks with concurrent cross-resource moves.
            let (mut source_guard, mut target_guard) = if current_rid < target_rid {
                let s = source.write_owned().await;
                let t = target.write_owned().await;
                (s, t)
            } else {
                let t = target.write_owned().await;
                let s = source.write_owned().await;
                (s, t)
            };

            let existing = source_guard
                .get(id)
                .cloned()
                .ok_or(EngineError::BookingNotFound(id))?;
            let candidate = self.merged_candidate(&existing, &patch)?;
            if target_guard.bookings.len() >= MAX_BOOKINGS_PER_RESOURCE {
                return Err(EngineError::LimitExceeded("too many bookings on resource"));
            }

            // The booking being moved still lives on the source ledger, so
            // the exclusion never matches anything on the target.
            Self::admit(&target_guard, &candidate, Some(id))?;

            let updated = candidate.into_booking(id, existing.created_at);
            source_guard.remove(id);
            target_guard.insert(updated.clone());
            self.booking_index.insert(id, target_rid);
            self.notify.send(
                target_rid,
                &Event::BookingUpdated {
                    booking: updated.clone(),
                    previous_resource_id: current_rid,
                },
            );
            Ok(updated)
        }
    }

    /// Merge patch fields over the existing booking into a complete candidate,
    /// then run the full validation pipeline on it: date ordering, directory
    /// existence, and a fresh working-days + daily-hours recomputation, even
    /// when only unrelated fields changed.
    fn merged_candidate(
        &self,
        existing: &Booking,
        patch: &BookingPatch,
    ) -> Result<Candidate, EngineError> {
        self.build_candidate(
            patch.resource_id.unwrap_or(existing.resource_id),
            patch.project_id.unwrap_or(existing.project_id),
            patch.start_date.unwrap_or(existing.start_date),
            patch.end_date.unwrap_or(existing.end_date),
            patch.allocation_method.unwrap_or(existing.allocation_method),
            patch.allocation_value.unwrap_or(existing.allocation_value),
            patch.kind.unwrap_or(existing.kind),
        )
    }

    /// Unconditional removal. Never rejected for capacity reasons; removal
    /// can only free capacity.
    ///
    /// The index read and the ledger lock are not one atomic step, so a
    /// concurrent cross-resource move can land in between and leave the
    /// booking on a different ledger than the one locked here. When the
    /// remove comes up empty, the index is re-read and the delete retried
    /// once against the booking's new home.
    pub async fn delete_booking(&self, id: BookingId) -> Result<Booking, EngineError> {
        for _ in 0..2 {
            let resource_id = self
                .resource_for_booking(id)
                .ok_or(EngineError::BookingNotFound(id))?;
            let ledger = self
                .ledger(resource_id)
                .ok_or(EngineError::BookingNotFound(id))?;
            let mut guard = ledger.write().await;
            let Some(removed) = guard.remove(id) else {
                drop(guard);
                if self.resource_for_booking(id) == Some(resource_id) {
                    // Not a stale read: the index still points here and the
                    // booking genuinely is not stored.
                    return Err(EngineError::BookingNotFound(id));
                }
                continue;
            };
            self.booking_index.remove(&id);
            metrics::counter!(observability::BOOKINGS_DELETED_TOTAL).increment(1);
            metrics::gauge!(observability::BOOKINGS_ACTIVE).decrement(1.0);
            self.notify
                .send(resource_id, &Event::BookingDeleted { id, resource_id });
            info!(booking = id, resource = resource_id, "booking deleted");
            return Ok(removed);
        }
        Err(EngineError::BookingNotFound(id))
    }
}
