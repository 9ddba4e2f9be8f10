use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar;

pub type ResourceId = i64;
pub type ProjectId = i64;
pub type BookingId = i64;

/// Inclusive calendar-date interval `[start, end]`. A booking covers every
/// working day of its range, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "DateRange start must not be after end");
        Self { start, end }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Inclusive on both ends: ranges sharing a single day overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Calendar days in the range, weekends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn working_days(&self) -> impl Iterator<Item = NaiveDate> {
        calendar::working_days(self.start, self.end)
    }

    pub fn working_day_count(&self) -> u32 {
        calendar::working_days_between(self.start, self.end)
    }
}

/// How `allocation_value` on a booking is interpreted when deriving
/// `daily_hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    /// Value is already a daily-hours rate.
    Hours,
    /// Value is a percentage of the 8-hour standard day.
    Percentage,
    /// Value is a total spread evenly over the range's working days.
    Total,
}

/// Carried through for downstream reporting. Both kinds count toward
/// capacity identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Hard,
    Soft,
}

/// A staffable person. Read-only reference data; immutable during booking
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub role: String,
    pub email: String,
    pub initials: String,
    pub capacity_per_day: f64,
}

impl Resource {
    pub const DEFAULT_CAPACITY_PER_DAY: f64 = 8.0;
}

/// Read-only reference data, referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub client_name: String,
}

/// A committed allocation of a resource to a project over a date range.
/// `daily_hours` is normalized once at admission and stored; it is never
/// recomputed implicitly afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub resource_id: ResourceId,
    pub project_id: ProjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub allocation_method: AllocationMethod,
    pub allocation_value: f64,
    pub daily_hours: f64,
    pub kind: BookingType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Per-resource booking collection. Bookings are kept sorted by `start_date`
/// so overlap scans can skip everything starting after the query window.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    pub resource: Resource,
    pub bookings: Vec<Booking>,
}

impl ResourceLedger {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            bookings: Vec::new(),
        }
    }

    /// Insert a booking maintaining sort order by start_date.
    pub fn insert(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.start_date, |b| b.start_date)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    /// Remove a booking by id.
    pub fn remove(&mut self, id: BookingId) -> Option<Booking> {
        if let Some(pos) = self.bookings.iter().position(|b| b.id == id) {
            Some(self.bookings.remove(pos))
        } else {
            None
        }
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Bookings whose inclusive range overlaps the query window.
    /// Everything at index >= right_bound starts after `query.end` → can't overlap.
    pub fn overlapping(&self, query: &DateRange) -> impl Iterator<Item = &Booking> {
        let right_bound = self
            .bookings
            .partition_point(|b| b.start_date <= query.end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.end_date >= query.start)
    }
}

/// Change notifications published after every committed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BookingCreated {
        booking: Booking,
    },
    BookingUpdated {
        booking: Booking,
        previous_resource_id: ResourceId,
    },
    BookingDeleted {
        id: BookingId,
        resource_id: ResourceId,
    },
}

// ── Query result types ───────────────────────────────────────────

/// Committed load on a single working day, candidate hours included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLoad {
    pub date: NaiveDate,
    pub total_hours: f64,
    pub contributing_bookings: Vec<BookingId>,
    pub overbooked: bool,
}

/// Result of a standalone capacity pre-check. No admission side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPreview {
    pub days: Vec<DayLoad>,
    pub overbooked: Vec<DayLoad>,
    pub is_overbooked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub capacity_per_day: f64,
    pub period_working_days: u32,
    pub booked_hours: f64,
    pub capacity_hours: f64,
    pub utilization_pct: f64,
    /// May go negative if the store was overbooked through stale writes;
    /// reported as-is, never clamped.
    pub available_hours: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn resource() -> Resource {
        Resource {
            id: 1,
            name: "Ada".into(),
            role: "Engineer".into(),
            email: "ada@example.com".into(),
            initials: "AL".into(),
            capacity_per_day: Resource::DEFAULT_CAPACITY_PER_DAY,
        }
    }

    fn booking(id: BookingId, start: NaiveDate, end: NaiveDate) -> Booking {
        let now = Utc::now();
        Booking {
            id,
            resource_id: 1,
            project_id: 10,
            start_date: start,
            end_date: end,
            allocation_method: AllocationMethod::Hours,
            allocation_value: 4.0,
            daily_hours: 4.0,
            kind: BookingType::Hard,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn range_basics() {
        let r = DateRange::new(d(2025, 11, 17), d(2025, 11, 21));
        assert_eq!(r.num_days(), 5);
        assert!(r.covers(d(2025, 11, 17)));
        assert!(r.covers(d(2025, 11, 21))); // inclusive end
        assert!(!r.covers(d(2025, 11, 22)));
        assert_eq!(r.working_day_count(), 5);
    }

    #[test]
    fn range_overlap_is_inclusive() {
        let a = DateRange::new(d(2025, 11, 17), d(2025, 11, 19));
        let b = DateRange::new(d(2025, 11, 19), d(2025, 11, 21));
        let c = DateRange::new(d(2025, 11, 22), d(2025, 11, 24));
        assert!(a.overlaps(&b)); // share a single day
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn ledger_insert_keeps_start_order() {
        let mut ledger = ResourceLedger::new(resource());
        ledger.insert(booking(3, d(2025, 11, 24), d(2025, 11, 28)));
        ledger.insert(booking(1, d(2025, 11, 10), d(2025, 11, 14)));
        ledger.insert(booking(2, d(2025, 11, 17), d(2025, 11, 21)));
        let starts: Vec<NaiveDate> = ledger.bookings.iter().map(|b| b.start_date).collect();
        assert_eq!(
            starts,
            vec![d(2025, 11, 10), d(2025, 11, 17), d(2025, 11, 24)]
        );
    }

    #[test]
    fn ledger_remove() {
        let mut ledger = ResourceLedger::new(resource());
        ledger.insert(booking(1, d(2025, 11, 17), d(2025, 11, 21)));
        let removed = ledger.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        assert!(ledger.bookings.is_empty());
        assert!(ledger.remove(1).is_none());
    }

    #[test]
    fn ledger_overlapping_skips_disjoint() {
        let mut ledger = ResourceLedger::new(resource());
        ledger.insert(booking(1, d(2025, 11, 3), d(2025, 11, 7))); // past
        ledger.insert(booking(2, d(2025, 11, 14), d(2025, 11, 18))); // overlaps
        ledger.insert(booking(3, d(2025, 12, 1), d(2025, 12, 5))); // future
        let query = DateRange::new(d(2025, 11, 17), d(2025, 11, 21));
        let hits: Vec<BookingId> = ledger.overlapping(&query).map(|b| b.id).collect();
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn ledger_overlapping_shared_endpoint_included() {
        let mut ledger = ResourceLedger::new(resource());
        ledger.insert(booking(1, d(2025, 11, 10), d(2025, 11, 17)));
        ledger.insert(booking(2, d(2025, 11, 21), d(2025, 11, 25)));
        let query = DateRange::new(d(2025, 11, 17), d(2025, 11, 21));
        let hits: Vec<BookingId> = ledger.overlapping(&query).map(|b| b.id).collect();
        // Inclusive ranges: touching endpoints on either side both count.
        assert_eq!(hits, vec![1, 2]);
    }

    #[test]
    fn ledger_overlapping_empty() {
        let ledger = ResourceLedger::new(resource());
        let query = DateRange::new(d(2025, 11, 17), d(2025, 11, 21));
        assert_eq!(ledger.overlapping(&query).count(), 0);
    }

    #[test]
    fn allocation_method_wire_tags() {
        assert_eq!(
            serde_json::to_string(&AllocationMethod::Hours).unwrap(),
            "\"hours\""
        );
        assert_eq!(
            serde_json::to_string(&AllocationMethod::Percentage).unwrap(),
            "\"percentage\""
        );
        assert_eq!(
            serde_json::to_string(&AllocationMethod::Total).unwrap(),
            "\"total\""
        );
        assert_eq!(
            serde_json::to_string(&BookingType::Soft).unwrap(),
            "\"soft\""
        );
    }

    #[test]
    fn booking_serialization_roundtrip() {
        let b = booking(7, d(2025, 11, 17), d(2025, 11, 21));
        let json = serde_json::to_string(&b).unwrap();
        let decoded: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(b, decoded);
    }
}
